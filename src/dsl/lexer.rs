//! Line scanner for netlist text.
//!
//! Netlists are line-oriented: the scanner strips comments and surrounding
//! whitespace, skips blank lines and yields the remaining lines with their
//! 1-based line numbers and whitespace-separated tokens.

use num_complex::Complex64;

/// Comment marker; everything from it to the end of the line is discarded.
pub const COMMENT: char = '#';

/// A non-blank source line after comment stripping.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceLine<'a> {
    /// Line number (1-indexed)
    pub number: usize,
    /// Line text without comment and surrounding whitespace
    pub text: &'a str,
}

impl<'a> SourceLine<'a> {
    /// Whitespace-separated tokens of the line.
    pub fn tokens(&self) -> Vec<&'a str> {
        self.text.split_whitespace().collect()
    }
}

/// Lexer yielding the meaningful lines of a netlist.
pub struct Lexer<'a> {
    lines: std::iter::Enumerate<std::str::Lines<'a>>,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given input.
    pub fn new(input: &'a str) -> Self {
        Self {
            lines: input.lines().enumerate(),
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = SourceLine<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        for (index, raw) in self.lines.by_ref() {
            let text = strip_comment(raw).trim();
            if !text.is_empty() {
                return Some(SourceLine {
                    number: index + 1,
                    text,
                });
            }
        }
        None
    }
}

/// Remove everything from the comment marker onward.
pub fn strip_comment(line: &str) -> &str {
    match line.find(COMMENT) {
        Some(pos) => &line[..pos],
        None => line,
    }
}

/// Parse a number string with optional unit suffix.
pub fn parse_value(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let (num_str, multiplier) = if let Some(last) = text.chars().last() {
        let mult = match last {
            'p' => 1e-12,
            'n' => 1e-9,
            'u' | 'µ' => 1e-6,
            'm' => 1e-3,
            'k' | 'K' => 1e3,
            'M' => 1e6,
            'G' => 1e9,
            _ => 1.0,
        };
        if mult != 1.0 {
            (&text[..text.len() - last.len_utf8()], mult)
        } else {
            (text, 1.0)
        }
    } else {
        (text, 1.0)
    };

    num_str
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(|v| v * multiplier)
}

/// Parse a real or complex literal.
///
/// Accepted forms: `10`, `4.7k`, `3+4j`, `-2.5e-3j`, `j`, `(1-1j)`. Both `j`
/// and `i` are accepted as the imaginary unit.
pub fn parse_complex(text: &str) -> Option<Complex64> {
    let text = text.trim();
    let text = text
        .strip_prefix('(')
        .and_then(|t| t.strip_suffix(')'))
        .unwrap_or(text);

    if let Some(re) = parse_value(text) {
        return Some(Complex64::new(re, 0.0));
    }

    let body = text.strip_suffix(['j', 'i'])?;
    let split = imaginary_split(body);
    let (re_str, im_str) = body.split_at(split);

    let re = if re_str.is_empty() {
        0.0
    } else {
        re_str.parse::<f64>().ok()?
    };
    let im = match im_str {
        "" | "+" => 1.0,
        "-" => -1.0,
        s => s.parse::<f64>().ok()?,
    };

    Some(Complex64::new(re, im)).filter(|c| c.re.is_finite() && c.im.is_finite())
}

/// Index of the sign that starts the imaginary part, or 0 if there is no
/// real part. Signs that belong to an exponent are skipped.
fn imaginary_split(body: &str) -> usize {
    let bytes = body.as_bytes();
    (1..bytes.len())
        .rev()
        .find(|&i| matches!(bytes[i], b'+' | b'-') && !matches!(bytes[i - 1], b'e' | b'E'))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: Option<f64>, b: Option<f64>) -> bool {
        match (a, b) {
            (Some(x), Some(y)) => (x - y).abs() < x.abs() * 1e-10 + 1e-15,
            (None, None) => true,
            _ => false,
        }
    }

    #[test]
    fn test_parse_value() {
        assert!(approx_eq(parse_value("10k"), Some(10_000.0)));
        assert!(approx_eq(parse_value("100n"), Some(100e-9)));
        assert!(approx_eq(parse_value("4.7u"), Some(4.7e-6)));
        assert!(approx_eq(parse_value("1M"), Some(1_000_000.0)));
        assert!(approx_eq(parse_value("2.2"), Some(2.2)));
        assert!(approx_eq(parse_value("1e-9"), Some(1e-9)));
        assert!(approx_eq(parse_value("abc"), None));
        assert!(approx_eq(parse_value("inf"), None));
    }

    #[test]
    fn test_parse_complex() {
        assert_eq!(parse_complex("5"), Some(Complex64::new(5.0, 0.0)));
        assert_eq!(parse_complex("3+4j"), Some(Complex64::new(3.0, 4.0)));
        assert_eq!(parse_complex("(1-1j)"), Some(Complex64::new(1.0, -1.0)));
        assert_eq!(parse_complex("-2j"), Some(Complex64::new(0.0, -2.0)));
        assert_eq!(parse_complex("j"), Some(Complex64::new(0.0, 1.0)));
        assert_eq!(parse_complex("1e-3+2e+2i"), Some(Complex64::new(1e-3, 200.0)));
        assert_eq!(parse_complex("2.5e-3j"), Some(Complex64::new(0.0, 2.5e-3)));
        assert_eq!(parse_complex("ten"), None);
        assert_eq!(parse_complex("1+xj"), None);
        assert_eq!(parse_complex(""), None);
    }

    #[test]
    fn test_lexer_strips_comments_and_blanks() {
        let input = "# header\n\n.circuit   \nR1 n1 GND 5 # load\n   \n.end";
        let lines: Vec<_> = Lexer::new(input).collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], SourceLine { number: 3, text: ".circuit" });
        assert_eq!(lines[1].number, 4);
        assert_eq!(lines[1].tokens(), vec!["R1", "n1", "GND", "5"]);
        assert_eq!(lines[2].text, ".end");
    }
}
