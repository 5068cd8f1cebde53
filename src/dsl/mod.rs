//! Parser for SPICE-style netlists.
//!
//! The netlist format is line-oriented. Everything from `#` to the end of a
//! line is a comment; blank lines are skipped.
//!
//! # Grammar Overview
//!
//! ```text
//! netlist   = { line }
//! line      = directive | device | other
//! directive = ".circuit" | ".end" | ".ac" source frequency
//! device    = name node node { control } value
//!
//! value     = real | complex | "dc" real | "ac" amplitude phase_degrees
//! real      = number [unit_suffix]
//! complex   = [number] ('+' | '-') number ('j' | 'i')
//! node      = alphanumeric
//! ```
//!
//! Lines outside a `.circuit` ... `.end` block that are not `.ac` directives
//! are ignored.
//!
//! # Component Types
//!
//! | Type | Description | Syntax |
//! |------|-------------|--------|
//! | R | Resistor | `R<name> <n1> <n2> <value>` |
//! | L | Inductor | `L<name> <n1> <n2> <value>` |
//! | C | Capacitor | `C<name> <n1> <n2> <value>` |
//! | V | Voltage Source | `V<name> <n+> <n-> <value>` / `dc <value>` / `ac <amplitude> <phase>` |
//! | I | Current Source | `I<name> <n1> <n2> <value>` / `dc <value>` / `ac <amplitude> <phase>` |
//! | E | VCVS | `E<name> <n+> <n-> <c+> <c-> <gain>` |
//! | G | VCCS | `G<name> <n1> <n2> <c+> <c-> <transconductance>` |
//! | H | CCVS | `H<name> <n+> <n-> <Vsource> <transresistance>` |
//! | F | CCCS | `F<name> <n1> <n2> <Vsource> <gain>` |
//!
//! Once any `.ac` directive is present, V and I lines must use the `dc` or
//! `ac` tagged form.
//!
//! # Example
//!
//! ```text
//! # RC low-pass driven at 1 kHz
//! .circuit
//! V1   in   GND  ac 2 0
//! R1   in   out  1k
//! C1   out  GND  100n
//! .end
//! .ac V1 1000
//! ```

mod ast;
mod lexer;
mod parser;

pub use ast::*;
pub use lexer::{parse_complex, parse_value, strip_comment, Lexer, SourceLine};
pub use parser::Parser;

use crate::error::Result;

/// Parse netlist text.
pub fn parse(input: &str) -> Result<Netlist> {
    let lexer = Lexer::new(input);
    let parser = Parser::new(lexer);
    parser.parse()
}

/// Parse a netlist given as a sequence of raw lines.
pub fn parse_lines<I, S>(lines: I) -> Result<Netlist>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let text = lines
        .into_iter()
        .map(|l| l.as_ref().to_string())
        .collect::<Vec<_>>()
        .join("\n");
    parse(&text)
}

/// Parse a netlist file.
#[cfg(feature = "cli")]
pub fn parse_file(path: &std::path::Path) -> Result<Netlist> {
    let content = std::fs::read_to_string(path).map_err(|e| crate::error::NetlistError::FileRead {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    parse(&content)
}
