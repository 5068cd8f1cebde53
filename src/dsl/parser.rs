//! Parser for netlist text.
//!
//! Parsing runs in two passes over the scanned lines:
//!
//! 1. A structural pass drives [`ParseState`] through the `.circuit` / `.end`
//!    directives, collects the body lines of every block and records `.ac`
//!    directives into the file-level frequency table.
//! 2. A device pass tokenizes and validates every body line against that
//!    table, producing one [`Circuit`] per block.
//!
//! `.ac` directives may appear after the block they refer to, which is why
//! the frequency table has to be complete before any device is read.

use std::collections::HashSet;

use log::{debug, trace};

use super::ast::{Netlist, ParseState, AC, AC_KEYWORD, CIRCUIT, DC_KEYWORD, END};
use super::lexer::{parse_complex, parse_value, Lexer, SourceLine};
use crate::circuit::{is_valid_name, validate_component, validate_node_names, Circuit, FrequencyTable};
use crate::components::{ac_phasor, Component, ComponentKind, Control, Family};
use crate::error::{NetlistError, Result};

/// Body lines of one `.circuit` block.
#[derive(Debug)]
struct Block<'a> {
    start_line: usize,
    body: Vec<SourceLine<'a>>,
}

/// How the value of a device line is written.
enum ValueSpec<'a> {
    /// Plain real or complex literal
    Literal(&'a str),
    /// `dc <value>`
    Dc(&'a str),
    /// `ac <amplitude> <phase_degrees>`
    Ac { amplitude: &'a str, phase: &'a str },
}

/// How an independent source line was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SourceForm {
    /// Plain literal, only legal without `.ac` directives
    Untagged,
    Dc,
    Ac,
}

/// Parser for netlist text.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
}

impl<'a> Parser<'a> {
    /// Create a new parser with the given lexer.
    pub fn new(lexer: Lexer<'a>) -> Self {
        Self { lexer }
    }

    /// Parse the entire netlist.
    pub fn parse(self) -> Result<Netlist> {
        let lines: Vec<SourceLine<'a>> = self.lexer.collect();
        let (blocks, ac_frequencies) = scan_structure(lines)?;

        let circuits = blocks
            .into_iter()
            .map(|block| parse_block(block, &ac_frequencies))
            .collect::<Result<Vec<_>>>()?;

        Ok(Netlist::new(circuits, ac_frequencies))
    }
}

/// Structural pass: split the input into circuit blocks and read `.ac`.
fn scan_structure(lines: Vec<SourceLine<'_>>) -> Result<(Vec<Block<'_>>, FrequencyTable)> {
    let mut state = ParseState::Outside;
    let mut blocks = Vec::new();
    let mut body = Vec::new();
    let mut ac_frequencies = FrequencyTable::new();

    for line in lines {
        let is_ac = line.tokens().first().copied() == Some(AC);

        state = match state {
            ParseState::Outside => {
                if line.text == CIRCUIT {
                    ParseState::InsideCircuit {
                        start_line: line.number,
                    }
                } else if line.text == END {
                    return Err(NetlistError::UnmatchedEnd { line: line.number });
                } else {
                    if is_ac {
                        parse_ac_directive(&line, &mut ac_frequencies)?;
                    } else {
                        trace!("ignoring line {} outside circuit: {}", line.number, line.text);
                    }
                    ParseState::Outside
                }
            }
            ParseState::InsideCircuit { start_line } => {
                if line.text == CIRCUIT {
                    return Err(NetlistError::NestedCircuit {
                        open_line: start_line,
                        line: line.number,
                    });
                } else if line.text == END {
                    blocks.push(Block {
                        start_line,
                        body: std::mem::take(&mut body),
                    });
                    ParseState::Outside
                } else if is_ac {
                    return Err(NetlistError::syntax(
                        line.number,
                        "unexpected .ac directive inside a circuit block",
                    ));
                } else {
                    body.push(line);
                    state
                }
            }
        };
    }

    if let ParseState::InsideCircuit { start_line } = state {
        return Err(NetlistError::UnterminatedCircuit { line: start_line });
    }
    if blocks.is_empty() {
        return Err(NetlistError::NoCircuit);
    }

    Ok((blocks, ac_frequencies))
}

/// Parse `.ac <source> <frequency>`.
fn parse_ac_directive(line: &SourceLine<'_>, table: &mut FrequencyTable) -> Result<()> {
    let tokens = line.tokens();
    let &[_, source, frequency] = tokens.as_slice() else {
        return Err(NetlistError::syntax(
            line.number,
            "expected '.ac <source> <frequency>'",
        ));
    };

    if !source.starts_with(['V', 'I']) {
        return Err(NetlistError::syntax(
            line.number,
            format!("'{}' is not an independent source", source),
        ));
    }

    let hz = parse_value(frequency)
        .filter(|f| *f >= 0.0)
        .ok_or_else(|| {
            NetlistError::syntax(line.number, format!("invalid frequency '{}'", frequency))
        })?;

    table.assign(source, hz, line.number)
}

/// Device pass over one block.
fn parse_block(block: Block<'_>, ac_frequencies: &FrequencyTable) -> Result<Circuit> {
    let mut frequencies = ac_frequencies.clone();
    let mut names = HashSet::new();
    let mut components = Vec::with_capacity(block.body.len());
    let mut untagged = Vec::new();

    for line in &block.body {
        let (component, form) = parse_device(line, ac_frequencies)?;

        if !names.insert(component.name.clone()) {
            return Err(NetlistError::DuplicateName {
                name: component.name,
                line: line.number,
            });
        }
        match form {
            Some(SourceForm::Dc) => frequencies.assign(component.name.as_str(), 0.0, line.number)?,
            Some(SourceForm::Untagged) => untagged.push((component.name.clone(), line.number)),
            Some(SourceForm::Ac) | None => {}
        }

        components.push(component);
    }

    // Mixed with `dc`-tagged sources, plain sources are DC as well
    if !frequencies.is_empty() {
        for (name, line) in untagged {
            frequencies.assign(name, 0.0, line)?;
        }
    }

    let circuit = Circuit::new(block.start_line, components, frequencies)?;
    debug!(
        "accepted circuit at line {} with {} components",
        circuit.start_line(),
        circuit.components().len()
    );
    Ok(circuit)
}

/// Tokenize and validate one device line.
///
/// Returns the component and, for independent sources, how the value was written.
fn parse_device(
    line: &SourceLine<'_>,
    ac_frequencies: &FrequencyTable,
) -> Result<(Component, Option<SourceForm>)> {
    let tokens = line.tokens();
    let name = tokens[0];

    let kind = ComponentKind::from_name(name).ok_or_else(|| NetlistError::UnknownComponentType {
        name: name.to_string(),
        line: line.number,
    })?;

    if !is_valid_name(name) {
        return Err(NetlistError::syntax(
            line.number,
            format!("device name '{}' must be alphanumeric", name),
        ));
    }

    let wrong_count = || {
        NetlistError::syntax(
            line.number,
            format!("incorrect set of tokens for {} '{}'", kind, name),
        )
    };

    let (control, value) = match kind.family() {
        Family::TwoTerminal if kind.is_independent_source() => {
            let keyword = tokens.get(3).copied().unwrap_or_default();
            let spec = match tokens.len() {
                5 if keyword.eq_ignore_ascii_case(DC_KEYWORD) => ValueSpec::Dc(tokens[4]),
                6 if keyword.eq_ignore_ascii_case(AC_KEYWORD) => ValueSpec::Ac {
                    amplitude: tokens[4],
                    phase: tokens[5],
                },
                4 if ac_frequencies.is_empty() => ValueSpec::Literal(tokens[3]),
                _ => return Err(wrong_count()),
            };
            (Control::None, spec)
        }
        Family::TwoTerminal if tokens.len() == 4 => (Control::None, ValueSpec::Literal(tokens[3])),
        Family::VoltageControlled if tokens.len() == 6 => (
            Control::Nodes([tokens[3].to_string(), tokens[4].to_string()]),
            ValueSpec::Literal(tokens[5]),
        ),
        Family::CurrentControlled if tokens.len() == 5 => (
            Control::Source(tokens[3].to_string()),
            ValueSpec::Literal(tokens[4]),
        ),
        _ => return Err(wrong_count()),
    };

    let ports = [tokens[1].to_string(), tokens[2].to_string()];
    let node_names = match &control {
        Control::Nodes(nodes) => vec![&ports[0], &ports[1], &nodes[0], &nodes[1]],
        _ => vec![&ports[0], &ports[1]],
    };
    validate_node_names(node_names.into_iter().map(String::as_str), line.number)?;

    let form = kind.is_independent_source().then_some(match value {
        ValueSpec::Literal(_) => SourceForm::Untagged,
        ValueSpec::Dc(_) => SourceForm::Dc,
        ValueSpec::Ac { .. } => SourceForm::Ac,
    });
    let value = match value {
        ValueSpec::Literal(text) | ValueSpec::Dc(text) => {
            parse_complex(text).ok_or_else(|| NetlistError::invalid_value(name, text, line.number))?
        }
        ValueSpec::Ac { amplitude, phase } => {
            let amp = parse_value(amplitude)
                .ok_or_else(|| NetlistError::invalid_value(name, amplitude, line.number))?;
            let deg = parse_value(phase)
                .ok_or_else(|| NetlistError::invalid_value(name, phase, line.number))?;
            if !ac_frequencies.contains(name) {
                return Err(NetlistError::UnassignedFrequency {
                    source_name: name.to_string(),
                    line: line.number,
                });
            }
            ac_phasor(amp, deg)
        }
    };

    let component = Component::new(kind, name, ports, control, value, line.number);
    validate_component(&component)?;
    Ok((component, form))
}

#[cfg(test)]
mod tests {
    use super::super::parse;
    use super::*;
    use approx::assert_relative_eq;
    use num_complex::Complex64;

    #[test]
    fn test_parse_resistor() {
        let input = ".circuit\nR1 in GND 10k\n.end";
        let netlist = parse(input).unwrap();
        let circuit = netlist.circuit();
        assert_eq!(circuit.components().len(), 1);
        let r = &circuit.components()[0];
        assert_eq!(r.kind, ComponentKind::Resistor);
        assert_eq!(r.name, "R1");
        assert_eq!(r.ports, ["in".to_string(), "GND".to_string()]);
        assert_eq!(r.value, Complex64::new(10_000.0, 0.0));
        assert_eq!(r.line, 2);
        assert_eq!(circuit.start_line(), 1);
    }

    #[test]
    fn test_parse_with_comments() {
        let input = "# A divider\n.circuit # start\nV1 a GND 5 # supply\nR1 a b 1k\nR2 b GND 1k\n\n.end\ntrailing text is ignored";
        let netlist = parse(input).unwrap();
        let circuit = netlist.circuit();
        assert_eq!(circuit.components().len(), 3);
        assert_eq!(circuit.components()[1].line, 4);
        assert!(circuit.frequencies().is_empty());
    }

    #[test]
    fn test_parse_controlled_sources() {
        let input = "\
.circuit
V1 a GND 1
R1 a b 10
E1 c GND a b 2
G1 d GND a GND 0.5
H1 e GND V1 3
F1 f GND V1 4
R2 c d 1
R3 d e 1
R4 e f 1
R5 f GND 1
.end";
        let netlist = parse(input).unwrap();
        let circuit = netlist.circuit();
        let e1 = circuit.find("E1").unwrap();
        assert_eq!(e1.control, Control::Nodes(["a".to_string(), "b".to_string()]));
        assert_eq!(e1.value, Complex64::new(2.0, 0.0));
        let h1 = circuit.find("H1").unwrap();
        assert_eq!(h1.kind, ComponentKind::Ccvs);
        assert_eq!(h1.control, Control::Source("V1".to_string()));
        assert_eq!(circuit.find("F1").unwrap().kind, ComponentKind::Cccs);
        assert_eq!(circuit.find("G1").unwrap().kind, ComponentKind::Vccs);
    }

    #[test]
    fn test_parse_ac_sources() {
        let input = "\
.circuit
V1 a GND ac 10 90
I1 a GND dc 2
R1 a GND 1k
.end
.ac V1 50";
        let netlist = parse(input).unwrap();
        assert!(netlist.has_ac());
        assert_eq!(netlist.ac_frequencies().get("V1"), Some(50.0));

        let circuit = netlist.circuit();
        let v1 = circuit.find("V1").unwrap();
        assert_relative_eq!(v1.value.re, 0.0, epsilon = 1e-12);
        assert_relative_eq!(v1.value.im, 5.0);
        assert_eq!(circuit.find("I1").unwrap().value, Complex64::new(2.0, 0.0));

        // dc-tagged sources are registered at 0 Hz for this circuit only
        assert_eq!(circuit.frequencies().get("I1"), Some(0.0));
        assert_eq!(netlist.ac_frequencies().get("I1"), None);
    }

    #[test]
    fn test_dc_keyword_without_ac_directive() {
        let netlist = parse(".circuit\nV1 n1 GND dc 10\nR1 n1 GND 5\n.end").unwrap();
        assert_eq!(netlist.circuit().frequencies().get("V1"), Some(0.0));
    }

    #[test]
    fn test_plain_source_next_to_dc_tagged_source() {
        let netlist = parse(".circuit\nV1 a GND dc 5\nI1 a GND 2\nR1 a GND 1\n.end").unwrap();
        let frequencies = netlist.circuit().frequencies();
        assert_eq!(frequencies.get("V1"), Some(0.0));
        assert_eq!(frequencies.get("I1"), Some(0.0));
    }

    #[test]
    fn test_complex_value() {
        let netlist = parse(".circuit\nR1 a GND 3+4j\n.end").unwrap();
        assert_eq!(netlist.circuit().components()[0].value, Complex64::new(3.0, 4.0));
    }

    #[test]
    fn test_multiple_blocks() {
        let input = ".circuit\nR1 a GND 1\n.end\n.circuit\nR1 b GND 2\n.end";
        let netlist = parse(input).unwrap();
        assert_eq!(netlist.circuits().len(), 2);
        assert_eq!(netlist.circuits()[1].start_line(), 4);
        assert_eq!(netlist.into_circuit().components()[0].ports[0], "a");
    }

    #[test]
    fn test_structural_errors() {
        assert_eq!(
            parse(".circuit\nR1 a GND 1\n.circuit\n.end").unwrap_err(),
            NetlistError::NestedCircuit {
                open_line: 1,
                line: 3
            }
        );
        assert_eq!(
            parse("R1 a GND 1\n.end").unwrap_err(),
            NetlistError::UnmatchedEnd { line: 2 }
        );
        assert_eq!(
            parse("\n.circuit\nR1 a GND 1\n").unwrap_err(),
            NetlistError::UnterminatedCircuit { line: 2 }
        );
        assert_eq!(parse("# nothing here\n").unwrap_err(), NetlistError::NoCircuit);
    }

    #[test]
    fn test_missing_ground() {
        assert_eq!(
            parse(".circuit\nV1 a b 1\nR1 a b 1\n.end").unwrap_err(),
            NetlistError::MissingGround { line: 1 }
        );
    }

    #[test]
    fn test_device_errors() {
        assert_eq!(
            parse(".circuit\nR1 a GND 1\nD1 a GND 1\n.end").unwrap_err(),
            NetlistError::UnknownComponentType {
                name: "D1".to_string(),
                line: 3
            }
        );
        assert_eq!(
            parse(".circuit\nR1 a GND\n.end").unwrap_err().line(),
            Some(2)
        );
        assert!(matches!(
            parse(".circuit\nE1 a GND b 2\n.end").unwrap_err(),
            NetlistError::Syntax { line: 2, .. }
        ));
        assert_eq!(
            parse(".circuit\nR1 a.b GND 1\n.end").unwrap_err(),
            NetlistError::InvalidPortName {
                port: "a.b".to_string(),
                line: 2
            }
        );
        assert_eq!(
            parse(".circuit\nR1 a GND lots\n.end").unwrap_err(),
            NetlistError::InvalidValue {
                name: "R1".to_string(),
                value: "lots".to_string(),
                line: 2
            }
        );
        assert_eq!(
            parse(".circuit\nR1 a GND 1\nR1 a GND 2\n.end").unwrap_err(),
            NetlistError::DuplicateName {
                name: "R1".to_string(),
                line: 3
            }
        );
    }

    #[test]
    fn test_ccvs_dependency_must_be_voltage_source() {
        let input = ".circuit\nV1 a GND 1\nR1 a GND 1\nH1 b GND R1 2\n.end";
        assert_eq!(
            parse(input).unwrap_err(),
            NetlistError::InvalidDependency {
                dependency: "R1".to_string(),
                line: 4
            }
        );
    }

    #[test]
    fn test_port_checked_before_value() {
        let err = parse(".circuit\nR1 a$ GND bad\n.end").unwrap_err();
        assert!(matches!(err, NetlistError::InvalidPortName { .. }));
    }

    #[test]
    fn test_ac_directive_errors() {
        let body = ".circuit\nV1 a GND ac 1 0\nR1 a GND 1\n.end\n";
        assert!(matches!(
            parse(&format!("{}.ac V1", body)).unwrap_err(),
            NetlistError::Syntax { line: 5, .. }
        ));
        assert!(matches!(
            parse(&format!("{}.ac R1 50", body)).unwrap_err(),
            NetlistError::Syntax { line: 5, .. }
        ));
        assert!(matches!(
            parse(&format!("{}.ac V1 fast", body)).unwrap_err(),
            NetlistError::Syntax { line: 5, .. }
        ));
        assert_eq!(
            parse(&format!("{}.ac V1 50\n.ac V1 60", body)).unwrap_err(),
            NetlistError::DuplicateFrequencyAssignment {
                source_name: "V1".to_string(),
                line: 6
            }
        );
        assert!(matches!(
            parse(".circuit\n.ac V1 50\n.end").unwrap_err(),
            NetlistError::Syntax { line: 2, .. }
        ));
    }

    #[test]
    fn test_source_syntax_with_ac_present() {
        // Untagged sources are not allowed once .ac is used
        assert!(matches!(
            parse(".circuit\nV1 a GND 5\nR1 a GND 1\n.end\n.ac V2 50").unwrap_err(),
            NetlistError::Syntax { line: 2, .. }
        ));
        // AC source without a frequency
        assert_eq!(
            parse(".circuit\nV1 a GND ac 5 0\nR1 a GND 1\n.end").unwrap_err(),
            NetlistError::UnassignedFrequency {
                source_name: "V1".to_string(),
                line: 2
            }
        );
        // dc tag on a source that also has an .ac entry
        assert_eq!(
            parse(".circuit\nV1 a GND dc 5\nR1 a GND 1\n.end\n.ac V1 50").unwrap_err(),
            NetlistError::DuplicateFrequencyAssignment {
                source_name: "V1".to_string(),
                line: 2
            }
        );
        // Bad phase
        assert!(matches!(
            parse(".circuit\nV1 a GND ac 5 east\nR1 a GND 1\n.end\n.ac V1 50").unwrap_err(),
            NetlistError::InvalidValue { line: 2, .. }
        ));
    }
}
