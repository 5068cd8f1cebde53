//! Circuit validation.

use std::collections::HashSet;

use crate::components::{Component, Control, Family};
use crate::error::{NetlistError, Result};

use super::{Circuit, GROUND};

/// Node and device names must be non-empty and alphanumeric.
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(char::is_alphanumeric)
}

/// Check a list of node names, reporting the first invalid one.
pub fn validate_node_names<'a>(names: impl IntoIterator<Item = &'a str>, line: usize) -> Result<()> {
    match names.into_iter().find(|n| !is_valid_name(n)) {
        Some(port) => Err(NetlistError::InvalidPortName {
            port: port.to_string(),
            line,
        }),
        None => Ok(()),
    }
}

/// Validate a single component in isolation.
///
/// Checks:
/// - Port and controlling node names are alphanumeric
/// - Current-controlled sources are controlled by a voltage source
pub fn validate_component(component: &Component) -> Result<()> {
    let line = component.line;
    validate_node_names(component.ports.iter().map(String::as_str), line)?;

    match (&component.control, component.kind.family()) {
        (Control::Nodes(nodes), Family::VoltageControlled) => {
            validate_node_names(nodes.iter().map(String::as_str), line)
        }
        (Control::Source(source), Family::CurrentControlled) => {
            if source.starts_with('V') {
                Ok(())
            } else {
                Err(NetlistError::InvalidDependency {
                    dependency: source.clone(),
                    line,
                })
            }
        }
        (Control::None, Family::TwoTerminal) => Ok(()),
        _ => Err(NetlistError::syntax(
            line,
            format!("{} '{}' has a mismatched dependency list", component.kind, component.name),
        )),
    }
}

/// Validate a complete circuit block.
///
/// Checks:
/// - Every component is valid on its own
/// - No duplicate component names
/// - At least one component is connected to GND
pub fn validate_circuit(circuit: &Circuit) -> Result<()> {
    let mut seen = HashSet::new();
    for component in circuit.components() {
        validate_component(component)?;
        if !seen.insert(component.name.as_str()) {
            return Err(NetlistError::DuplicateName {
                name: component.name.clone(),
                line: component.line,
            });
        }
    }

    if !circuit.components().iter().any(|c| c.touches(GROUND)) {
        return Err(NetlistError::MissingGround {
            line: circuit.start_line(),
        });
    }

    Ok(())
}
