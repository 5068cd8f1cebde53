//! A validated `.circuit` ... `.end` block.

use crate::components::Component;
use crate::error::Result;

use super::{validate_circuit, FrequencyTable};

/// A complete circuit ready for analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct Circuit {
    /// Line of the `.circuit` directive
    start_line: usize,

    /// All components in file order
    components: Vec<Component>,

    /// Frequencies of the independent sources
    frequencies: FrequencyTable,
}

impl Circuit {
    /// Build and validate a circuit.
    pub fn new(
        start_line: usize,
        components: Vec<Component>,
        frequencies: FrequencyTable,
    ) -> Result<Self> {
        let circuit = Self {
            start_line,
            components,
            frequencies,
        };
        validate_circuit(&circuit)?;
        Ok(circuit)
    }

    pub fn start_line(&self) -> usize {
        self.start_line
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn frequencies(&self) -> &FrequencyTable {
        &self.frequencies
    }

    /// Find a component by name.
    pub fn find(&self, name: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.name == name)
    }

    /// Independent V/I sources in file order.
    pub fn independent_sources(&self) -> impl Iterator<Item = &Component> {
        self.components
            .iter()
            .filter(|c| c.kind.is_independent_source())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{ComponentKind, Control};
    use crate::error::NetlistError;
    use num_complex::Complex64;

    fn resistor(name: &str, a: &str, b: &str, line: usize) -> Component {
        Component::new(
            ComponentKind::Resistor,
            name,
            [a.to_string(), b.to_string()],
            Control::None,
            Complex64::new(100.0, 0.0),
            line,
        )
    }

    #[test]
    fn test_requires_ground() {
        let err = Circuit::new(1, vec![resistor("R1", "a", "b", 2)], FrequencyTable::new())
            .unwrap_err();
        assert_eq!(err, NetlistError::MissingGround { line: 1 });
    }

    #[test]
    fn test_rejects_duplicates() {
        let err = Circuit::new(
            1,
            vec![resistor("R1", "a", "GND", 2), resistor("R1", "a", "b", 3)],
            FrequencyTable::new(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            NetlistError::DuplicateName {
                name: "R1".to_string(),
                line: 3
            }
        );
    }

    #[test]
    fn test_lookup() {
        let circuit = Circuit::new(
            4,
            vec![resistor("R1", "a", "GND", 5), resistor("R2", "a", "b", 6)],
            FrequencyTable::new(),
        )
        .unwrap();
        assert_eq!(circuit.start_line(), 4);
        assert_eq!(circuit.find("R2").map(|c| c.line), Some(6));
        assert!(circuit.find("R3").is_none());
        assert_eq!(circuit.independent_sources().count(), 0);
    }
}
