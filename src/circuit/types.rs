//! Core types for circuit representation.

use std::fmt;

use crate::error::{NetlistError, Result};

/// Name of the reference node.
pub const GROUND: &str = "GND";

/// One unknown of the MNA solution vector.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Unknown {
    /// Voltage of the named node
    Voltage(String),
    /// Branch current of the named voltage-defining device
    Current(String),
}

impl Unknown {
    /// Node or device name without the `V_`/`I_` prefix.
    pub fn name(&self) -> &str {
        match self {
            Unknown::Voltage(n) | Unknown::Current(n) => n,
        }
    }

    /// Check if this is the ground node voltage.
    pub fn is_ground(&self) -> bool {
        matches!(self, Unknown::Voltage(n) if n == GROUND)
    }
}

impl fmt::Display for Unknown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unknown::Voltage(n) => write!(f, "V_{}", n),
            Unknown::Current(n) => write!(f, "I_{}", n),
        }
    }
}

/// Driving frequency (Hz) of each independent source, 0 for DC.
///
/// Entries keep their assignment order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrequencyTable {
    entries: Vec<(String, f64)>,
}

impl FrequencyTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign a frequency to a source. A source can be assigned only once.
    pub fn assign(&mut self, source: impl Into<String>, frequency: f64, line: usize) -> Result<()> {
        let source = source.into();
        if self.contains(&source) {
            return Err(NetlistError::DuplicateFrequencyAssignment {
                source_name: source,
                line,
            });
        }
        self.entries.push((source, frequency));
        Ok(())
    }

    /// Frequency of a source, if assigned.
    pub fn get(&self, source: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(name, _)| name == source)
            .map(|(_, f)| *f)
    }

    pub fn contains(&self, source: &str) -> bool {
        self.get(source).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterate over `(source, frequency)` pairs in assignment order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(n, f)| (n.as_str(), *f))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_display() {
        assert_eq!(Unknown::Voltage("n1".into()).to_string(), "V_n1");
        assert_eq!(Unknown::Current("V1".into()).to_string(), "I_V1");
        assert!(Unknown::Voltage(GROUND.into()).is_ground());
        assert!(!Unknown::Current(GROUND.into()).is_ground());
    }

    #[test]
    fn test_frequency_table() {
        let mut table = FrequencyTable::new();
        assert!(table.is_empty());
        table.assign("V1", 50.0, 10).unwrap();
        table.assign("I1", 0.0, 11).unwrap();
        assert_eq!(table.get("V1"), Some(50.0));
        assert_eq!(table.get("V2"), None);
        assert_eq!(table.len(), 2);

        let err = table.assign("V1", 60.0, 12).unwrap_err();
        assert_eq!(
            err,
            NetlistError::DuplicateFrequencyAssignment {
                source_name: "V1".to_string(),
                line: 12
            }
        );
        assert_eq!(table.get("V1"), Some(50.0));

        let order: Vec<_> = table.iter().map(|(n, _)| n).collect();
        assert_eq!(order, vec!["V1", "I1"]);
    }
}
