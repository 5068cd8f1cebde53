//! Parsed netlist representation.

use crate::circuit::{Circuit, FrequencyTable};

/// Recognised directives.
pub const CIRCUIT: &str = ".circuit";
pub const END: &str = ".end";
pub const AC: &str = ".ac";

/// Source value keywords of the extended V/I syntax.
pub const DC_KEYWORD: &str = "dc";
pub const AC_KEYWORD: &str = "ac";

/// Complete result of parsing one netlist file.
#[derive(Debug, Clone)]
pub struct Netlist {
    /// Circuit blocks in file order (at least one)
    circuits: Vec<Circuit>,
    /// Frequencies assigned by `.ac` directives
    ac_frequencies: FrequencyTable,
}

impl Netlist {
    pub(crate) fn new(circuits: Vec<Circuit>, ac_frequencies: FrequencyTable) -> Self {
        debug_assert!(!circuits.is_empty());
        Self {
            circuits,
            ac_frequencies,
        }
    }

    /// All circuit blocks in file order.
    pub fn circuits(&self) -> &[Circuit] {
        &self.circuits
    }

    /// Frequencies assigned by `.ac` directives.
    pub fn ac_frequencies(&self) -> &FrequencyTable {
        &self.ac_frequencies
    }

    /// The first circuit block.
    pub fn circuit(&self) -> &Circuit {
        &self.circuits[0]
    }

    /// Consume the netlist, keeping only the first circuit block.
    pub fn into_circuit(mut self) -> Circuit {
        self.circuits.swap_remove(0)
    }

    /// True if any `.ac` directive was present; this switches V/I lines to
    /// the `dc`/`ac` tagged syntax.
    pub fn has_ac(&self) -> bool {
        !self.ac_frequencies.is_empty()
    }
}

/// State of the structural scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseState {
    /// Between circuit blocks
    Outside,
    /// Inside a block opened at `start_line`
    InsideCircuit { start_line: usize },
}
