//! Main simulator interface.
//!
//! The simulator runs the superposition protocol: each independent source is
//! solved alone at its own frequency and the responses are summed per
//! frequency.

use log::info;
use num_complex::Complex64;

use super::mna::{discover_unknowns, Excitation, MnaSystem};
use super::DEFAULT_REACTANCE_EPSILON;
use crate::circuit::{Circuit, Unknown};
use crate::error::{NetlistError, Result};

/// How a current-controlled voltage source is stamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum CcvsStamp {
    /// Couples only `n1` to the controlling current and never writes the
    /// device's own branch column, which leaves the system singular.
    /// Kept for compatibility with existing reference outputs.
    #[default]
    Reference,
    /// Voltage source incidence on both ports plus `-r` on the controlling
    /// current in the branch row: `V(n1) - V(n2) = r * I(dep)`.
    Textbook,
}

/// Configuration for the simulator.
#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    /// Surrogate for ideal L/C behaviour at DC: an inductor becomes the
    /// admittance `1 / (epsilon * L)` and a capacitor `epsilon * C`.
    pub reactance_epsilon: f64,
    /// CCVS stamping rule.
    pub ccvs_stamp: CcvsStamp,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            reactance_epsilon: DEFAULT_REACTANCE_EPSILON,
            ccvs_stamp: CcvsStamp::default(),
        }
    }
}

impl SimulatorConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the DC reactance surrogate.
    ///
    /// Smaller values model the ideal short/open more closely but push the
    /// matrix entries further apart.
    pub fn with_reactance_epsilon(mut self, epsilon: f64) -> Self {
        self.reactance_epsilon = epsilon;
        self
    }

    /// Set the CCVS stamping rule.
    pub fn with_ccvs_stamp(mut self, stamp: CcvsStamp) -> Self {
        self.ccvs_stamp = stamp;
        self
    }

    /// Check that the configuration can be used.
    pub fn validate(&self) -> Result<()> {
        if self.reactance_epsilon > 0.0 && self.reactance_epsilon.is_finite() {
            Ok(())
        } else {
            Err(NetlistError::InvalidConfig {
                message: format!(
                    "reactance epsilon must be positive and finite, got {}",
                    self.reactance_epsilon
                ),
            })
        }
    }
}

/// Summed response of all sources sharing one frequency.
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyResponse {
    /// Frequency in Hz (0 for DC)
    pub frequency: f64,
    /// Phasor of every unknown, in [`Solution::unknowns`] order
    pub values: Vec<Complex64>,
}

/// Steady-state solution of a circuit.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    /// Unknown ordering shared by every response
    pub unknowns: Vec<Unknown>,
    /// One response per distinct frequency, ascending
    pub responses: Vec<FrequencyResponse>,
}

impl Solution {
    /// Distinct frequencies present in the solution.
    pub fn frequencies(&self) -> Vec<f64> {
        self.responses.iter().map(|r| r.frequency).collect()
    }

    /// True if DC is the only frequency present.
    pub fn is_dc_only(&self) -> bool {
        self.responses.iter().all(|r| r.frequency == 0.0)
    }

    /// Index of an unknown given as `V_<node>` or `I_<device>`.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.unknowns.iter().position(|u| u.to_string() == name)
    }

    /// `(frequency, phasor)` pairs of one unknown.
    pub fn phasors(&self, name: &str) -> Option<Vec<(f64, Complex64)>> {
        let idx = self.index_of(name)?;
        Some(
            self.responses
                .iter()
                .map(|r| (r.frequency, r.values[idx]))
                .collect(),
        )
    }

    /// Phasor of one unknown at one frequency.
    pub fn value_at(&self, name: &str, frequency: f64) -> Option<Complex64> {
        let idx = self.index_of(name)?;
        self.responses
            .iter()
            .find(|r| r.frequency == frequency)
            .map(|r| r.values[idx])
    }

    /// Real value of one unknown in a DC-only solution.
    pub fn dc_value(&self, name: &str) -> Option<f64> {
        self.value_at(name, 0.0).map(|v| v.re)
    }

    fn accumulate(&mut self, frequency: f64, values: Vec<Complex64>) {
        match self.responses.iter_mut().find(|r| r.frequency == frequency) {
            Some(bucket) => {
                for (total, v) in bucket.values.iter_mut().zip(values) {
                    *total += v;
                }
            }
            None => {
                let pos = self
                    .responses
                    .partition_point(|r| r.frequency < frequency);
                self.responses
                    .insert(pos, FrequencyResponse { frequency, values });
            }
        }
    }
}

/// Steady-state circuit simulator.
pub struct Simulator<'a> {
    circuit: &'a Circuit,
    config: SimulatorConfig,
}

impl<'a> Simulator<'a> {
    /// Create a simulator for a circuit with default configuration.
    pub fn new(circuit: &'a Circuit) -> Self {
        Self {
            circuit,
            config: SimulatorConfig::default(),
        }
    }

    /// Replace the configuration.
    pub fn with_config(mut self, config: SimulatorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Solve the circuit at every frequency it is driven at.
    pub fn run(&self) -> Result<Solution> {
        self.config.validate()?;

        let mut solution = Solution {
            unknowns: discover_unknowns(self.circuit.components()),
            responses: Vec::new(),
        };

        let frequencies = self.circuit.frequencies();
        if frequencies.is_empty() {
            info!("no source frequencies assigned, solving as a DC circuit");
            let values = self.solve_at(0.0, Excitation::All)?;
            solution.accumulate(0.0, values);
            return Ok(solution);
        }

        for source in self.circuit.independent_sources() {
            let frequency =
                frequencies
                    .get(&source.name)
                    .ok_or_else(|| NetlistError::UnassignedFrequency {
                        source_name: source.name.clone(),
                        line: source.line,
                    })?;

            info!("solving for source '{}' at {} Hz", source.name, frequency);
            let values = self.solve_at(frequency, Excitation::Only(&source.name))?;
            solution.accumulate(frequency, values);
        }

        if solution.responses.is_empty() {
            // No independent sources: the circuit still has its DC point
            let values = self.solve_at(0.0, Excitation::All)?;
            solution.accumulate(0.0, values);
        }

        Ok(solution)
    }

    fn solve_at(&self, frequency: f64, excitation: Excitation<'_>) -> Result<Vec<Complex64>> {
        MnaSystem::assemble_with(self.circuit, frequency, &self.config, excitation)?.solve()
    }
}
