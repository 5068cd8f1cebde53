//! MNA (Modified Nodal Analysis) solver.
//!
//! This module provides the numerical engine for steady-state analysis.
//!
//! ## Modified Nodal Analysis
//!
//! MNA assembles a system of equations Ax = z where:
//! - x contains node voltages and branch currents
//! - A is the complex admittance/coefficient matrix
//! - z is the source vector
//!
//! Unknowns are ordered by discovery: each node voltage the first time a
//! port names it, each voltage-defining device's branch current right after
//! that device. The ground node keeps its row; it is pinned by adding 1 to
//! its diagonal.
//!
//! ## Superposition
//!
//! Sources may run at different frequencies, so a circuit is solved once per
//! independent source with every other independent source set to zero, and
//! the solutions are summed per frequency.

mod linear;
mod mna;
mod simulator;

pub use linear::{solve, ComplexMatrix, LuFactors};
pub use mna::{discover_unknowns, Excitation, MnaSystem};
pub use simulator::{CcvsStamp, FrequencyResponse, Simulator, SimulatorConfig, Solution};

/// Default DC surrogate for ideal inductor shorts and capacitor opens.
pub const DEFAULT_REACTANCE_EPSILON: f64 = 1e-9;
