//! # Phasor Spice
//!
//! A steady-state linear circuit solver for SPICE-style netlists.
//!
//! This library provides:
//! - A line-oriented netlist parser with line-numbered diagnostics
//! - Modified Nodal Analysis (MNA) with complex admittances
//! - Support for R, L, C, independent V/I sources and the four controlled sources
//! - Superposition across sources running at different frequencies
//!
//! ## Architecture
//!
//! - [`dsl`] - Parser for the netlist format
//! - [`circuit`] - Validated circuit blocks and frequency tables
//! - [`components`] - Component records and admittance models
//! - [`solver`] - MNA assembly, dense LU and the superposition driver
//! - [`report`] - Per-quantity readings and their text form
//!
//! ## Usage
//!
//! ### Native CLI
//!
//! ```bash
//! phasor lowpass.netlist
//! ```
//!
//! ### Library
//!
//! ```
//! use phasor_spice::{dsl, report::Report, Simulator};
//!
//! let netlist = dsl::parse(".circuit\nV1 a GND 10\nR1 a b 1k\nR2 b GND 1k\n.end").unwrap();
//! let solution = Simulator::new(netlist.circuit()).run().unwrap();
//! let report = Report::from_solution(&solution);
//! assert_eq!(report.quantities()[1].to_string(), "Voltage at node b is 5.000 V");
//! ```
//!
//! ## Circuit Simulation Method
//!
//! For each independent source, with all others zeroed:
//!
//! 1. Assemble the system matrix A and source vector z at the source's frequency
//! 2. Solve Ax = z for node voltages and branch currents
//! 3. Add x into the bucket for that frequency
//!
//! Inductors and capacitors at 0 Hz are replaced by a small-epsilon surrogate
//! of an ideal short and open.

pub mod circuit;
pub mod components;
pub mod dsl;
pub mod error;
pub mod report;
pub mod solver;

// Re-export main types for convenience
pub use circuit::Circuit;
pub use error::{NetlistError, Result};
pub use solver::{Simulator, SimulatorConfig, Solution};

// WASM bindings
#[cfg(feature = "wasm")]
mod wasm;

#[cfg(feature = "wasm")]
pub use wasm::WasmNetlist;
