//! Steady-state readings for every node voltage and branch current.
//!
//! A [`Report`] turns a [`Solution`] into one [`Reading`] per quantity. A
//! circuit driven only at 0 Hz reads as a plain real number; anything else is
//! a sum of cosines, one [`Term`] per frequency:
//!
//! ```text
//! Voltage at node out is 0.707*cos(6283.185t+(-45.000 deg)) V
//! ```

use std::f64::consts::PI;
use std::fmt;

use num_complex::Complex64;

use crate::circuit::Unknown;
use crate::solver::Solution;

/// Magnitudes and phases below this are reported as exactly zero.
pub const REPORT_THRESHOLD: f64 = 1e-10;

/// One sinusoid of a reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Term {
    /// Frequency in Hz
    pub frequency: f64,
    /// Phasor magnitude
    pub magnitude: f64,
    /// Phasor angle in degrees
    pub phase_degrees: f64,
}

impl Term {
    /// Build a term from a solved phasor, flushing values below
    /// [`REPORT_THRESHOLD`] to zero.
    pub fn from_phasor(frequency: f64, phasor: Complex64) -> Self {
        let mut magnitude = phasor.norm();
        let mut phase_degrees = phasor.arg().to_degrees();

        if magnitude < REPORT_THRESHOLD {
            magnitude = 0.0;
            phase_degrees = 0.0;
        }
        if phase_degrees.abs() < REPORT_THRESHOLD {
            phase_degrees = 0.0;
        }

        Self {
            frequency,
            magnitude,
            phase_degrees,
        }
    }

    /// Angular frequency in rad/s.
    pub fn angular_frequency(&self) -> f64 {
        2.0 * PI * self.frequency
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let omega = self.angular_frequency();
        if self.phase_degrees != 0.0 {
            write!(
                f,
                "{:.3}*cos({:.3}t+({:.3} deg))",
                self.magnitude, omega, self.phase_degrees
            )
        } else if self.magnitude == 0.0 {
            write!(f, "0")
        } else if omega == 0.0 {
            write!(f, "{:.3}", self.magnitude)
        } else {
            write!(f, "{:.3}*cos({:.3}t)", self.magnitude, omega)
        }
    }
}

/// Value of one quantity.
#[derive(Debug, Clone, PartialEq)]
pub enum Reading {
    /// DC-only circuit: the real part of the solution
    Real(f64),
    /// One term per distinct frequency, ascending
    Terms(Vec<Term>),
}

impl Reading {
    /// DC reading, flushing values below [`REPORT_THRESHOLD`] to zero.
    pub fn real(value: f64) -> Self {
        if value.abs() < REPORT_THRESHOLD {
            Reading::Real(0.0)
        } else {
            Reading::Real(value)
        }
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reading::Real(value) => write!(f, "{:.3}", value),
            Reading::Terms(terms) => {
                for (i, term) in terms.iter().enumerate() {
                    if i > 0 {
                        write!(f, " + ")?;
                    }
                    write!(f, "{}", term)?;
                }
                Ok(())
            }
        }
    }
}

/// A node voltage or branch current together with its reading.
#[derive(Debug, Clone, PartialEq)]
pub struct Quantity {
    pub unknown: Unknown,
    pub reading: Reading,
}

impl Quantity {
    pub fn unit(&self) -> &'static str {
        match self.unknown {
            Unknown::Voltage(_) => "V",
            Unknown::Current(_) => "A",
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.unknown {
            Unknown::Voltage(node) => write!(f, "Voltage at node {} is ", node)?,
            Unknown::Current(source) => write!(f, "Current through source {} is ", source)?,
        }
        write!(f, "{} {}", self.reading, self.unit())
    }
}

/// Readings for a whole circuit: node voltages first, then branch currents,
/// each in unknown order. The ground node is omitted.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Report {
    quantities: Vec<Quantity>,
}

impl Report {
    pub fn from_solution(solution: &Solution) -> Self {
        let dc_only = solution.is_dc_only();

        let reading = |idx: usize| {
            if dc_only {
                let value = solution
                    .responses
                    .first()
                    .map(|r| r.values[idx].re)
                    .unwrap_or(0.0);
                Reading::real(value)
            } else {
                Reading::Terms(
                    solution
                        .responses
                        .iter()
                        .map(|r| Term::from_phasor(r.frequency, r.values[idx]))
                        .collect(),
                )
            }
        };

        let voltages = solution
            .unknowns
            .iter()
            .enumerate()
            .filter(|(_, u)| matches!(u, Unknown::Voltage(_)) && !u.is_ground());
        let currents = solution
            .unknowns
            .iter()
            .enumerate()
            .filter(|(_, u)| matches!(u, Unknown::Current(_)));

        let quantities = voltages
            .chain(currents)
            .map(|(idx, unknown)| Quantity {
                unknown: unknown.clone(),
                reading: reading(idx),
            })
            .collect();

        Self { quantities }
    }

    pub fn quantities(&self) -> &[Quantity] {
        &self.quantities
    }

    /// Reading of an unknown given as `V_<node>` or `I_<device>`.
    pub fn get(&self, name: &str) -> Option<&Reading> {
        self.quantities
            .iter()
            .find(|q| q.unknown.to_string() == name)
            .map(|q| &q.reading)
    }

    pub fn voltages(&self) -> impl Iterator<Item = &Quantity> {
        self.quantities
            .iter()
            .filter(|q| matches!(q.unknown, Unknown::Voltage(_)))
    }

    pub fn currents(&self) -> impl Iterator<Item = &Quantity> {
        self.quantities
            .iter()
            .filter(|q| matches!(q.unknown, Unknown::Current(_)))
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for quantity in &self.quantities {
            writeln!(f, "{}", quantity)?;
        }
        Ok(())
    }
}
