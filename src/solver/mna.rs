//! MNA system assembly.

use std::collections::HashMap;

use log::{debug, trace};
use num_complex::Complex64;

use super::linear::{self, ComplexMatrix};
use super::simulator::{CcvsStamp, SimulatorConfig};
use crate::circuit::{Circuit, Unknown, GROUND};
use crate::components::{
    capacitor_admittance, inductor_admittance, resistor_admittance, Component, ComponentKind,
    Control,
};
use crate::error::{NetlistError, Result};

const ONE: Complex64 = Complex64::new(1.0, 0.0);
const ZERO: Complex64 = Complex64::new(0.0, 0.0);

/// Which independent sources drive a solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Excitation<'a> {
    /// Every independent source at its own value
    All,
    /// Only the named source; every other independent source contributes 0
    Only(&'a str),
}

impl Excitation<'_> {
    /// Value an independent source contributes under this excitation.
    fn source_value(&self, component: &Component) -> Complex64 {
        match self {
            Excitation::All => component.value,
            Excitation::Only(name) if *name == component.name => component.value,
            Excitation::Only(_) => ZERO,
        }
    }
}

/// Ordered unknowns of a circuit: node voltages in first-seen order, each
/// voltage-defining device's branch current right after its ports.
pub fn discover_unknowns(components: &[Component]) -> Vec<Unknown> {
    let mut unknowns = Vec::new();
    for component in components {
        for port in &component.ports {
            let voltage = Unknown::Voltage(port.clone());
            if !unknowns.contains(&voltage) {
                unknowns.push(voltage);
            }
        }
        if component.kind.needs_branch() {
            unknowns.push(Unknown::Current(component.name.clone()));
        }
    }
    unknowns
}

/// MNA system `matrix * x = vector` for one excitation frequency.
#[derive(Debug, Clone, PartialEq)]
pub struct MnaSystem {
    /// Excitation frequency in Hz
    pub frequency: f64,
    /// System matrix
    pub matrix: ComplexMatrix,
    /// Source vector
    pub vector: Vec<Complex64>,
    /// Meaning of each row/column
    pub unknowns: Vec<Unknown>,
    index: HashMap<Unknown, usize>,
}

impl MnaSystem {
    /// Assemble the system with every independent source active.
    pub fn assemble(circuit: &Circuit, frequency: f64, config: &SimulatorConfig) -> Result<Self> {
        Self::assemble_with(circuit, frequency, config, Excitation::All)
    }

    /// Assemble the system with the given sources active.
    pub fn assemble_with(
        circuit: &Circuit,
        frequency: f64,
        config: &SimulatorConfig,
        excitation: Excitation<'_>,
    ) -> Result<Self> {
        let unknowns = discover_unknowns(circuit.components());
        let index = unknowns
            .iter()
            .enumerate()
            .map(|(i, u)| (u.clone(), i))
            .collect();
        let size = unknowns.len();

        let mut system = Self {
            frequency,
            matrix: ComplexMatrix::zeros(size),
            vector: vec![ZERO; size],
            unknowns,
            index,
        };

        for component in circuit.components() {
            system.stamp(component, config, excitation)?;
        }

        // Pin the reference node without removing its row
        let gnd = system
            .voltage_index(GROUND)
            .ok_or(NetlistError::MissingGround {
                line: circuit.start_line(),
            })?;
        system.matrix.add(gnd, gnd, ONE);

        debug!(
            "assembled {}x{} MNA system at {} Hz",
            size, size, frequency
        );
        Ok(system)
    }

    /// Solve the assembled system.
    pub fn solve(&self) -> Result<Vec<Complex64>> {
        linear::solve(&self.matrix, &self.vector, self.frequency)
    }

    /// Row/column of a node voltage.
    pub fn voltage_index(&self, node: &str) -> Option<usize> {
        self.index.get(&Unknown::Voltage(node.to_string())).copied()
    }

    /// Row/column of a device branch current.
    pub fn current_index(&self, device: &str) -> Option<usize> {
        self.index.get(&Unknown::Current(device.to_string())).copied()
    }

    /// Unknown names as `V_<node>` / `I_<device>` strings.
    pub fn node_names(&self) -> Vec<String> {
        self.unknowns.iter().map(ToString::to_string).collect()
    }

    fn stamp(
        &mut self,
        component: &Component,
        config: &SimulatorConfig,
        excitation: Excitation<'_>,
    ) -> Result<()> {
        let n1 = self.port_index(component, 0);
        let n2 = self.port_index(component, 1);
        let value = component.value;
        let epsilon = config.reactance_epsilon;
        trace!("stamping {} '{}' ({}, {})", component.kind, component.name, n1, n2);

        match component.kind {
            ComponentKind::Resistor => {
                self.stamp_admittance(n1, n2, resistor_admittance(value));
            }

            ComponentKind::Inductor => {
                self.stamp_admittance(n1, n2, inductor_admittance(value, self.frequency, epsilon));
            }

            ComponentKind::Capacitor => {
                self.stamp_admittance(n1, n2, capacitor_admittance(value, self.frequency, epsilon));
            }

            ComponentKind::VoltageSource => {
                let k = self.branch_index(component);
                self.stamp_branch(n1, n2, k);
                self.vector[k] += excitation.source_value(component);
            }

            ComponentKind::CurrentSource => {
                // Current flows from port 0 to port 1 through the source
                let i = excitation.source_value(component);
                self.vector[n1] -= i;
                self.vector[n2] += i;
            }

            ComponentKind::Vcvs => {
                let k = self.branch_index(component);
                let (c1, c2) = self.control_nodes(component)?;
                self.stamp_branch(n1, n2, k);
                self.matrix.add(k, c1, -value);
                self.matrix.add(k, c2, value);
            }

            ComponentKind::Vccs => {
                let (c1, c2) = self.control_nodes(component)?;
                self.matrix.add(n1, c1, value);
                self.matrix.add(n1, c2, -value);
                self.matrix.add(n2, c1, -value);
                self.matrix.add(n2, c2, value);
            }

            ComponentKind::Ccvs => {
                let k = self.branch_index(component);
                let dep = self.control_branch(component)?;
                match config.ccvs_stamp {
                    // Only n1 is coupled to the controlling current, and the
                    // branch column stays empty.
                    CcvsStamp::Reference => {
                        self.matrix.add(k, n1, ONE);
                        self.matrix.add(k, n2, -ONE);
                        self.matrix.add(n1, dep, -value);
                    }
                    CcvsStamp::Textbook => {
                        self.stamp_branch(n1, n2, k);
                        self.matrix.add(k, dep, -value);
                    }
                }
            }

            ComponentKind::Cccs => {
                let dep = self.control_branch(component)?;
                self.matrix.add(n1, dep, value);
                self.matrix.add(n2, dep, -value);
            }
        }

        Ok(())
    }

    /// Stamp an admittance between two nodes.
    ///   A[n1,n1] += y
    ///   A[n2,n2] += y
    ///   A[n1,n2] -= y
    ///   A[n2,n1] -= y
    fn stamp_admittance(&mut self, n1: usize, n2: usize, y: Complex64) {
        self.matrix.add(n1, n1, y);
        self.matrix.add(n2, n2, y);
        self.matrix.add(n1, n2, -y);
        self.matrix.add(n2, n1, -y);
    }

    /// Stamp the incidence of a branch current `k` between two nodes and
    /// its KVL row `V[n1] - V[n2]`.
    fn stamp_branch(&mut self, n1: usize, n2: usize, k: usize) {
        self.matrix.add(n1, k, -ONE);
        self.matrix.add(n2, k, ONE);
        self.matrix.add(k, n1, ONE);
        self.matrix.add(k, n2, -ONE);
    }

    fn port_index(&self, component: &Component, port: usize) -> usize {
        // Every port was registered by discover_unknowns
        self.index[&Unknown::Voltage(component.ports[port].clone())]
    }

    fn branch_index(&self, component: &Component) -> usize {
        self.index[&Unknown::Current(component.name.clone())]
    }

    fn control_nodes(&self, component: &Component) -> Result<(usize, usize)> {
        let Control::Nodes([c1, c2]) = &component.control else {
            return Err(NetlistError::unknown_dependency(&component.name, "<controlling nodes>"));
        };
        let lookup = |node: &String| {
            self.voltage_index(node)
                .ok_or_else(|| NetlistError::unknown_dependency(&component.name, node.as_str()))
        };
        Ok((lookup(c1)?, lookup(c2)?))
    }

    fn control_branch(&self, component: &Component) -> Result<usize> {
        let Control::Source(source) = &component.control else {
            return Err(NetlistError::unknown_dependency(&component.name, "<controlling source>"));
        };
        self.current_index(source)
            .ok_or_else(|| NetlistError::unknown_dependency(&component.name, source.as_str()))
    }
}
