//! Component model for netlist devices.
//!
//! Every device line of a netlist becomes one immutable [`Component`]:
//! - Passive: Resistor, Inductor, Capacitor
//! - Independent sources: Voltage Source, Current Source
//! - Controlled sources: VCVS, VCCS, CCVS, CCCS
//!
//! The first character of a device name selects its [`ComponentKind`], and
//! the kind's [`Family`] selects how many tokens the device line carries.

mod linear;
mod sources;

pub use linear::{capacitor_admittance, inductor_admittance, resistor_admittance};
pub use sources::ac_phasor;

use std::fmt;

use num_complex::Complex64;

/// Component types supported by the netlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    /// Resistor
    Resistor,
    /// Inductor
    Inductor,
    /// Capacitor
    Capacitor,
    /// Independent voltage source
    VoltageSource,
    /// Independent current source
    CurrentSource,
    /// Voltage-controlled voltage source
    Vcvs,
    /// Voltage-controlled current source
    Vccs,
    /// Current-controlled voltage source
    Ccvs,
    /// Current-controlled current source
    Cccs,
}

/// Token layout family of a device line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    /// `name p1 p2 value` (R, L, C, V, I)
    TwoTerminal,
    /// `name p1 p2 c1 c2 value` (E, G)
    VoltageControlled,
    /// `name p1 p2 source value` (H, F)
    CurrentControlled,
}

impl ComponentKind {
    /// Parse a component type from the first character of its name.
    pub fn from_prefix(prefix: char) -> Option<Self> {
        match prefix {
            'R' => Some(Self::Resistor),
            'L' => Some(Self::Inductor),
            'C' => Some(Self::Capacitor),
            'V' => Some(Self::VoltageSource),
            'I' => Some(Self::CurrentSource),
            'E' => Some(Self::Vcvs),
            'G' => Some(Self::Vccs),
            'H' => Some(Self::Ccvs),
            'F' => Some(Self::Cccs),
            _ => None,
        }
    }

    /// Parse a component type from a full device name.
    pub fn from_name(name: &str) -> Option<Self> {
        name.chars().next().and_then(Self::from_prefix)
    }

    /// The token layout this kind uses.
    pub fn family(&self) -> Family {
        match self {
            Self::Resistor
            | Self::Inductor
            | Self::Capacitor
            | Self::VoltageSource
            | Self::CurrentSource => Family::TwoTerminal,
            Self::Vcvs | Self::Vccs => Family::VoltageControlled,
            Self::Ccvs | Self::Cccs => Family::CurrentControlled,
        }
    }

    /// Independent sources are the ones switched off during superposition.
    pub fn is_independent_source(&self) -> bool {
        matches!(self, Self::VoltageSource | Self::CurrentSource)
    }

    /// Devices that fix a voltage and need a branch current unknown.
    pub fn needs_branch(&self) -> bool {
        matches!(self, Self::VoltageSource | Self::Vcvs | Self::Ccvs)
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Resistor => "resistor",
            Self::Inductor => "inductor",
            Self::Capacitor => "capacitor",
            Self::VoltageSource => "voltage source",
            Self::CurrentSource => "current source",
            Self::Vcvs => "VCVS",
            Self::Vccs => "VCCS",
            Self::Ccvs => "CCVS",
            Self::Cccs => "CCCS",
        };
        f.write_str(label)
    }
}

/// What a controlled source depends on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Control {
    /// Two-terminal and independent devices
    None,
    /// Controlling voltage `V(nodes[0]) - V(nodes[1])`
    Nodes([String; 2]),
    /// Branch current of the named voltage source
    Source(String),
}

impl Control {
    /// Dependency names in declaration order.
    pub fn names(&self) -> Vec<&str> {
        match self {
            Control::None => Vec::new(),
            Control::Nodes([a, b]) => vec![a.as_str(), b.as_str()],
            Control::Source(s) => vec![s.as_str()],
        }
    }
}

/// One circuit element after parsing and validation.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    pub kind: ComponentKind,
    pub name: String,
    /// [from, to]: current is taken to flow from `ports[0]` to `ports[1]` inside the device
    pub ports: [String; 2],
    pub control: Control,
    /// Resistance, gain or source phasor
    pub value: Complex64,
    /// Source line number for error reporting
    pub line: usize,
}

impl Component {
    /// Create a component.
    pub fn new(
        kind: ComponentKind,
        name: impl Into<String>,
        ports: [String; 2],
        control: Control,
        value: Complex64,
        line: usize,
    ) -> Self {
        Self {
            kind,
            name: name.into(),
            ports,
            control,
            value,
            line,
        }
    }

    /// Real part of the value, for DC-only consumers.
    pub fn dc_value(&self) -> f64 {
        self.value.re
    }

    /// Check whether either port is the named node.
    pub fn touches(&self, node: &str) -> bool {
        self.ports.iter().any(|p| p == node)
    }
}
