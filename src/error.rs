//! Error types for the netlist solver.
//!
//! This module provides a unified error type [`NetlistError`] that covers
//! all error conditions that can occur during netlist parsing, circuit
//! validation, MNA assembly and solving.

use thiserror::Error;

/// Result type alias using [`NetlistError`].
pub type Result<T> = std::result::Result<T, NetlistError>;

/// Unified error type for all netlist operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NetlistError {
    // ============ Netlist Parsing Errors ============
    /// Malformed directive or device line
    #[error("Syntax error at line {line}: {message}")]
    Syntax { line: usize, message: String },

    /// Device name starts with an unsupported character
    #[error("Unknown component type '{name}' at line {line} (accepted: R, L, C, V, I, E, G, H, F)")]
    UnknownComponentType { name: String, line: usize },

    /// Node name is not alphanumeric
    #[error("Invalid port name '{port}' at line {line}: only alphanumeric node names are allowed")]
    InvalidPortName { port: String, line: usize },

    /// Device value is not a real or complex literal
    #[error("Invalid value '{value}' for '{name}' at line {line}")]
    InvalidValue {
        name: String,
        value: String,
        line: usize,
    },

    /// Controlling source of a current-controlled device is not a voltage source
    #[error("Invalid dependency '{dependency}' at line {line}: controlling sources must start with V")]
    InvalidDependency { dependency: String, line: usize },

    /// Device name defined twice in one circuit
    #[error("Redefinition of '{name}' at line {line}")]
    DuplicateName { name: String, line: usize },

    /// Frequency assigned twice to the same source
    #[error("Reassignment of frequency to source '{source_name}' at line {line}")]
    DuplicateFrequencyAssignment { source_name: String, line: usize },

    /// AC source used without a matching `.ac` directive
    #[error("AC source '{source_name}' at line {line} has no assigned frequency")]
    UnassignedFrequency { source_name: String, line: usize },

    // ============ Structural Errors ============
    /// Circuit block without any component connected to GND
    #[error("Circuit starting at line {line} has no component connected to GND")]
    MissingGround { line: usize },

    /// `.circuit` found while another block is still open
    #[error("Circuit started at line {open_line} has not ended before the new start at line {line}")]
    NestedCircuit { open_line: usize, line: usize },

    /// `.end` found outside a circuit block
    #[error("Encountered '.end' at line {line} without a matching '.circuit'")]
    UnmatchedEnd { line: usize },

    /// Input ended inside a circuit block
    #[error("Circuit started at line {line} is missing its '.end'")]
    UnterminatedCircuit { line: usize },

    /// No `.circuit` block at all
    #[error("The netlist contains no '.circuit' block")]
    NoCircuit,

    // ============ Assembly and Solving Errors ============
    /// Controlling node or branch current not present in the system
    #[error("Device '{name}' references unknown dependency '{dependency}'")]
    UnknownDependency { name: String, dependency: String },

    /// MNA matrix cannot be inverted
    #[error("Singular MNA system at {frequency} Hz - circuit may have a floating node or a voltage source loop")]
    SingularSystem { frequency: f64 },

    /// Invalid solver configuration
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    // ============ I/O Errors ============
    /// Input file does not have the `.netlist` extension
    #[error("Incorrect file type '{path}': only '.netlist' files are accepted")]
    InvalidFileType { path: String },

    /// Error reading the netlist file
    #[error("Failed to read netlist file '{path}': {message}")]
    FileRead { path: String, message: String },

    // ============ WASM Errors ============
    /// WASM-specific error
    #[cfg(feature = "wasm")]
    #[error("WASM error: {message}")]
    WasmError { message: String },
}

impl NetlistError {
    /// Create a syntax error
    pub fn syntax(line: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            line,
            message: message.into(),
        }
    }

    /// Create an invalid value error
    pub fn invalid_value(name: impl Into<String>, value: impl Into<String>, line: usize) -> Self {
        Self::InvalidValue {
            name: name.into(),
            value: value.into(),
            line,
        }
    }

    /// Create an unknown dependency error
    pub fn unknown_dependency(name: impl Into<String>, dependency: impl Into<String>) -> Self {
        Self::UnknownDependency {
            name: name.into(),
            dependency: dependency.into(),
        }
    }

    /// Source line the error points at, if it has one.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Syntax { line, .. }
            | Self::UnknownComponentType { line, .. }
            | Self::InvalidPortName { line, .. }
            | Self::InvalidValue { line, .. }
            | Self::InvalidDependency { line, .. }
            | Self::DuplicateName { line, .. }
            | Self::DuplicateFrequencyAssignment { line, .. }
            | Self::UnassignedFrequency { line, .. }
            | Self::MissingGround { line }
            | Self::NestedCircuit { line, .. }
            | Self::UnmatchedEnd { line }
            | Self::UnterminatedCircuit { line } => Some(*line),
            _ => None,
        }
    }
}
