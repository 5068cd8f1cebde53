//! Circuit representation and validation.
//!
//! This module provides the representation of one `.circuit` ... `.end`
//! block after parsing. The [`Circuit`] struct holds the validated
//! components in file order together with the frequency table that drives
//! its independent sources.

mod block;
mod types;
mod validate;

pub use block::Circuit;
pub use types::*;
pub use validate::{is_valid_name, validate_circuit, validate_component, validate_node_names};
