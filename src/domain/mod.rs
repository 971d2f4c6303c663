//! Domain layer types and invariants.

pub mod output;
pub mod text;
