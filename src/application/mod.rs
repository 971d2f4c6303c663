//! Application services: output rendering and the transforms it delegates to.

pub mod error;
pub mod render;
pub mod transforms;
