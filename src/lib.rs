//! Renders Jupyter notebook output records to HTML.
//!
//! The entry point is [`application::render::OutputRenderer`], which picks a
//! strategy from the requested MIME type and delegates payload rendering to a
//! [`application::transforms::TransformRegistry`].

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
