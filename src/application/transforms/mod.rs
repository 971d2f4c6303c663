//! Pluggable per-MIME render transforms.
//!
//! The output renderer only knows how to look a transform up by MIME type and
//! invoke it. [`StandardTransforms`] is the registry shipped with the crate;
//! hosts and tests inject their own through [`TransformRegistry`].

mod config;
mod math;
mod standard;

use crate::application::render::{Node, Payload, RenderError};

pub use standard::StandardTransforms;

/// Context passed to a transform alongside the payload.
#[derive(Debug, Clone, Copy)]
pub struct TransformContext<'a> {
    /// MIME type the caller asked to display.
    pub mime_type: &'a str,
}

/// Turns a payload of one MIME type into presentational output.
pub trait Transform: Send + Sync {
    fn render(&self, payload: &Payload, context: &TransformContext<'_>)
    -> Result<Node, RenderError>;
}

impl<F> Transform for F
where
    F: Fn(&Payload, &TransformContext<'_>) -> Result<Node, RenderError> + Send + Sync,
{
    fn render(
        &self,
        payload: &Payload,
        context: &TransformContext<'_>,
    ) -> Result<Node, RenderError> {
        self(payload, context)
    }
}

/// Lookup from MIME type to transform. Must be total: unknown types resolve to
/// a fallback transform rather than failing.
pub trait TransformRegistry: Send + Sync {
    fn resolve(&self, mime_type: &str) -> &dyn Transform;
}
