use serde_json::Value;
use thiserror::Error;

use crate::domain::output::Output;

use super::markup::Node;

/// Normalised payload for one MIME type of an output bundle.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// The bundle has no entry (or a `null` entry) for the requested type.
    Missing,
    /// A string, or a multiline string collapsed into one.
    Text(String),
    /// Any other structured value.
    Json(Value),
}

impl Payload {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Payload::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Payload::Missing)
    }

    /// String form of the payload, as used when re-parsing it as markup.
    pub fn to_source_string(&self) -> String {
        match self {
            Payload::Missing => String::new(),
            Payload::Text(text) => text.clone(),
            Payload::Json(value) => value.to_string(),
        }
    }
}

/// A media source URL found in embedded `<audio>` markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioTrack {
    pub src: String,
}

impl AudioTrack {
    pub fn new(src: impl Into<String>) -> Self {
        Self { src: src.into() }
    }
}

/// The four rendering behaviours an output can be routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Latex,
    Image,
    Html,
    Generic,
}

impl Strategy {
    /// Route a MIME type by literal match; anything unrecognised is generic.
    pub fn for_mime_type(mime_type: &str) -> Self {
        match mime_type {
            "text/latex" => Strategy::Latex,
            "image/png" | "image/jpeg" => Strategy::Image,
            "text/html" => Strategy::Html,
            _ => Strategy::Generic,
        }
    }
}

/// Rendering request: one borrowed output and the MIME type to display.
#[derive(Debug, Clone, Copy)]
pub struct RenderRequest<'a> {
    pub output: &'a Output,
    pub mime_type: &'a str,
}

impl<'a> RenderRequest<'a> {
    pub fn new(output: &'a Output, mime_type: &'a str) -> Self {
        Self { output, mime_type }
    }
}

/// Rendering result handed to the host.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOutput {
    /// Presentational tree for the cell output.
    pub root: Node,
    /// Strategy the dispatcher selected.
    pub strategy: Strategy,
}

impl RenderOutput {
    pub fn html(&self) -> String {
        self.root.to_html()
    }
}

/// Errors surfaced while rendering. The dispatcher itself raises none; these
/// originate in transforms and propagate unchanged.
#[derive(Debug, Clone, Error)]
pub enum RenderError {
    #[error("transform for `{mime_type}` failed: {message}")]
    Transform { mime_type: String, message: String },
    #[error("math rendering failed: {message}")]
    Math { message: String },
    #[error("document processing failed: {message}")]
    Document { message: String },
}

impl RenderError {
    pub fn transform(mime_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transform {
            mime_type: mime_type.into(),
            message: message.into(),
        }
    }
}

/// Trait exposed by the output renderer. Implementations hold no state across
/// calls: the same request always yields the same tree or error.
pub trait RenderService: Send + Sync {
    fn render(&self, request: &RenderRequest<'_>) -> Result<RenderOutput, RenderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatch_table_matches_literally() {
        assert_eq!(Strategy::for_mime_type("text/latex"), Strategy::Latex);
        assert_eq!(Strategy::for_mime_type("image/png"), Strategy::Image);
        assert_eq!(Strategy::for_mime_type("image/jpeg"), Strategy::Image);
        assert_eq!(Strategy::for_mime_type("text/html"), Strategy::Html);
    }

    #[test]
    fn everything_else_is_generic() {
        for mime in [
            "image/gif",
            "image/svg+xml",
            "text/html; charset=utf-8",
            "text/latex+x",
            "application/vnd.vega.v5+json",
            "text/plain",
            "",
        ] {
            assert_eq!(Strategy::for_mime_type(mime), Strategy::Generic, "{mime}");
        }
    }

    #[test]
    fn source_string_of_missing_payload_is_empty() {
        assert_eq!(Payload::Missing.to_source_string(), "");
        assert_eq!(
            Payload::Json(serde_json::json!({"a": 1})).to_source_string(),
            r#"{"a":1}"#
        );
    }
}
