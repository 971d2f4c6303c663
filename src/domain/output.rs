//! Notebook output records as they appear in nbformat documents.
//!
//! An output owns a MIME bundle (`data`) and presentation hints (`metadata`).
//! Renderers borrow an [`Output`] for the duration of one render call and never
//! mutate it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const MIME_LATEX: &str = "text/latex";
pub const MIME_PNG: &str = "image/png";
pub const MIME_JPEG: &str = "image/jpeg";
pub const MIME_HTML: &str = "text/html";
pub const MIME_MARKDOWN: &str = "text/markdown";
pub const MIME_PLAIN: &str = "text/plain";
pub const MIME_SVG: &str = "image/svg+xml";
pub const MIME_JSON: &str = "application/json";

/// Metadata key carrying the background a plot image needs (`"light"` or dark).
pub const NEEDS_BACKGROUND_KEY: &str = "needs_background";

/// Display preference used when the caller does not name a MIME type.
const MIME_DISPLAY_ORDER: [&str; 12] = [
    "application/vnd.jupyter.widget-view+json",
    "application/vnd.vega.v5+json",
    "application/vnd.vegalite.v4+json",
    "application/javascript",
    MIME_HTML,
    MIME_SVG,
    MIME_PNG,
    MIME_JPEG,
    MIME_MARKDOWN,
    MIME_LATEX,
    MIME_JSON,
    MIME_PLAIN,
];

/// Mapping from MIME type to payload: a string, a list of string fragments, or JSON.
pub type MimeBundle = BTreeMap<String, Value>;

/// Presentation hints keyed by MIME type or by well-known keys such as `needs_background`.
pub type Metadata = serde_json::Map<String, Value>;

/// A rich output event emitted by a notebook cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "output_type", rename_all = "snake_case")]
pub enum Output {
    /// Result of evaluating the last expression of a cell.
    ExecuteResult {
        #[serde(default)]
        data: MimeBundle,
        #[serde(default)]
        metadata: Metadata,
        #[serde(default)]
        execution_count: Option<u32>,
    },
    /// Explicit `display(...)` call.
    DisplayData {
        #[serde(default)]
        data: MimeBundle,
        #[serde(default)]
        metadata: Metadata,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        transient: Option<Value>,
    },
}

impl Output {
    pub fn execute_result(data: MimeBundle) -> Self {
        Self::ExecuteResult {
            data,
            metadata: Metadata::new(),
            execution_count: None,
        }
    }

    pub fn display_data(data: MimeBundle) -> Self {
        Self::DisplayData {
            data,
            metadata: Metadata::new(),
            transient: None,
        }
    }

    pub fn with_metadata(mut self, value: Metadata) -> Self {
        match &mut self {
            Self::ExecuteResult { metadata, .. } | Self::DisplayData { metadata, .. } => {
                *metadata = value;
            }
        }
        self
    }

    pub fn data(&self) -> &MimeBundle {
        match self {
            Self::ExecuteResult { data, .. } | Self::DisplayData { data, .. } => data,
        }
    }

    pub fn metadata(&self) -> &Metadata {
        match self {
            Self::ExecuteResult { metadata, .. } | Self::DisplayData { metadata, .. } => metadata,
        }
    }

    /// Parse a single nbformat output object.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// The richest MIME type present in the bundle, see [`preferred_mime_type`].
    pub fn preferred_mime_type(&self) -> Option<&str> {
        preferred_mime_type(self.data())
    }
}

/// Pick the richest representation in `bundle`, falling back to its first key.
pub fn preferred_mime_type(bundle: &MimeBundle) -> Option<&str> {
    MIME_DISPLAY_ORDER
        .iter()
        .find(|mime| bundle.contains_key(**mime))
        .copied()
        .or_else(|| bundle.keys().next().map(String::as_str))
}

/// All MIME types in `bundle`, known types first in display order, the rest alphabetically.
pub fn ordered_mime_types(bundle: &MimeBundle) -> Vec<&str> {
    let mut ordered: Vec<&str> = MIME_DISPLAY_ORDER
        .iter()
        .filter(|mime| bundle.contains_key(**mime))
        .copied()
        .collect();
    ordered.extend(
        bundle
            .keys()
            .map(String::as_str)
            .filter(|mime| !MIME_DISPLAY_ORDER.contains(mime)),
    );
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_execute_result_with_multiline_payload() {
        let output = Output::from_json_str(
            r#"{
                "output_type": "execute_result",
                "execution_count": 3,
                "data": {"text/plain": ["a", "b"]},
                "metadata": {}
            }"#,
        )
        .expect("valid output");

        assert!(matches!(
            output,
            Output::ExecuteResult {
                execution_count: Some(3),
                ..
            }
        ));
        assert_eq!(output.data()["text/plain"], json!(["a", "b"]));
    }

    #[test]
    fn parses_display_data_without_metadata() {
        let output = Output::from_json_str(
            r#"{"output_type": "display_data", "data": {"text/html": "<p>hi</p>"}}"#,
        )
        .expect("valid output");

        assert!(output.metadata().is_empty());
        assert_eq!(output.preferred_mime_type(), Some(MIME_HTML));
    }

    #[test]
    fn rejects_stream_outputs() {
        let result = Output::from_json_str(r#"{"output_type": "stream", "text": "x"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn preferred_mime_type_favours_rich_representations() {
        let mut bundle = MimeBundle::new();
        bundle.insert(MIME_PLAIN.into(), json!("<Figure>"));
        bundle.insert(MIME_PNG.into(), json!("iVBOR"));
        bundle.insert(MIME_JPEG.into(), json!("/9j/"));

        assert_eq!(preferred_mime_type(&bundle), Some(MIME_PNG));
        assert_eq!(
            ordered_mime_types(&bundle),
            vec![MIME_PNG, MIME_JPEG, MIME_PLAIN]
        );
    }

    #[test]
    fn unknown_types_fall_back_to_first_key() {
        let mut bundle = MimeBundle::new();
        bundle.insert("application/x-custom".into(), json!({}));

        assert_eq!(preferred_mime_type(&bundle), Some("application/x-custom"));
        assert_eq!(preferred_mime_type(&MimeBundle::new()), None);
    }
}
