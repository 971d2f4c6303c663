use serde_json::Value;

use crate::application::render::types::Payload;
use crate::domain::output::MimeBundle;
use crate::domain::text::concat_multiline_string;

/// Extract the payload for `mime_type`, collapsing multiline strings.
///
/// Single strings and structured values pass through untouched; a list made
/// only of strings is joined so it never displays as a delimited list.
pub(crate) fn normalize_payload(bundle: &MimeBundle, mime_type: &str) -> Payload {
    match bundle.get(mime_type) {
        None | Some(Value::Null) => Payload::Missing,
        Some(Value::String(text)) => Payload::Text(text.clone()),
        Some(value) => match string_fragments(value) {
            Some(fragments) => Payload::Text(concat_multiline_string(&fragments, true)),
            None => Payload::Json(value.clone()),
        },
    }
}

/// Raw text of a bundle entry without trimming: strings verbatim, fragment lists joined.
pub(crate) fn raw_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(text)) => text.clone(),
        Some(other) => match string_fragments(other) {
            Some(fragments) => concat_multiline_string(&fragments, false),
            None => other.to_string(),
        },
        None => String::new(),
    }
}

fn string_fragments(value: &Value) -> Option<Vec<&str>> {
    value
        .as_array()?
        .iter()
        .map(Value::as_str)
        .collect::<Option<Vec<_>>>()
}
