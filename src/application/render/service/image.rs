use serde_json::Value;

use crate::application::render::markup::{Element, Style, StyleValue};
use crate::domain::output::{MIME_JPEG, MIME_PNG, Metadata, MimeBundle, NEEDS_BACKGROUND_KEY};

use super::normalize::raw_text;

/// Render `image/png` (preferred) or `image/jpeg` with notebook image metadata.
///
/// Mirrors the reference notebook's conventions: a scrollable container, a
/// light/dark background from `needs_background`, explicit sizing, and
/// `unconfined` lifting the max-width cap.
pub(crate) fn render_image(bundle: &MimeBundle, metadata: &Metadata) -> Element {
    let mime_type = if bundle.contains_key(MIME_PNG) {
        MIME_PNG
    } else {
        MIME_JPEG
    };
    let src = format!(
        "data:{mime_type};base64,{}",
        raw_text(bundle.get(mime_type))
    );

    let mut container_style = Style::default();
    container_style.set("overflow", StyleValue::keyword("scroll"));
    if let Some(Value::String(background)) = metadata.get(NEEDS_BACKGROUND_KEY) {
        let color = if background == "light" { "white" } else { "black" };
        container_style.set("background-color", StyleValue::keyword(color));
    }

    let mut image_style = Style::default();
    if let Some(image_metadata) = metadata.get(mime_type).and_then(Value::as_object) {
        for key in ["height", "width"] {
            if let Some(value) = image_metadata.get(key).filter(|value| is_truthy(value)) {
                image_style.set(key, style_value(value));
            }
        }
        if image_metadata.get("unconfined") == Some(&Value::Bool(true)) {
            image_style.set("max-width", StyleValue::keyword("none"));
        }
    }

    Element::new("div")
        .with_class("display")
        .with_style(container_style)
        .with_child(
            Element::new("img")
                .with_attribute("src", src)
                .with_style(image_style)
                .into(),
        )
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn style_value(value: &Value) -> StyleValue {
    match value {
        Value::Number(number) => number
            .as_f64()
            .map_or_else(|| StyleValue::keyword(number.to_string()), StyleValue::Pixels),
        Value::String(text) => StyleValue::keyword(text.as_str()),
        other => StyleValue::keyword(other.to_string()),
    }
}
