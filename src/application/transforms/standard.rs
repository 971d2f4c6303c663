use std::sync::Arc;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde_json::Value;
use tracing::warn;

use crate::application::render::{Element, Node, Payload, RenderError};
use crate::domain::output::{MIME_HTML, MIME_JSON, MIME_LATEX, MIME_MARKDOWN, MIME_SVG};

use super::config::{build_output_sanitizer, default_options};
use super::math::{MathSegment, render_math_html, split_math_segments};
use super::{Transform, TransformContext, TransformRegistry};

type Sanitizer = Arc<ammonia::Builder<'static>>;

/// Default registry covering the MIME types notebooks commonly emit.
///
/// Markup transforms sanitise their input unless the registry is built as
/// trusted. Unknown MIME types fall back to an escaped text rendering.
pub struct StandardTransforms {
    html: HtmlTransform,
    markdown: MarkdownTransform,
    latex: LatexTransform,
    svg: SvgTransform,
    image: ImageTransform,
    json: JsonTransform,
    plain: PlainTextTransform,
}

impl StandardTransforms {
    pub fn new(trusted: bool) -> Self {
        let sanitizer: Option<Sanitizer> = (!trusted).then(|| Arc::new(build_output_sanitizer()));
        Self {
            html: HtmlTransform {
                sanitizer: sanitizer.clone(),
            },
            markdown: MarkdownTransform { sanitizer },
            latex: LatexTransform,
            svg: SvgTransform,
            image: ImageTransform,
            json: JsonTransform,
            plain: PlainTextTransform,
        }
    }
}

impl Default for StandardTransforms {
    fn default() -> Self {
        Self::new(false)
    }
}

impl TransformRegistry for StandardTransforms {
    fn resolve(&self, mime_type: &str) -> &dyn Transform {
        match mime_type {
            MIME_HTML => &self.html,
            MIME_MARKDOWN => &self.markdown,
            MIME_LATEX => &self.latex,
            MIME_SVG => &self.svg,
            mime if mime.starts_with("image/") => &self.image,
            mime if is_json_mime(mime) => &self.json,
            _ => &self.plain,
        }
    }
}

fn is_json_mime(mime_type: &str) -> bool {
    mime_type == MIME_JSON || mime_type.ends_with("+json")
}

fn sanitize(sanitizer: Option<&Sanitizer>, html: &str) -> String {
    match sanitizer {
        Some(builder) => builder.clean(html).to_string(),
        None => html.to_string(),
    }
}

struct HtmlTransform {
    sanitizer: Option<Sanitizer>,
}

impl Transform for HtmlTransform {
    fn render(&self, payload: &Payload, _: &TransformContext<'_>) -> Result<Node, RenderError> {
        if payload.is_missing() {
            return Ok(Node::empty());
        }
        let source = payload.to_source_string();
        Ok(Node::Html(sanitize(self.sanitizer.as_ref(), &source)))
    }
}

struct MarkdownTransform {
    sanitizer: Option<Sanitizer>,
}

impl Transform for MarkdownTransform {
    fn render(&self, payload: &Payload, _: &TransformContext<'_>) -> Result<Node, RenderError> {
        if payload.is_missing() {
            return Ok(Node::empty());
        }
        let html = comrak::markdown_to_html(&payload.to_source_string(), &default_options());
        Ok(Node::Html(sanitize(self.sanitizer.as_ref(), &html)))
    }
}

struct LatexTransform;

impl Transform for LatexTransform {
    fn render(&self, payload: &Payload, context: &TransformContext<'_>) -> Result<Node, RenderError> {
        if payload.is_missing() {
            return Ok(Node::empty());
        }

        let source = payload.to_source_string();
        let mut container = Element::new("div").with_class("latex-output");
        for segment in split_math_segments(&source) {
            let node = match segment {
                MathSegment::Text(text) => Node::Text(text.to_string()),
                MathSegment::Math { literal, display } => {
                    match render_math_html(literal, display) {
                        Ok(html) => Node::Html(html),
                        Err(err) => {
                            warn!(
                                target = "application::transforms::latex",
                                mime_type = context.mime_type,
                                error = %err,
                                "falling back to raw latex"
                            );
                            math_fallback(literal, display)
                        }
                    }
                }
            };
            container.push_child(node);
        }
        Ok(container.into())
    }
}

fn math_fallback(literal: &str, display: bool) -> Node {
    let tag = if display { "pre" } else { "code" };
    let style = if display { "display" } else { "inline" };
    Element::new(tag)
        .with_attribute("data-math-style", style)
        .with_text(literal)
        .into()
}

struct SvgTransform;

impl Transform for SvgTransform {
    fn render(&self, payload: &Payload, context: &TransformContext<'_>) -> Result<Node, RenderError> {
        let Some(svg) = payload.as_text() else {
            return Ok(Node::empty());
        };
        let src = format!(
            "data:{};base64,{}",
            context.mime_type,
            STANDARD.encode(svg.as_bytes())
        );
        Ok(Element::new("img").with_attribute("src", src).into())
    }
}

/// Raster images whose payload is already base64 text.
struct ImageTransform;

impl Transform for ImageTransform {
    fn render(&self, payload: &Payload, context: &TransformContext<'_>) -> Result<Node, RenderError> {
        let Some(encoded) = payload.as_text() else {
            return Ok(Node::empty());
        };
        let src = format!("data:{};base64,{}", context.mime_type, encoded.trim());
        Ok(Element::new("img").with_attribute("src", src).into())
    }
}

struct JsonTransform;

impl Transform for JsonTransform {
    fn render(&self, payload: &Payload, context: &TransformContext<'_>) -> Result<Node, RenderError> {
        let value = match payload {
            Payload::Missing => return Ok(Node::empty()),
            Payload::Json(value) => value.clone(),
            Payload::Text(text) => {
                serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.clone()))
            }
        };
        let pretty = serde_json::to_string_pretty(&value)
            .map_err(|err| RenderError::transform(context.mime_type, err.to_string()))?;

        Ok(Element::new("pre")
            .with_class("json")
            .with_attribute("data-mime-type", context.mime_type)
            .with_text(pretty)
            .into())
    }
}

struct PlainTextTransform;

impl Transform for PlainTextTransform {
    fn render(&self, payload: &Payload, context: &TransformContext<'_>) -> Result<Node, RenderError> {
        let text = match payload {
            Payload::Missing => return Ok(Node::empty()),
            Payload::Text(text) => text.clone(),
            Payload::Json(value) => serde_json::to_string_pretty(value)
                .map_err(|err| RenderError::transform(context.mime_type, err.to_string()))?,
        };
        Ok(Element::new("pre").with_text(text).into())
    }
}
