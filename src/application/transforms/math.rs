use katex::{OptsBuilder, OutputType};

use crate::application::render::RenderError;

/// A run of latex output text, split on `$`/`$$` delimiters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum MathSegment<'a> {
    Text(&'a str),
    Math { literal: &'a str, display: bool },
}

/// Render a KaTeX expression to HTML, returning an inline (`<span>`) or block fragment.
pub(crate) fn render_math_html(literal: &str, display_mode: bool) -> Result<String, RenderError> {
    let mut builder = OptsBuilder::default();
    builder.display_mode(display_mode);
    builder.output_type(OutputType::Html);

    let opts = builder.build().map_err(|err| RenderError::Math {
        message: format!("failed to build KaTeX options: {err}"),
    })?;

    katex::render_with_opts(literal, opts).map_err(|err| RenderError::Math {
        message: format!("KaTeX rendering failed: {err}"),
    })
}

/// Split text into plain and math segments. An unterminated delimiter leaves
/// the remainder as plain text.
pub(crate) fn split_math_segments(text: &str) -> Vec<MathSegment<'_>> {
    let mut segments = Vec::new();
    let mut plain_start = 0usize;
    let mut cursor = 0usize;

    while cursor < text.len() {
        let rest = &text[cursor..];
        if rest.starts_with("\\$") {
            cursor += 2;
            continue;
        }

        let delimiter = if rest.starts_with("$$") {
            "$$"
        } else if rest.starts_with('$') {
            "$"
        } else {
            cursor += rest.chars().next().map_or(1, char::len_utf8);
            continue;
        };

        let body_start = cursor + delimiter.len();
        let Some(body_len) = text[body_start..].find(delimiter) else {
            break;
        };

        if plain_start < cursor {
            segments.push(MathSegment::Text(&text[plain_start..cursor]));
        }
        segments.push(MathSegment::Math {
            literal: &text[body_start..body_start + body_len],
            display: delimiter == "$$",
        });
        cursor = body_start + body_len + delimiter.len();
        plain_start = cursor;
    }

    if plain_start < text.len() {
        segments.push(MathSegment::Text(&text[plain_start..]));
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_display_and_inline_math() {
        let segments = split_math_segments("area $$\\pi r^2$$ and $x$.");
        assert_eq!(
            segments,
            vec![
                MathSegment::Text("area "),
                MathSegment::Math {
                    literal: "\\pi r^2",
                    display: true
                },
                MathSegment::Text(" and "),
                MathSegment::Math {
                    literal: "x",
                    display: false
                },
                MathSegment::Text("."),
            ]
        );
    }

    #[test]
    fn unterminated_delimiter_is_plain_text() {
        assert_eq!(
            split_math_segments("costs $5"),
            vec![MathSegment::Text("costs $5")]
        );
        assert_eq!(
            split_math_segments("\\$ escaped"),
            vec![MathSegment::Text("\\$ escaped")]
        );
    }

    #[test]
    fn renders_display_math_with_katex() {
        let html = render_math_html("x^2", true).expect("katex renders");
        assert!(html.contains("class=\"katex"));
    }
}
