use crate::application::render::markup::Element;
use crate::application::render::types::{Payload, RenderError};
use crate::domain::text::{concat_multiline_string, fix_markdown};

use super::generic::GenericStage;

/// Wrap latex in `$$` delimiters and hand it to the generic stage without a styling hint.
pub(crate) fn render_latex(
    generic: &GenericStage<'_>,
    payload: &Payload,
) -> Result<Element, RenderError> {
    let fixed = match payload {
        Payload::Missing => Payload::Missing,
        other => {
            let text = concat_multiline_string(&[other.to_source_string()], true);
            Payload::Text(fix_markdown(&text, true))
        }
    };
    generic.render(&fixed, None)
}
