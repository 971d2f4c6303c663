use tracing::debug;

use crate::application::render::markup::{Element, Style, StyleValue};
use crate::application::render::types::{Payload, RenderError};
use crate::application::transforms::{TransformContext, TransformRegistry};

use super::plot::PlotBackgroundPolicy;

/// Renders a payload through the transform registered for the requested MIME type.
pub(crate) struct GenericStage<'a> {
    pub(crate) transforms: &'a dyn TransformRegistry,
    pub(crate) plots: &'a PlotBackgroundPolicy,
    /// MIME type the caller asked for; always used for the transform lookup.
    pub(crate) requested_mime_type: &'a str,
}

impl GenericStage<'_> {
    /// `mime_type` only drives the styling hint; strategies that delegate
    /// without one (latex) get no background override.
    pub(crate) fn render(
        &self,
        payload: &Payload,
        mime_type: Option<&str>,
    ) -> Result<Element, RenderError> {
        let transform = self.transforms.resolve(self.requested_mime_type);

        let mut style = Style::default();
        if mime_type.is_some_and(|mime| self.plots.is_vector_plot(mime)) {
            debug!(
                target = "application::render::generic",
                mime_type = self.requested_mime_type,
                "forcing white background for vector plot"
            );
            style.set("background-color", StyleValue::keyword("white"));
        }

        let context = TransformContext {
            mime_type: self.requested_mime_type,
        };
        let rendered = transform.render(payload, &context)?;

        Ok(Element::new("div").with_style(style).with_child(rendered))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::render::markup::Node;
    use crate::application::transforms::Transform;

    struct EchoRegistry;

    fn echo(payload: &Payload, context: &TransformContext<'_>) -> Result<Node, RenderError> {
        Ok(Node::Text(format!(
            "{}:{}",
            context.mime_type,
            payload.to_source_string()
        )))
    }

    impl TransformRegistry for EchoRegistry {
        fn resolve(&self, _mime_type: &str) -> &dyn Transform {
            &echo
        }
    }

    fn stage<'a>(plots: &'a PlotBackgroundPolicy, mime: &'a str) -> GenericStage<'a> {
        GenericStage {
            transforms: &EchoRegistry,
            plots,
            requested_mime_type: mime,
        }
    }

    #[test]
    fn vector_plots_get_white_background() {
        let plots = PlotBackgroundPolicy::default();
        let mime = "application/vnd.vegalite.v4+json";
        let element = stage(&plots, mime)
            .render(&Payload::Text("{}".into()), Some(mime))
            .expect("renders");

        assert_eq!(
            element.style.get("background-color"),
            Some(&StyleValue::keyword("white"))
        );
    }

    #[test]
    fn other_types_get_no_background() {
        let plots = PlotBackgroundPolicy::default();
        let element = stage(&plots, "text/plain")
            .render(&Payload::Text("x".into()), Some("text/plain"))
            .expect("renders");

        assert!(element.style.is_empty());
        assert_eq!(element.children, vec![Node::Text("text/plain:x".into())]);
    }

    #[test]
    fn absent_hint_skips_styling_but_keeps_requested_lookup() {
        let plots = PlotBackgroundPolicy::new(["text/latex"]);
        let element = stage(&plots, "text/latex")
            .render(&Payload::Text("$$x$$".into()), None)
            .expect("renders");

        assert!(element.style.is_empty());
        assert_eq!(element.children, vec![Node::Text("text/latex:$$x$$".into())]);
    }
}
