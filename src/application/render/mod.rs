//! Cell output rendering.
//!
//! The renderer is a pure function of an output record and the MIME type to
//! display: it normalises the payload, routes it to exactly one strategy, and
//! returns a presentational tree. Nothing is cached or shared between calls.

mod markup;
mod service;
mod types;

pub use markup::{Element, Node, Style, StyleValue};
pub use service::{
    AUDIO_HEADING, OutputRenderer, PlotBackgroundPolicy, RenderConfigError, RenderPipelineConfig,
    VEGA_MIME_MARKER, configure_render_service, render_service,
};
pub use types::{
    AudioTrack, Payload, RenderError, RenderOutput, RenderRequest, RenderService, Strategy,
};
