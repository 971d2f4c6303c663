mod generic;
mod html;
mod image;
mod latex;
mod normalize;
mod plot;

use std::sync::Arc;

use once_cell::sync::{Lazy, OnceCell};
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::application::render::markup::Node;
use crate::application::render::types::{
    RenderError, RenderOutput, RenderRequest, RenderService, Strategy,
};
use crate::application::transforms::{StandardTransforms, TransformRegistry};

use self::generic::GenericStage;
use self::html::AudioExtractor;

pub use self::html::AUDIO_HEADING;
pub use self::plot::{PlotBackgroundPolicy, VEGA_MIME_MARKER};

/// Dispatches one output to the latex, image, HTML, or generic strategy.
///
/// Holds no per-call state: every render borrows the output, builds a fresh
/// tree, and hands it back.
pub struct OutputRenderer {
    transforms: Arc<dyn TransformRegistry>,
    plots: PlotBackgroundPolicy,
    audio: AudioExtractor,
}

impl OutputRenderer {
    pub fn new(transforms: Arc<dyn TransformRegistry>) -> Self {
        Self {
            transforms,
            plots: PlotBackgroundPolicy::default(),
            audio: AudioExtractor::default(),
        }
    }

    /// Build a renderer backed by [`StandardTransforms`] from pipeline settings.
    pub fn from_config(config: &RenderPipelineConfig) -> Self {
        Self::new(Arc::new(StandardTransforms::new(config.trusted)))
            .with_plot_policy(PlotBackgroundPolicy::new(
                config.vector_plot_markers.iter().cloned(),
            ))
            .with_audio_base_url(config.audio_base_url.clone())
    }

    pub fn with_plot_policy(mut self, plots: PlotBackgroundPolicy) -> Self {
        self.plots = plots;
        self
    }

    pub fn with_audio_base_url(mut self, base_url: Option<Url>) -> Self {
        self.audio = AudioExtractor::new(base_url);
        self
    }

    pub fn plot_policy(&self) -> &PlotBackgroundPolicy {
        &self.plots
    }
}

impl RenderService for OutputRenderer {
    fn render(&self, request: &RenderRequest<'_>) -> Result<RenderOutput, RenderError> {
        let mime_type = request.mime_type;
        let bundle = request.output.data();
        let payload = normalize::normalize_payload(bundle, mime_type);
        let strategy = Strategy::for_mime_type(mime_type);

        debug!(
            target = "application::render::dispatch",
            mime_type,
            ?strategy,
            missing = payload.is_missing(),
            "rendering output"
        );

        let generic = GenericStage {
            transforms: self.transforms.as_ref(),
            plots: &self.plots,
            requested_mime_type: mime_type,
        };

        let root = match strategy {
            Strategy::Latex => latex::render_latex(&generic, &payload)?,
            Strategy::Image => image::render_image(bundle, request.output.metadata()),
            Strategy::Html => html::render_html(&generic, &self.audio, &payload, mime_type)?,
            Strategy::Generic => generic.render(&payload, Some(mime_type))?,
        };

        Ok(RenderOutput {
            root: Node::Element(root),
            strategy,
        })
    }
}

/// Settings the shared renderer is built from.
#[derive(Debug, Clone)]
pub struct RenderPipelineConfig {
    /// Emit HTML and markdown payloads without sanitising them.
    pub trusted: bool,
    /// MIME substrings identifying transparent vector-plot specifications.
    pub vector_plot_markers: Vec<String>,
    /// Base URL relative audio sources resolve against.
    pub audio_base_url: Option<Url>,
}

impl Default for RenderPipelineConfig {
    fn default() -> Self {
        Self {
            trusted: false,
            vector_plot_markers: vec![VEGA_MIME_MARKER.to_string()],
            audio_base_url: None,
        }
    }
}

impl From<&crate::config::RenderSettings> for RenderPipelineConfig {
    fn from(settings: &crate::config::RenderSettings) -> Self {
        Self {
            trusted: settings.trusted,
            vector_plot_markers: settings.vector_plot_markers.clone(),
            audio_base_url: settings.audio_base_url.clone(),
        }
    }
}

#[derive(Debug, Error)]
pub enum RenderConfigError {
    #[error("render service already configured")]
    AlreadyConfigured,
}

static RENDER_PIPELINE_CONFIG: OnceCell<RenderPipelineConfig> = OnceCell::new();

static RENDER_SERVICE: Lazy<Arc<OutputRenderer>> =
    Lazy::new(|| Arc::new(OutputRenderer::from_config(&active_render_config())));

/// Access the shared renderer, initialised on first use.
pub fn render_service() -> Arc<OutputRenderer> {
    Arc::clone(&RENDER_SERVICE)
}

/// Install pipeline settings for the shared renderer. Must run before the
/// first [`render_service`] call to take effect.
pub fn configure_render_service(config: RenderPipelineConfig) -> Result<(), RenderConfigError> {
    RENDER_PIPELINE_CONFIG
        .set(config)
        .map_err(|_| RenderConfigError::AlreadyConfigured)
}

fn active_render_config() -> RenderPipelineConfig {
    RENDER_PIPELINE_CONFIG.get().cloned().unwrap_or_default()
}
