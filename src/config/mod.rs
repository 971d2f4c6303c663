//! Configuration layer: typed settings with layered precedence (file → env → CLI).

mod cli;

use std::str::FromStr;

use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use url::Url;

pub use self::cli::{
    CliArgs, Command, LoggingOverrides, MimeTypesArgs, RenderArgs, RenderOverrides,
};

use crate::application::render::VEGA_MIME_MARKER;

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "nbcell";
const ENV_PREFIX: &str = "NBCELL";
const VECTOR_PLOT_MARKERS_KEY: &str = "render.vector_plot_markers";

/// Fully-resolved settings after precedence resolution and validation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub logging: LoggingSettings,
    pub render: RenderSettings,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Compact,
}

#[derive(Debug, Clone)]
pub struct RenderSettings {
    /// Skip sanitising HTML and markdown payloads.
    pub trusted: bool,
    /// MIME substrings that get a white plot background.
    pub vector_plot_markers: Vec<String>,
    /// Absolute base URL for relative audio sources.
    pub audio_base_url: Option<Url>,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Load settings using the configured precedence (file → environment → CLI).
pub fn load(cli: &CliArgs) -> Result<Settings, LoadError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = cli.config_file.as_ref() {
        builder = builder.add_source(File::from(path.as_path()).required(true));
    }

    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key(VECTOR_PLOT_MARKERS_KEY),
    );

    let mut raw: RawSettings = builder.build()?.try_deserialize()?;

    match &cli.command {
        Command::Render(args) => {
            raw.apply_render_overrides(&args.render);
            raw.apply_logging_overrides(&args.logging);
        }
        Command::MimeTypes(args) => raw.apply_logging_overrides(&args.logging),
    }

    Settings::from_raw(raw)
}

/// Resolve configuration using the supplied CLI arguments, returning both for downstream use.
pub fn load_with_cli() -> Result<(CliArgs, Settings), LoadError> {
    let args = CliArgs::parse();
    let settings = load(&args)?;
    Ok((args, settings))
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    logging: RawLoggingSettings,
    render: RawRenderSettings,
}

impl RawSettings {
    fn apply_logging_overrides(&mut self, overrides: &LoggingOverrides) {
        if let Some(level) = overrides.log_level.as_ref() {
            self.logging.level = Some(level.clone());
        }
        if let Some(json) = overrides.log_json {
            self.logging.json = Some(json);
        }
    }

    fn apply_render_overrides(&mut self, overrides: &RenderOverrides) {
        if let Some(trusted) = overrides.trusted {
            self.render.trusted = Some(trusted);
        }
        if let Some(url) = overrides.audio_base_url.as_ref() {
            self.render.audio_base_url = Some(url.clone());
        }
        if !overrides.vector_plot_markers.is_empty() {
            self.render.vector_plot_markers = Some(overrides.vector_plot_markers.clone());
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawRenderSettings {
    trusted: Option<bool>,
    vector_plot_markers: Option<Vec<String>>,
    audio_base_url: Option<String>,
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        Ok(Self {
            logging: build_logging_settings(raw.logging)?,
            render: build_render_settings(raw.render)?,
        })
    }
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::INFO,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

fn build_render_settings(render: RawRenderSettings) -> Result<RenderSettings, LoadError> {
    let vector_plot_markers = match render.vector_plot_markers {
        None => vec![VEGA_MIME_MARKER.to_string()],
        Some(markers) if markers.is_empty() => {
            return Err(LoadError::invalid(
                VECTOR_PLOT_MARKERS_KEY,
                "must contain at least one marker",
            ));
        }
        Some(markers) => {
            if markers.iter().any(|marker| marker.trim().is_empty()) {
                return Err(LoadError::invalid(
                    VECTOR_PLOT_MARKERS_KEY,
                    "markers must not be blank",
                ));
            }
            markers
        }
    };

    let audio_base_url = match render.audio_base_url {
        None => None,
        Some(value) if value.trim().is_empty() => None,
        Some(value) => Some(parse_base_url(value.trim())?),
    };

    Ok(RenderSettings {
        trusted: render.trusted.unwrap_or(false),
        vector_plot_markers,
        audio_base_url,
    })
}

fn parse_base_url(value: &str) -> Result<Url, LoadError> {
    let url = Url::parse(value).map_err(|err| {
        LoadError::invalid("render.audio_base_url", format!("`{value}`: {err}"))
    })?;
    if url.cannot_be_a_base() {
        return Err(LoadError::invalid(
            "render.audio_base_url",
            format!("`{value}` cannot be used as a base URL"),
        ));
    }
    Ok(url)
}
