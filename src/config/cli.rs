use std::path::PathBuf;

use clap::{
    Args, Parser, Subcommand, ValueHint,
    builder::{BoolishValueParser, NonEmptyStringValueParser},
};

/// Command-line arguments for the nbcell binary.
#[derive(Debug, Parser)]
#[command(name = "nbcell", version, about = "Render notebook output cells to HTML")]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(long = "config-file", env = "NBCELL_CONFIG_FILE", value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Render one nbformat output record to HTML on stdout.
    Render(RenderArgs),
    /// List the MIME types of an output record in display preference order.
    #[command(name = "mime-types")]
    MimeTypes(MimeTypesArgs),
}

#[derive(Debug, Args, Clone)]
pub struct RenderArgs {
    /// Output record JSON file, or `-` for stdin.
    #[arg(value_name = "OUTPUT", value_hint = ValueHint::FilePath)]
    pub input: PathBuf,

    /// MIME type to display; defaults to the richest type in the bundle.
    #[arg(long = "mime-type", value_name = "TYPE", value_parser = NonEmptyStringValueParser::new())]
    pub mime_type: Option<String>,

    #[command(flatten)]
    pub render: RenderOverrides,

    #[command(flatten)]
    pub logging: LoggingOverrides,
}

#[derive(Debug, Args, Clone)]
pub struct MimeTypesArgs {
    /// Output record JSON file, or `-` for stdin.
    #[arg(value_name = "OUTPUT", value_hint = ValueHint::FilePath)]
    pub input: PathBuf,

    #[command(flatten)]
    pub logging: LoggingOverrides,
}

#[derive(Debug, Args, Default, Clone)]
pub struct RenderOverrides {
    /// Emit HTML and markdown payloads without sanitising them.
    #[arg(long = "trusted", value_name = "BOOL", value_parser = BoolishValueParser::new())]
    pub trusted: Option<bool>,

    /// Base URL that relative audio sources resolve against.
    #[arg(long = "audio-base-url", value_name = "URL")]
    pub audio_base_url: Option<String>,

    /// MIME substring marking vector-plot outputs; repeat to add several.
    #[arg(long = "vector-plot-marker", value_name = "MARKER")]
    pub vector_plot_markers: Vec<String>,
}

#[derive(Debug, Args, Default, Clone)]
pub struct LoggingOverrides {
    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub log_json: Option<bool>,
}
