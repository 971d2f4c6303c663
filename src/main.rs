use std::{
    io::{self, Write},
    process,
};

use nbcell::{
    application::{
        error::AppError,
        render::{
            RenderPipelineConfig, RenderRequest, RenderService, configure_render_service,
            render_service,
        },
    },
    config::{self, MimeTypesArgs, RenderArgs, Settings},
    domain::output::ordered_mime_types,
    infra::{error::InfraError, input, telemetry},
};
use tracing::{Dispatch, Level, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;

fn main() {
    if let Err(error) = run() {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    let report = error.report();
    if dispatcher::has_been_set() {
        error!(error = %report.summary(), source = report.source, "application error");
        return;
    }

    let subscriber = tracing_fmt()
        .with_max_level(Level::ERROR)
        .with_writer(io::stderr)
        .finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %report.summary(), source = report.source, "application error");
    });
}

fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()?;

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match cli_args.command {
        config::Command::Render(args) => run_render(&settings, &args),
        config::Command::MimeTypes(args) => run_mime_types(&args),
    }
}

fn run_render(settings: &Settings, args: &RenderArgs) -> Result<(), AppError> {
    configure_render_service(RenderPipelineConfig::from(&settings.render))?;

    let output = input::read_output(&args.input)?;
    let mime_type = match args.mime_type.as_deref() {
        Some(requested) => requested.to_string(),
        None => output
            .preferred_mime_type()
            .map(str::to_string)
            .ok_or_else(|| AppError::validation("output has no data to render"))?,
    };

    let renderer = render_service();
    let rendered = renderer.render(&RenderRequest::new(&output, &mime_type))?;

    info!(
        target = "nbcell::render",
        mime_type = %mime_type,
        strategy = ?rendered.strategy,
        audio_tracks = rendered.root.audio_tracks().len(),
        "rendered output"
    );

    write_stdout(&rendered.html())
}

fn run_mime_types(args: &MimeTypesArgs) -> Result<(), AppError> {
    let output = input::read_output(&args.input)?;
    let listing = ordered_mime_types(output.data()).join("\n");
    if listing.is_empty() {
        return Ok(());
    }
    write_stdout(&listing)
}

fn write_stdout(text: &str) -> Result<(), AppError> {
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{text}")
        .and_then(|()| stdout.flush())
        .map_err(|err| AppError::from(InfraError::from(err)))
}
