//! Reads nbformat output records from a file or stdin.

use std::{
    fs,
    io::{self, Read},
    path::Path,
};

use tracing::debug;

use crate::domain::output::Output;

use super::error::InfraError;

/// Path argument that selects stdin.
pub const STDIN_MARKER: &str = "-";

/// Read the raw text of `path`, or stdin when `path` is `-`.
pub fn read_source(path: &Path) -> Result<String, InfraError> {
    if path.as_os_str() == STDIN_MARKER {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|err| InfraError::input("<stdin>", err.to_string()))?;
        return Ok(buffer);
    }

    fs::read_to_string(path)
        .map_err(|err| InfraError::input(path.display().to_string(), err.to_string()))
}

/// Read and decode one output record.
pub fn read_output(path: &Path) -> Result<Output, InfraError> {
    let source_name = display_name(path);
    let raw = read_source(path)?;
    let output = Output::from_json_str(&raw)
        .map_err(|err| InfraError::input(source_name.clone(), err.to_string()))?;

    debug!(
        target = "infra::input",
        source = %source_name,
        mime_types = output.data().len(),
        "decoded output record"
    );
    Ok(output)
}

fn display_name(path: &Path) -> String {
    if path.as_os_str() == STDIN_MARKER {
        "<stdin>".to_string()
    } else {
        path.display().to_string()
    }
}
