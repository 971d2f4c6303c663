use std::error::Error as StdError;

use thiserror::Error;

use crate::{
    application::render::{RenderConfigError, RenderError},
    config::LoadError,
    infra::error::InfraError,
};

/// Error chain flattened for reporting, outermost message first.
#[derive(Debug, Clone)]
pub struct ErrorReport {
    pub source: &'static str,
    pub messages: Vec<String>,
}

impl ErrorReport {
    pub fn from_error(source: &'static str, error: &dyn StdError) -> Self {
        let mut messages = Vec::new();
        messages.push(error.to_string());
        let mut current = error.source();
        while let Some(inner) = current {
            messages.push(inner.to_string());
            current = inner.source();
        }
        Self { source, messages }
    }

    /// Messages joined as `outer: inner: ...`, skipping repeats from transparent wrappers.
    pub fn summary(&self) -> String {
        let mut parts: Vec<&str> = Vec::with_capacity(self.messages.len());
        for message in &self.messages {
            if !parts.iter().any(|existing| existing.contains(message.as_str())) {
                parts.push(message);
            }
        }
        parts.join(": ")
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error(transparent)]
    Config(#[from] LoadError),
    #[error("render failed")]
    Render(#[from] RenderError),
    #[error(transparent)]
    RenderConfig(#[from] RenderConfigError),
    #[error("validation failed: {0}")]
    Validation(String),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn report(&self) -> ErrorReport {
        ErrorReport::from_error("application::error::AppError", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_walks_the_source_chain() {
        let error = AppError::from(RenderError::transform("text/html", "boom"));
        let report = error.report();

        assert_eq!(report.messages.len(), 2);
        assert_eq!(report.messages[0], "render failed");
        assert!(report.summary().starts_with("render failed: "));
        assert!(report.summary().contains("boom"));
    }

    #[test]
    fn transparent_variants_do_not_repeat_messages() {
        let error = AppError::from(InfraError::input("cell.json", "missing field `data`"));
        assert_eq!(
            error.report().summary(),
            "failed to read `cell.json`: missing field `data`"
        );
    }
}
