//! Error types for the pipeline layer.
//!
//! The combinator itself never wraps errors: it hands back whatever error its
//! main or necessary side promises produced. The types here cover assembling
//! a pipeline from configuration.

use thiserror::Error;

/// One problem found while validating configuration.
///
/// `field_path` locates the offending value (`filters[2].config.limit`),
/// `message` says what is wrong with it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
#[error("{field_path}: {message}")]
pub struct ValidationError {
    /// Path to the offending field.
    pub field_path: String,
    /// Human-readable description of the problem.
    pub message: String,
}

impl ValidationError {
    /// Creates a validation error for `field_path`.
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field_path: field_path.into(),
            message: message.into(),
        }
    }

    /// Re-roots the error under `prefix`.
    ///
    /// An empty path becomes `prefix`, an index path (`[0]`) is appended
    /// directly, anything else is joined with a dot.
    #[must_use]
    pub fn nested(mut self, prefix: &str) -> Self {
        self.field_path = if self.field_path.is_empty() {
            prefix.to_owned()
        } else if self.field_path.starts_with('[') {
            format!("{prefix}{}", self.field_path)
        } else {
            format!("{prefix}.{}", self.field_path)
        };
        self
    }
}

/// Error returned when registering a filter factory.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A factory is already registered under this name.
    #[error("filter `{0}` is already registered")]
    Duplicate(String),
    /// Filter names must be non-empty.
    #[error("filter name must not be empty")]
    EmptyName,
}

/// Error returned when parsing pipeline configuration text.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The JSON document could not be parsed into a pipeline config.
    #[error("invalid pipeline config JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// The TOML document could not be parsed into a pipeline config.
    #[cfg(feature = "config-file")]
    #[error("invalid pipeline config TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Error returned when building a pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    /// The configuration failed validation; every problem found is listed.
    #[error("invalid pipeline config ({} problem(s)): {}", .0.len(), join_problems(.0))]
    Invalid(Vec<ValidationError>),
}

impl PipelineError {
    /// Returns the validation problems behind this error.
    #[must_use]
    pub fn problems(&self) -> &[ValidationError] {
        match self {
            Self::Invalid(problems) => problems,
        }
    }
}

fn join_problems(problems: &[ValidationError]) -> String {
    problems
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
