//! Pipeline configuration.
//!
//! A pipeline config is an ordered list of filters, each naming a registered
//! factory, the [`Slot`] its promise is attached to, and an opaque
//! per-filter `config` value handed to the factory untouched.
//!
//! ```
//! use try_concurrently::pipeline::PipelineConfig;
//! use try_concurrently::Slot;
//!
//! let config = PipelineConfig::from_json_str(r#"{
//!     "filters": [
//!         { "name": "authz", "slot": "necessary_push" },
//!         { "name": "metrics", "slot": "pull", "config": { "sample": 0.1 } }
//!     ]
//! }"#).unwrap();
//!
//! assert_eq!(config.filters[0].slot, Slot::NecessaryPush);
//! assert_eq!(config.filters[1].config["sample"], 0.1);
//! ```

use super::registry::FilterRegistry;
use crate::combinator::Slot;
use crate::error::{ConfigError, ValidationError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One filter entry of a [`PipelineConfig`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilterConfig {
    /// Name of the registered factory.
    pub name: String,
    /// Where the filter's promise is attached.
    pub slot: Slot,
    /// Factory-specific configuration, `null` when omitted.
    #[serde(default)]
    pub config: Value,
}

impl FilterConfig {
    /// Creates an entry with no factory-specific configuration.
    pub fn new(name: impl Into<String>, slot: Slot) -> Self {
        Self {
            name: name.into(),
            slot,
            config: Value::Null,
        }
    }

    /// Sets the factory-specific configuration.
    #[must_use]
    pub fn with_config(mut self, config: Value) -> Self {
        self.config = config;
        self
    }
}

/// Ordered filter list for a [`Pipeline`](super::Pipeline).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    /// Filters in attachment order.
    #[serde(default)]
    pub filters: Vec<FilterConfig>,
}

impl PipelineConfig {
    /// Creates an empty config.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a filter entry.
    #[must_use]
    pub fn with_filter(mut self, filter: FilterConfig) -> Self {
        self.filters.push(filter);
        self
    }

    /// Parses a config from JSON.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Parses a config from TOML.
    ///
    /// ```toml
    /// [[filters]]
    /// name = "authz"
    /// slot = "necessary_push"
    /// ```
    #[cfg(feature = "config-file")]
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Checks the config against `registry`, returning every problem found.
    ///
    /// An empty list means the config is valid.
    #[must_use]
    pub fn validate<Ctx, E>(&self, registry: &FilterRegistry<Ctx, E>) -> Vec<ValidationError> {
        let mut problems = Vec::new();
        for (index, filter) in self.filters.iter().enumerate() {
            let name_path = format!("filters[{index}].name");
            if filter.name.trim().is_empty() {
                problems.push(ValidationError::new(name_path, "must not be empty"));
                continue;
            }
            let Some(factory) = registry.get(&filter.name) else {
                problems.push(ValidationError::new(
                    name_path,
                    format!("unknown filter `{}`", filter.name),
                ));
                continue;
            };
            let config_path = format!("filters[{index}].config");
            problems.extend(
                factory
                    .validate(&filter.config)
                    .into_iter()
                    .map(|problem| problem.nested(&config_path)),
            );
        }
        problems
    }
}
