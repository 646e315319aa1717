//! Call pipelines built from configured filters.
//!
//! A [`Pipeline`] turns a validated [`PipelineConfig`] into a recipe for one
//! call: every configured filter contributes a side promise, attached to a
//! [`TryConcurrently`] around the call's main promise at the filter's
//! configured [`Slot`]. A rejecting authorization check belongs in
//! `necessary_push`; a best-effort metrics hook in `pull`.
//!
//! ```
//! use serde_json::Value;
//! use try_concurrently::pipeline::{FilterConfig, FilterRegistry, Pipeline, PipelineConfig};
//! use try_concurrently::{BoxPromise, Poll, Promise, PromiseExt, Slot, ready};
//!
//! struct Call { authorized: bool }
//!
//! fn authz(call: &Call, _: &Value) -> BoxPromise<'static, Result<(), String>> {
//!     let outcome = if call.authorized { Ok(()) } else { Err("denied".to_string()) };
//!     ready(outcome).boxed()
//! }
//!
//! let mut registry: FilterRegistry<Call, String> = FilterRegistry::new();
//! registry.register("authz", authz).unwrap();
//!
//! let config = PipelineConfig::new().with_filter(FilterConfig::new("authz", Slot::NecessaryPush));
//! let pipeline = Pipeline::build(&registry, &config).unwrap();
//!
//! let mut call = pipeline.attach(&Call { authorized: false }, ready(Ok::<_, String>("body")));
//! assert_eq!(call.poll(), Poll::Ready(Err("denied".to_string())));
//! ```

pub mod config;
pub mod registry;

pub use config::{FilterConfig, PipelineConfig};
pub use registry::{FilterFactory, FilterRegistry, SharedFactory};

use crate::combinator::{Slot, TryConcurrently};
use crate::error::{PipelineError, ValidationError};
use crate::promise::TryPromise;
use crate::tracing_compat::{trace, warn};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// A filter resolved against the registry.
struct Stage<Ctx, E> {
    name: String,
    slot: Slot,
    config: Value,
    factory: SharedFactory<Ctx, E>,
}

/// Validated, ordered filters ready to be attached to calls.
pub struct Pipeline<Ctx, E> {
    stages: Vec<Stage<Ctx, E>>,
}

impl<Ctx, E: 'static> Pipeline<Ctx, E> {
    /// Validates `config` against `registry` and resolves its factories.
    ///
    /// On failure every validation problem is reported at once.
    pub fn build(
        registry: &FilterRegistry<Ctx, E>,
        config: &PipelineConfig,
    ) -> Result<Self, PipelineError> {
        let problems = config.validate(registry);
        if !problems.is_empty() {
            warn!(problems = problems.len(), "rejecting invalid pipeline config");
            return Err(PipelineError::Invalid(problems));
        }

        let mut stages = Vec::with_capacity(config.filters.len());
        let mut unresolved = Vec::new();
        for (index, filter) in config.filters.iter().enumerate() {
            let Some(factory) = registry.get(&filter.name) else {
                unresolved.push(ValidationError::new(
                    format!("filters[{index}].name"),
                    format!("unknown filter `{}`", filter.name),
                ));
                continue;
            };
            stages.push(Stage {
                name: filter.name.clone(),
                slot: filter.slot,
                config: filter.config.clone(),
                factory: Arc::clone(factory),
            });
        }
        if !unresolved.is_empty() {
            return Err(PipelineError::Invalid(unresolved));
        }
        Ok(Self { stages })
    }

    /// Instantiates every filter for one call and attaches it to a new
    /// combinator around `main`, in configuration order.
    pub fn attach<M>(&self, ctx: &Ctx, main: M) -> TryConcurrently<'static, M>
    where
        M: TryPromise<Error = E>,
    {
        let mut combined = TryConcurrently::new(main);
        for stage in &self.stages {
            trace!(filter = %stage.name, slot = %stage.slot, "attaching filter");
            let promise = stage.factory.instantiate(ctx, &stage.config);
            combined = match stage.slot {
                Slot::NecessaryPush => combined.necessary_push(promise),
                Slot::Push => combined.push(promise),
                Slot::NecessaryPull => combined.necessary_pull(promise),
                Slot::Pull => combined.pull(promise),
            };
        }
        combined
    }

    /// Filter names and slots, in attachment order.
    pub fn filters(&self) -> impl Iterator<Item = (&str, Slot)> {
        self.stages
            .iter()
            .map(|stage| (stage.name.as_str(), stage.slot))
    }

    /// Number of filters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Returns true if the pipeline has no filters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

impl<Ctx, E> fmt::Debug for Pipeline<Ctx, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(
                self.stages
                    .iter()
                    .map(|stage| format!("{}@{}", stage.name, stage.slot)),
            )
            .finish()
    }
}
