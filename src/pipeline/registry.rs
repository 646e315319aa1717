//! Filter factories and the registry that names them.

use crate::error::{RegistryError, ValidationError};
use crate::promise::BoxPromise;
use crate::tracing_compat::debug;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Builds the side promise a filter contributes to one call.
///
/// `Ctx` is the per-call context the pipeline is driven with and `E` the
/// call's error type; a filter attached to a necessary slot fails the call by
/// resolving to `Err`.
///
/// Closures of the form `Fn(&Ctx, &Value) -> BoxPromise<'static, Result<(), E>>`
/// are factories that accept any configuration.
pub trait FilterFactory<Ctx, E> {
    /// Checks the filter's configuration.
    ///
    /// Paths in the returned errors are relative to the filter's `config`
    /// value. The default accepts everything.
    fn validate(&self, config: &Value) -> Vec<ValidationError> {
        let _ = config;
        Vec::new()
    }

    /// Creates the filter's promise for one call.
    fn instantiate(&self, ctx: &Ctx, config: &Value) -> BoxPromise<'static, Result<(), E>>;
}

impl<Ctx, E, F> FilterFactory<Ctx, E> for F
where
    F: Fn(&Ctx, &Value) -> BoxPromise<'static, Result<(), E>>,
{
    fn instantiate(&self, ctx: &Ctx, config: &Value) -> BoxPromise<'static, Result<(), E>> {
        self(ctx, config)
    }
}

/// A shared handle to a registered factory.
pub type SharedFactory<Ctx, E> = Arc<dyn FilterFactory<Ctx, E>>;

/// Named filter factories.
///
/// Registration is insert-or-fail: a name can be registered once.
pub struct FilterRegistry<Ctx, E> {
    factories: BTreeMap<String, SharedFactory<Ctx, E>>,
}

impl<Ctx, E> FilterRegistry<Ctx, E> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }

    /// Registers `factory` under `name`.
    ///
    /// Fails if the name is empty or already taken; the registry is left
    /// unchanged in that case.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F) -> Result<(), RegistryError>
    where
        F: FilterFactory<Ctx, E> + 'static,
    {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(RegistryError::EmptyName);
        }
        if self.factories.contains_key(&name) {
            return Err(RegistryError::Duplicate(name));
        }
        debug!(filter = %name, "filter factory registered");
        self.factories.insert(name, Arc::new(factory));
        Ok(())
    }

    /// Looks up the factory registered under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&SharedFactory<Ctx, E>> {
        self.factories.get(name)
    }

    /// Returns true if `name` is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    /// Number of registered factories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl<Ctx, E> Default for FilterRegistry<Ctx, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Ctx, E> fmt::Debug for FilterRegistry<Ctx, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterRegistry")
            .field("names", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}
