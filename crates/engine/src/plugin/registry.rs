//! Plugin registry

use super::Plugin;
use super::builtin;
use crate::{Error, Result};
use indexmap::IndexMap;

/// Builds a fresh plugin instance
pub type PluginFactory = Box<dyn Fn() -> Box<dyn Plugin>>;

/// Identifier to factory mapping
#[derive(Default)]
pub struct PluginRegistry {
    factories: IndexMap<String, PluginFactory>,
}

impl PluginRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding every built-in plugin
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        builtin::register(&mut registry);
        registry
    }

    /// Register (or replace) a plugin factory
    pub fn register<F>(&mut self, identifier: impl Into<String>, factory: F)
    where
        F: Fn() -> Box<dyn Plugin> + 'static,
    {
        self.factories.insert(identifier.into(), Box::new(factory));
    }

    /// Whether an identifier is known
    #[must_use]
    pub fn contains(&self, identifier: &str) -> bool {
        self.factories.contains_key(identifier)
    }

    /// Registered identifiers, in registration order
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    /// Instantiate a plugin
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] for unknown identifiers
    pub fn create(&self, identifier: &str) -> Result<Box<dyn Plugin>> {
        self.factories
            .get(identifier)
            .map(|factory| factory())
            .ok_or_else(|| Error::Configuration(format!("Unknown plugin '{identifier}'")))
    }
}
