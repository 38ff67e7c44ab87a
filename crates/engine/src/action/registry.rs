//! Action registry

use super::{Action, branch, debug, failure, file, message};
use crate::{Error, Result};
use indexmap::IndexMap;

/// Builds a fresh action instance
pub type ActionFactory = Box<dyn Fn() -> Box<dyn Action>>;

/// Identifier to factory mapping
#[derive(Default)]
pub struct ActionRegistry {
    factories: IndexMap<String, ActionFactory>,
}

impl ActionRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding every built-in action
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        debug::register(&mut registry);
        message::register(&mut registry);
        file::register(&mut registry);
        branch::register(&mut registry);
        failure::register(&mut registry);
        registry
    }

    /// Register (or replace) an action factory
    pub fn register<F>(&mut self, identifier: impl Into<String>, factory: F)
    where
        F: Fn() -> Box<dyn Action> + 'static,
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

    /// Instantiate an action
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] for unknown identifiers
    pub fn create(&self, identifier: &str) -> Result<Box<dyn Action>> {
        self.factories
            .get(identifier)
            .map(|factory| factory())
            .ok_or_else(|| Error::Configuration(format!("Unknown action '{identifier}'")))
    }
}
