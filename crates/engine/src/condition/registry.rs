//! Predicate registry
//!
//! Maps `hookline::` identifiers to factories. Factories validate their
//! arguments, so a misconfigured predicate fails while the hook is planned,
//! before anything runs.

use super::Predicate;
use super::builtin;
use crate::{Error, Result};
use hookline_config::OptionValue;
use indexmap::IndexMap;

/// Builds a predicate from its identifier and arguments
pub type PredicateFactory = Box<dyn Fn(&str, &[OptionValue]) -> Result<Box<dyn Predicate>>>;

/// Identifier to factory mapping
#[derive(Default)]
pub struct PredicateRegistry {
    factories: IndexMap<String, PredicateFactory>,
}

impl PredicateRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding every built-in predicate
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        builtin::register(&mut registry);
        registry
    }

    /// Register (or replace) a predicate factory
    pub fn register<F>(&mut self, identifier: impl Into<String>, factory: F)
    where
        F: Fn(&str, &[OptionValue]) -> Result<Box<dyn Predicate>> + 'static,
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

    /// Create a predicate
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] for unknown identifiers or bad arguments
    pub fn create(&self, identifier: &str, args: &[OptionValue]) -> Result<Box<dyn Predicate>> {
        let factory = self
            .factories
            .get(identifier)
            .ok_or_else(|| Error::Configuration(format!("Unknown condition '{identifier}'")))?;
        factory(identifier, args)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::condition::ConditionContext;

    struct Always;

    impl Predicate for Always {
        fn name(&self) -> &str {
            "always"
        }

        fn is_true(&self, _ctx: &ConditionContext<'_>) -> Result<bool> {
            Ok(true)
        }
    }

    #[test]
    fn test_builtins_are_registered() {
        let registry = PredicateRegistry::with_builtins();
        for id in [
            "hookline::config::custom-value-is-truthy",
            "hookline::config::custom-value-is-falsy",
            "hookline::file-staged::any",
            "hookline::file-staged::all",
            "hookline::file-staged::of-type",
            "hookline::file-staged::in-directory",
            "hookline::file-changed::any",
            "hookline::file-changed::of-type",
            "hookline::file-changed::in-directory",
            "hookline::branch::on",
            "hookline::branch::not-on",
            "hookline::branch::on-matching",
            "hookline::branch::not-on-matching",
        ] {
            assert!(registry.contains(id), "{id} should be registered");
        }
    }

    #[test]
    fn test_custom_registration() {
        let mut registry = PredicateRegistry::new();
        registry.register("acme::always", |_, _| Ok(Box::new(Always) as Box<dyn Predicate>));
        assert_eq!(registry.identifiers().collect::<Vec<_>>(), vec!["acme::always"]);
        assert_eq!(registry.create("acme::always", &[]).unwrap().name(), "always");
    }

    #[test]
    fn test_unknown_identifier() {
        let registry = PredicateRegistry::new();
        let err = registry.create("acme::never", &[]).err().unwrap();
        assert_eq!(err.to_string(), "Configuration error: Unknown condition 'acme::never'");
    }
}
