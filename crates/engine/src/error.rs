//! Error types for hookline-engine
//!
//! Every failure a hook run can produce maps onto one variant here. The runner
//! decides what each kind means for the outcome:
//! - `Configuration` is fatal before any plugin or action callback runs
//! - `ActionFailed` fails the run (unless the action allows failure)
//! - `Condition`, `Plugin` and `EventHandler` abort the remaining actions

use crate::event::LifecycleEvent;
use thiserror::Error;

/// Result type alias for hookline-engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for hookline-engine
#[derive(Error, Debug)]
pub enum Error {
    /// A predicate could not be evaluated
    #[error("Condition '{condition}' could not be evaluated: {message}")]
    Condition { condition: String, message: String },

    /// A shell command exited non-zero or an in-process action raised
    #[error("Action '{action}' failed:\n{output}")]
    ActionFailed { action: String, output: String },

    /// A plugin callback raised
    #[error("Plugin '{plugin}' failed: {message}")]
    Plugin { plugin: String, message: String },

    /// Unresolvable action, condition or plugin
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// An event handler raised
    #[error("Handler for '{event}' failed: {message}")]
    EventHandler {
        event: LifecycleEvent,
        message: String,
    },

    /// libgit2 error
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    /// Error from the core layer (repository queries, prompts)
    #[error(transparent)]
    Core(#[from] hookline_core::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create an action failure
    pub fn action_failed(action: impl Into<String>, output: impl Into<String>) -> Self {
        Error::ActionFailed {
            action: action.into(),
            output: output.into(),
        }
    }

    /// Create a condition failure
    pub fn condition(condition: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Error::Condition {
            condition: condition.into(),
            message: message.to_string(),
        }
    }

    /// Whether this error means "the configuration is wrong" rather than
    /// "the checked code is wrong"
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::Configuration(_))
    }
}
