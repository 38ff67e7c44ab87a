//! Action execution
//!
//! An action is either a shell command (anything not starting with
//! `hookline::`) or an in-process [`Action`] looked up in the
//! [`ActionRegistry`]. Both are resolved into an [`Executable`] while the
//! hook is planned, so a misspelled identifier never gets as far as running
//! half of the hook.

mod branch;
mod debug;
mod failure;
mod file;
mod message;
mod registry;

pub use registry::{ActionFactory, ActionRegistry};

use crate::context::RunContext;
use crate::event::{EventHandler, LifecycleEvent};
use crate::placeholder::Formatter;
use crate::{Error, Result, shell};
use hookline_config::ActionConfig;

/// Prefix of in-process action identifiers
pub const BUILTIN_PREFIX: &str = "hookline::";

/// Event subscriptions an action contributes to the run
pub type Subscriptions = Vec<(LifecycleEvent, Box<dyn EventHandler>)>;

/// In-process action
pub trait Action {
    /// Run the action
    ///
    /// # Errors
    ///
    /// Any error fails the action; the message is shown to the user
    fn execute(&self, ctx: &RunContext<'_>, action: &ActionConfig) -> Result<()>;

    /// Handlers to register right before this action executes
    fn subscriptions(&self, _action: &ActionConfig) -> Subscriptions {
        Vec::new()
    }
}

/// A resolved action, ready to run
pub enum Executable {
    /// Shell command template
    Shell,
    /// In-process implementation
    InProcess(Box<dyn Action>),
}

impl Executable {
    /// Resolve the configured action
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] for unknown `hookline::` identifiers
    pub fn resolve(action: &ActionConfig, registry: &ActionRegistry) -> Result<Self> {
        let identifier = action.action.trim();
        if identifier.starts_with(BUILTIN_PREFIX) {
            Ok(Executable::InProcess(registry.create(identifier)?))
        } else {
            Ok(Executable::Shell)
        }
    }

    /// Run the action
    ///
    /// # Errors
    ///
    /// Returns [`Error::ActionFailed`] whatever went wrong
    #[tracing::instrument(skip_all, fields(action = %action.display_name()))]
    pub fn execute(&self, ctx: &RunContext<'_>, action: &ActionConfig) -> Result<()> {
        let result = match self {
            Executable::Shell => execute_shell(ctx, action),
            Executable::InProcess(inner) => inner.execute(ctx, action),
        };
        result.map_err(|e| match e {
            Error::ActionFailed { .. } => e,
            other => Error::action_failed(action.display_name(), other.to_string()),
        })
    }

    /// Event handlers the action wants registered
    #[must_use]
    pub fn subscriptions(&self, action: &ActionConfig) -> Subscriptions {
        match self {
            Executable::Shell => Vec::new(),
            Executable::InProcess(inner) => inner.subscriptions(action),
        }
    }
}

fn execute_shell(ctx: &RunContext<'_>, action: &ActionConfig) -> Result<()> {
    let command = Formatter::new(*ctx).format(&action.action);
    tracing::info!(command = %command, "Running shell action");

    let output = shell::run(&command, ctx.repository.root(), ctx.hook.name())?;
    if output.success() {
        if !output.output.is_empty() {
            tracing::debug!(output = %output.output, "Shell action output");
        }
        return Ok(());
    }

    tracing::debug!(code = ?output.code, "Shell action failed");
    Err(Error::action_failed(action.display_name(), output.output))
}
