//! Command trait for the hookline CLI
//!
//! Every subcommand implements [`Command`]. The runtime context carries the
//! opened repository and the loaded configuration so commands never discover
//! either themselves.

use crate::common::RuntimeContext;
use crate::error::Result;

/// Trait for all hookline commands
///
/// # Example
///
/// ```rust,ignore
/// use crate::command::Command;
/// use crate::common::RuntimeContext;
/// use crate::error::Result;
/// use clap::Args;
///
/// #[derive(Debug, Args)]
/// pub struct CountCommand;
///
/// impl Command for CountCommand {
///     type Output = usize;
///
///     fn execute(&self, context: &RuntimeContext) -> Result<usize> {
///         Ok(context.config.hooks.len())
///     }
/// }
/// ```
pub trait Command {
    /// The type returned by this command
    ///
    /// `run` returns the process exit code, the read-only commands return `()`.
    type Output;

    /// Execute the command with the given runtime context
    ///
    /// # Errors
    ///
    /// Returns a `CommandError` if the command cannot complete. A hook whose
    /// actions fail is not an error: it is reported through the exit code.
    fn execute(&self, context: &RuntimeContext) -> Result<Self::Output>;
}
