//! # Hookline Engine
//!
//! Runs the actions configured for a git hook.
//!
//! This crate provides everything between "git called a hook" and "exit code":
//!
//! - **Conditions**: AND/OR/NOT trees over built-in predicates and shell commands
//! - **Placeholders**: `{$STAGED_FILES|of-type:rs}` style tokens in action commands
//! - **Actions**: shell commands and in-process checks, resolved from a registry
//! - **Events**: lifecycle notifications actions can subscribe to
//! - **Plugins**: observers wrapped around the whole run and every action
//! - **Runner**: the orchestrator tying all of the above together
//! - **Git**: a libgit2 backed [`Repository`](hookline_core::Repository)

pub mod action;
pub mod condition;
pub mod context;
pub mod error;
pub mod event;
pub mod git;
pub mod io;
pub mod placeholder;
pub mod plugin;
pub mod range;
pub mod runner;
pub mod shell;

#[cfg(test)]
mod testing;

pub use error::{Error, Result};

// Re-export commonly used types
pub use action::{Action, ActionRegistry, Executable};
pub use condition::{ConditionContext, ConditionNode, Predicate, PredicateRegistry};
pub use context::RunContext;
pub use event::{Event, EventDispatcher, EventHandler, LifecycleEvent};
pub use git::Git2Repository;
pub use io::BufferedIo;
pub use placeholder::Formatter;
pub use plugin::{LifecycleState, Plugin, PluginContext, PluginManager, PluginRegistry, SkipFlag};
pub use runner::{HookRunner, HookRunnerBuilder, Outcome, RunReport};
