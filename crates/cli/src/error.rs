//! Error types for CLI commands

use hookline_core::HookName;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during command execution
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum CommandError {
    /// `--arg` not written as `name=value`
    #[error("Invalid argument '{0}', expected name=value")]
    InvalidArgument(String),

    /// The directory is not inside a git working tree
    #[error("Not a git repository: {}", .0.display())]
    NotARepository(PathBuf),

    /// `show` was asked about a hook without configuration
    #[error("Hook '{0}' is not configured")]
    HookNotConfigured(HookName),

    /// Configuration could not be loaded
    #[error(transparent)]
    Config(#[from] hookline_core::Error),

    /// The engine refused to run the hook
    #[error(transparent)]
    Engine(#[from] hookline_engine::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON output error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for command operations
pub type Result<T> = std::result::Result<T, CommandError>;
