//! Base error types for hookline
//!
//! This module provides the foundation error types that all crates can use.

use thiserror::Error;

/// Base error type for shared functionality
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A hook name that git does not define (or hookline does not support)
    #[error("Unknown hook '{0}'")]
    InvalidHookName(String),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A repository query failed
    #[error("Repository error: {0}")]
    Repository(String),

    /// Interactive prompt failed or is unavailable
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Generic error message
    #[error("{0}")]
    Message(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
