//! Core types and utilities for hookline
//!
//! This is the foundation crate (Layer 0) that all other hookline crates depend on.
//! It provides:
//! - Base error types
//! - The closed set of supported git hooks ([`HookName`])
//! - Collaborator traits the engine consumes ([`Io`], [`Repository`])
//!
//! This crate has no dependencies on other hookline crates.

pub mod error;
pub mod hook;
pub mod traits;

pub use error::{Error, Result};
pub use hook::HookName;
pub use traits::{Commit, Io, Repository, has_extension, is_in_directory};
