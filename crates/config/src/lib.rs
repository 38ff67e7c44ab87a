//! Configuration management for hookline
//!
//! This crate handles:
//! - The configuration model (hooks, actions, conditions, plugins, custom values)
//! - Configuration discovery and loading (TOML or JSON)
//! - XDG directory management for the user-level configuration
//! - Logging initialization

pub mod config;
pub mod dirs;
pub mod logging;
pub mod value;

// Re-export error types from core
pub use hookline_core::{Error, Result};

// Re-export main types
pub use config::{
    ActionConfig, ConditionArg, ConditionConfig, Config, HookConfig, PluginConfig, Settings,
};
pub use value::{OptionValue, is_truthy};
