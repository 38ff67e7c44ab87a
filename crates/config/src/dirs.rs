//! XDG directory utilities
//!
//! The user-level configuration lives next to other XDG config files:
//! - `XDG_CONFIG_HOME` defaults to ~/.config
//!
//! It is consulted only when a repository carries no configuration of its own.

use std::path::PathBuf;
use xdg::BaseDirectories;

/// Get the hookline config directory
///
/// Returns `$XDG_CONFIG_HOME/hookline` or `~/.config/hookline`
#[must_use]
pub fn config_dir() -> Option<PathBuf> {
    BaseDirectories::with_prefix("hookline").get_config_home()
}

/// Get the user-level config file path
///
/// Returns `$XDG_CONFIG_HOME/hookline/config.toml` or `~/.config/hookline/config.toml`
#[must_use]
pub fn user_config_file() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;

    #[test]
    fn test_config_dir_contains_prefix() {
        if let Some(path) = config_dir() {
            assert!(
                path.to_string_lossy().contains("hookline"),
                "config_dir path should contain 'hookline': {path:?}"
            );
            assert!(path.is_absolute());
        }
    }

    #[test]
    fn test_user_config_file_is_child_of_config_dir() {
        if let (Some(dir), Some(file)) = (config_dir(), user_config_file()) {
            assert!(file.starts_with(&dir));
            assert_eq!(file.file_name().and_then(|n| n.to_str()), Some("config.toml"));
        }
    }
}
