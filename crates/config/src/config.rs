//! Configuration management
//!
//! This module handles loading hookline configuration. A repository carries one
//! file (`hookline.toml`, `.hookline.toml` or `hookline.json`) that lists, per
//! git hook, the ordered actions to run and the conditions gating them:
//!
//! ```toml
//! [settings]
//! fail-fast = true
//!
//! [custom]
//! RUN_LINT = "yes"
//!
//! [[plugins]]
//! plugin = "hookline::plugin::timer"
//!
//! [[hooks.pre-commit.actions]]
//! action = "cargo fmt --check -- {$STAGED_FILES|of-type:rs}"
//! label = "rustfmt"
//!
//! [[hooks.pre-commit.actions.conditions]]
//! exec = "hookline::file-staged::of-type"
//! args = ["rs"]
//! ```

use crate::Result;
use crate::value::OptionValue;
use hookline_core::{Error, HookName};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File names searched in the repository root, in order
pub const CONFIG_FILE_NAMES: &[&str] = &["hookline.toml", ".hookline.toml", "hookline.json"];

/// General settings section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Settings {
    /// Stop at the first failing action (default: true)
    ///
    /// When false, remaining actions still run but the hook still fails.
    #[serde(default = "default_fail_fast")]
    pub fail_fast: bool,

    /// Force (`true`) or forbid (`false`) interactive prompts.
    /// Unset means "interactive when stdin is a terminal".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interactive: Option<bool>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fail_fast: default_fail_fast(),
            interactive: None,
        }
    }
}

fn default_fail_fast() -> bool {
    true
}

fn default_enabled() -> bool {
    true
}

/// A condition gating an action or a whole hook
///
/// `exec` is either a `hookline::` identifier (a built-in predicate or one of
/// the logic combinators) or a shell command whose exit code decides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionConfig {
    /// Predicate identifier or shell command
    pub exec: String,

    /// Predicate arguments; logic combinators take nested conditions
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<ConditionArg>,
}

impl ConditionConfig {
    /// Create a condition with plain value arguments
    pub fn new(exec: impl Into<String>, args: Vec<OptionValue>) -> Self {
        Self {
            exec: exec.into(),
            args: args.into_iter().map(ConditionArg::Value).collect(),
        }
    }

    /// Create a logic combinator over nested conditions
    pub fn logic(exec: impl Into<String>, children: Vec<ConditionConfig>) -> Self {
        Self {
            exec: exec.into(),
            args: children.into_iter().map(ConditionArg::Condition).collect(),
        }
    }

    fn validate(&self, scope: &str) -> Result<()> {
        if self.exec.trim().is_empty() {
            return Err(Error::Config(format!(
                "{scope} has a condition with an empty 'exec' field"
            )));
        }
        for arg in &self.args {
            if let ConditionArg::Condition(nested) = arg {
                nested.validate(scope)?;
            }
        }
        Ok(())
    }
}

/// One argument of a condition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConditionArg {
    /// A nested condition (for `and` / `or` / `not`)
    Condition(ConditionConfig),
    /// A plain value
    Value(OptionValue),
}

/// A single configured action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ActionConfig {
    /// Shell command (may contain `{$PLACEHOLDER}` tokens) or a
    /// `hookline::` identifier of an in-process action
    pub action: String,

    /// Human readable name used in output (defaults to `action`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Options handed to in-process actions
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub options: IndexMap<String, OptionValue>,

    /// Conditions scoped to this action
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<ConditionConfig>,

    /// Report a failure of this action but do not fail the hook
    #[serde(default)]
    pub allow_failure: bool,
}

impl ActionConfig {
    /// Create an action with default settings
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            label: None,
            options: IndexMap::new(),
            conditions: Vec::new(),
            allow_failure: false,
        }
    }

    /// Add an option (builder style)
    #[must_use]
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Add a condition (builder style)
    #[must_use]
    pub fn with_condition(mut self, condition: ConditionConfig) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Name shown to the user
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.action)
    }

    /// Get an option by name
    #[must_use]
    pub fn option(&self, key: &str) -> Option<&OptionValue> {
        self.options.get(key)
    }
}

/// Configuration of one git hook
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookConfig {
    /// Whether the hook runs at all (default: true)
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Ordered actions
    #[serde(default)]
    pub actions: Vec<ActionConfig>,

    /// Conditions applied to every action of this hook
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<ConditionConfig>,
}

impl Default for HookConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            actions: Vec::new(),
            conditions: Vec::new(),
        }
    }
}

impl HookConfig {
    /// Whether running this hook can do anything
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.enabled && !self.actions.is_empty()
    }
}

/// A plugin enabled for every hook run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginConfig {
    /// `hookline::plugin::` identifier
    pub plugin: String,

    /// Plugin specific options
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub options: IndexMap<String, OptionValue>,
}

/// Main configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// General settings
    #[serde(default)]
    pub settings: Settings,

    /// Free-form values read by conditions and the `CONFIG` placeholder
    #[serde(default)]
    pub custom: IndexMap<String, OptionValue>,

    /// Plugins observing every hook run
    #[serde(default)]
    pub plugins: Vec<PluginConfig>,

    /// Per-hook configuration
    #[serde(default)]
    pub hooks: IndexMap<HookName, HookConfig>,

    /// File this configuration was loaded from (not serialized)
    #[serde(skip)]
    path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a file
    ///
    /// The format is chosen by extension: `.json` is parsed as JSON, anything
    /// else as TOML.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read, parsing fails, or validation fails
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config file {}: {e}", path.display()))
        })?;

        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));

        let mut config = if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_toml_str(&content)
        }
        .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;

        config.path = Some(path.to_path_buf());
        tracing::debug!(path = %path.display(), hooks = config.hooks.len(), "Loaded configuration");
        Ok(config)
    }

    /// Parse configuration from a TOML string
    ///
    /// # Errors
    ///
    /// Returns error if TOML parsing or validation fails
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Failed to parse config TOML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a JSON string
    ///
    /// # Errors
    ///
    /// Returns error if JSON parsing or validation fails
    pub fn from_json_str(content: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(content)
            .map_err(|e| Error::Config(format!("Failed to parse config JSON: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Find and load the configuration for a repository
    ///
    /// Looks for [`CONFIG_FILE_NAMES`] in `repo_root`, then for the user-level
    /// file in the XDG config directory. When nothing is found an empty
    /// configuration is returned: every hook is then a no-op success, so an
    /// unconfigured repository never blocks git.
    ///
    /// # Errors
    ///
    /// Returns error if a found file cannot be loaded
    pub fn discover(repo_root: &Path) -> Result<Self> {
        for name in CONFIG_FILE_NAMES {
            let candidate = repo_root.join(name);
            if candidate.is_file() {
                return Self::load(candidate);
            }
        }

        if let Some(user_config) = crate::dirs::user_config_file()
            && user_config.is_file()
        {
            return Self::load(user_config);
        }

        tracing::debug!(root = %repo_root.display(), "No configuration found, using defaults");
        Ok(Self::default())
    }

    /// Check structural invariants the serde model cannot express
    ///
    /// # Errors
    ///
    /// Returns error on empty action, condition or plugin identifiers
    pub fn validate(&self) -> Result<()> {
        for (hook, hook_config) in &self.hooks {
            let scope = format!("Hook '{hook}'");
            for condition in &hook_config.conditions {
                condition.validate(&scope)?;
            }

            for (index, action) in hook_config.actions.iter().enumerate() {
                if action.action.trim().is_empty() {
                    return Err(Error::Config(format!(
                        "Hook '{hook}' action #{} has an empty 'action' field",
                        index + 1
                    )));
                }
                let scope = format!("Hook '{hook}' action '{}'", action.display_name());
                for condition in &action.conditions {
                    condition.validate(&scope)?;
                }
            }
        }

        for plugin in &self.plugins {
            if plugin.plugin.trim().is_empty() {
                return Err(Error::Config(
                    "Plugin entry has an empty 'plugin' field".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Get the configuration of a hook
    #[must_use]
    pub fn hook(&self, name: HookName) -> Option<&HookConfig> {
        self.hooks.get(&name)
    }

    /// Insert or replace a hook configuration (builder style)
    #[must_use]
    pub fn with_hook(mut self, name: HookName, hook: HookConfig) -> Self {
        self.hooks.insert(name, hook);
        self
    }

    /// Get a custom value
    #[must_use]
    pub fn custom_value(&self, name: &str) -> Option<&OptionValue> {
        self.custom.get(name)
    }

    /// File this configuration came from, if any
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}
