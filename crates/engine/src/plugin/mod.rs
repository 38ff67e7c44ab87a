//! Plugin lifecycle
//!
//! Plugins observe a whole hook run:
//!
//! ```text
//! NotStarted -> BeforeHook -> Running(0..N) -> AfterHook -> Done
//! ```
//!
//! `before_hook` runs once, `before_action`/`after_action` wrap every action
//! that is not skipped, and `after_hook` runs once at the end whatever the
//! outcome. Any callback may raise the run's [`SkipFlag`]; every action after
//! that point is omitted entirely.

mod builtin;
mod registry;

pub use builtin::{SKIP_ENV_DEFAULT, SkipOnEnv, Timer};
pub use registry::{PluginFactory, PluginRegistry};

use crate::context::RunContext;
use crate::{Error, Result};
use hookline_config::{ActionConfig, OptionValue, PluginConfig};
use indexmap::IndexMap;
use std::cell::Cell;

/// Run-scoped "skip remaining actions" request
///
/// Set-only: once raised it stays raised for the rest of the run.
#[derive(Debug, Default)]
pub struct SkipFlag(Cell<bool>);

impl SkipFlag {
    /// Create a lowered flag
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the flag
    pub fn set(&self) {
        self.0.set(true);
    }

    /// Whether the flag was raised
    #[must_use]
    pub fn is_set(&self) -> bool {
        self.0.get()
    }
}

/// What a plugin callback can see and do
pub struct PluginContext<'a> {
    run: &'a RunContext<'a>,
    skip: &'a SkipFlag,
}

impl<'a> PluginContext<'a> {
    /// Create a plugin context
    #[must_use]
    pub fn new(run: &'a RunContext<'a>, skip: &'a SkipFlag) -> Self {
        Self { run, skip }
    }

    /// Run context (hook, IO, repository, configuration)
    #[must_use]
    pub fn run(&self) -> &'a RunContext<'a> {
        self.run
    }

    /// Ask the runner to skip every remaining action
    pub fn skip_remaining_actions(&self) {
        tracing::debug!(hook = %self.run.hook, "Plugin requested to skip remaining actions");
        self.skip.set();
    }

    /// Whether skipping was already requested
    #[must_use]
    pub fn skip_requested(&self) -> bool {
        self.skip.is_set()
    }
}

/// A hook run observer
///
/// Every callback defaults to doing nothing.
pub trait Plugin {
    /// Receive the configured options, once, before any callback
    fn configure(&mut self, _options: &IndexMap<String, OptionValue>) -> Result<()> {
        Ok(())
    }

    /// Called once before the first action
    fn before_hook(&mut self, _ctx: &PluginContext<'_>) -> Result<()> {
        Ok(())
    }

    /// Called before each action that is not skipped
    fn before_action(&mut self, _ctx: &PluginContext<'_>, _action: &ActionConfig) -> Result<()> {
        Ok(())
    }

    /// Called after each action that is not skipped
    fn after_action(&mut self, _ctx: &PluginContext<'_>, _action: &ActionConfig) -> Result<()> {
        Ok(())
    }

    /// Called once at the end of the run
    fn after_hook(&mut self, _ctx: &PluginContext<'_>) -> Result<()> {
        Ok(())
    }
}

/// Where a run is in the plugin lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// No callback yet
    NotStarted,
    /// `before_hook` was called
    BeforeHook,
    /// Working on the action with this index
    Running(usize),
    /// `after_hook` is being called
    AfterHook,
    /// Every callback finished
    Done,
}

struct LoadedPlugin {
    id: String,
    plugin: Box<dyn Plugin>,
}

/// Drives every configured plugin through the lifecycle
pub struct PluginManager {
    plugins: Vec<LoadedPlugin>,
    state: LifecycleState,
}

impl PluginManager {
    /// Instantiate and configure plugins
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] for unknown identifiers and
    /// [`Error::Plugin`] if a plugin rejects its options
    pub fn load(configs: &[PluginConfig], registry: &PluginRegistry) -> Result<Self> {
        let mut plugins = Vec::with_capacity(configs.len());
        for config in configs {
            let id = config.plugin.trim();
            let mut plugin = registry.create(id)?;
            plugin
                .configure(&config.options)
                .map_err(|e| plugin_error(id, &e))?;
            tracing::debug!(plugin = id, "Loaded plugin");
            plugins.push(LoadedPlugin {
                id: id.to_string(),
                plugin,
            });
        }
        Ok(Self {
            plugins,
            state: LifecycleState::NotStarted,
        })
    }

    /// Manager without plugins
    #[must_use]
    pub fn empty() -> Self {
        Self {
            plugins: Vec::new(),
            state: LifecycleState::NotStarted,
        }
    }

    /// Current lifecycle state
    #[must_use]
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Number of loaded plugins
    #[must_use]
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    /// Whether no plugin is loaded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Call `before_hook` on every plugin
    ///
    /// # Errors
    ///
    /// Returns [`Error::Plugin`] for the first failing plugin
    pub fn before_hook(&mut self, ctx: &PluginContext<'_>) -> Result<()> {
        self.state = LifecycleState::BeforeHook;
        self.each(|plugin| plugin.before_hook(ctx))
    }

    /// Call `before_action` on every plugin
    ///
    /// # Errors
    ///
    /// Returns [`Error::Plugin`] for the first failing plugin
    pub fn before_action(
        &mut self,
        ctx: &PluginContext<'_>,
        index: usize,
        action: &ActionConfig,
    ) -> Result<()> {
        self.state = LifecycleState::Running(index);
        self.each(|plugin| plugin.before_action(ctx, action))
    }

    /// Call `after_action` on every plugin
    ///
    /// # Errors
    ///
    /// Returns [`Error::Plugin`] for the first failing plugin
    pub fn after_action(&mut self, ctx: &PluginContext<'_>, action: &ActionConfig) -> Result<()> {
        self.each(|plugin| plugin.after_action(ctx, action))
    }

    /// Call `after_hook` on every plugin
    ///
    /// # Errors
    ///
    /// Returns [`Error::Plugin`] for the first failing plugin
    pub fn after_hook(&mut self, ctx: &PluginContext<'_>) -> Result<()> {
        self.state = LifecycleState::AfterHook;
        let result = self.each(|plugin| plugin.after_hook(ctx));
        self.state = LifecycleState::Done;
        result
    }

    fn each(&mut self, mut callback: impl FnMut(&mut dyn Plugin) -> Result<()>) -> Result<()> {
        for loaded in &mut self.plugins {
            callback(loaded.plugin.as_mut()).map_err(|e| plugin_error(&loaded.id, &e))?;
        }
        Ok(())
    }
}

fn plugin_error(id: &str, error: &Error) -> Error {
    match error {
        // Already attributed
        Error::Plugin { plugin, message } if plugin == id => Error::Plugin {
            plugin: plugin.clone(),
            message: message.clone(),
        },
        other => Error::Plugin {
            plugin: id.to_string(),
            message: other.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::io::BufferedIo;
    use crate::testing::FakeRepository;
    use hookline_config::Config;
    use hookline_core::HookName;

    struct Skipper;

    impl Plugin for Skipper {
        fn before_action(&mut self, ctx: &PluginContext<'_>, _action: &ActionConfig) -> Result<()> {
            ctx.skip_remaining_actions();
            Ok(())
        }
    }

    struct Failing;

    impl Plugin for Failing {
        fn after_hook(&mut self, _ctx: &PluginContext<'_>) -> Result<()> {
            Err(Error::Configuration("boom".to_string()))
        }
    }

    fn registry() -> PluginRegistry {
        let mut registry = PluginRegistry::new();
        registry.register("test::skipper", || Box::new(Skipper));
        registry.register("test::failing", || Box::new(Failing));
        registry
    }

    fn plugin(id: &str) -> PluginConfig {
        PluginConfig {
            plugin: id.to_string(),
            options: IndexMap::new(),
        }
    }

    #[test]
    fn test_skip_flag_is_monotonic() {
        let flag = SkipFlag::new();
        assert!(!flag.is_set());
        flag.set();
        flag.set();
        assert!(flag.is_set());
    }

    #[test]
    fn test_lifecycle_states() {
        let io = BufferedIo::new();
        let repository = FakeRepository::new();
        let config = Config::default();
        let run = RunContext::new(HookName::PreCommit, &io, &repository, &config);
        let skip = SkipFlag::new();
        let ctx = PluginContext::new(&run, &skip);
        let action = ActionConfig::new("true");

        let mut manager = PluginManager::load(&[plugin("test::skipper")], &registry()).unwrap();
        assert_eq!(manager.state(), LifecycleState::NotStarted);
        manager.before_hook(&ctx).unwrap();
        assert_eq!(manager.state(), LifecycleState::BeforeHook);
        manager.before_action(&ctx, 0, &action).unwrap();
        assert_eq!(manager.state(), LifecycleState::Running(0));
        assert!(skip.is_set());
        manager.after_action(&ctx, &action).unwrap();
        manager.after_hook(&ctx).unwrap();
        assert_eq!(manager.state(), LifecycleState::Done);
    }

    #[test]
    fn test_callback_errors_name_the_plugin() {
        let io = BufferedIo::new();
        let repository = FakeRepository::new();
        let config = Config::default();
        let run = RunContext::new(HookName::PreCommit, &io, &repository, &config);
        let skip = SkipFlag::new();
        let ctx = PluginContext::new(&run, &skip);

        let mut manager = PluginManager::load(&[plugin("test::failing")], &registry()).unwrap();
        let err = manager.after_hook(&ctx).unwrap_err();
        assert!(
            matches!(err, Error::Plugin { ref plugin, ref message } if plugin == "test::failing" && message.contains("boom"))
        );
        assert_eq!(manager.state(), LifecycleState::Done);
    }

    #[test]
    fn test_unknown_plugin_is_configuration_error() {
        let err = PluginManager::load(&[plugin("test::missing")], &registry())
            .err()
            .unwrap();
        assert!(err.is_configuration());
    }
}
