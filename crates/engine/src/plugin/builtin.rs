//! Built-in plugins

use super::{Plugin, PluginContext, PluginRegistry};
use crate::{Error, Result};
use hookline_config::value::{is_truthy_str, option_str};
use hookline_config::{ActionConfig, OptionValue};
use indexmap::IndexMap;
use std::time::{Duration, Instant};

/// Environment variable checked by [`SkipOnEnv`] when none is configured
pub const SKIP_ENV_DEFAULT: &str = "HOOKLINE_SKIP";

pub(super) fn register(registry: &mut PluginRegistry) {
    registry.register("hookline::plugin::skip-on-env", || {
        Box::new(SkipOnEnv::default())
    });
    registry.register("hookline::plugin::timer", || Box::new(Timer::default()));
}

/// Skips every action when an environment variable is truthy
///
/// `HOOKLINE_SKIP=1 git commit` commits without running the pre-commit actions.
#[derive(Debug)]
pub struct SkipOnEnv {
    variable: String,
}

impl Default for SkipOnEnv {
    fn default() -> Self {
        Self {
            variable: SKIP_ENV_DEFAULT.to_string(),
        }
    }
}

impl Plugin for SkipOnEnv {
    fn configure(&mut self, options: &IndexMap<String, OptionValue>) -> Result<()> {
        if let Some(value) = options.get("variable") {
            let variable = value
                .as_str()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| {
                    Error::Configuration("option 'variable' must be a non-empty string".to_string())
                })?;
            self.variable = variable.to_string();
        }
        Ok(())
    }

    fn before_hook(&mut self, ctx: &PluginContext<'_>) -> Result<()> {
        let Ok(value) = std::env::var(&self.variable) else {
            return Ok(());
        };
        if is_truthy_str(&value) {
            tracing::info!(variable = %self.variable, "Skipping actions");
            ctx.run()
                .io
                .write(&format!("{} is set, skipping all actions", self.variable));
            ctx.skip_remaining_actions();
        }
        Ok(())
    }
}

/// Measures every action and prints a summary at the end
#[derive(Debug, Default)]
pub struct Timer {
    started: Option<Instant>,
    hook_started: Option<Instant>,
    timings: Vec<(String, Duration)>,
    summary_title: Option<String>,
}

impl Plugin for Timer {
    fn configure(&mut self, options: &IndexMap<String, OptionValue>) -> Result<()> {
        self.summary_title = option_str(options, "title").map(str::to_string);
        Ok(())
    }

    fn before_hook(&mut self, _ctx: &PluginContext<'_>) -> Result<()> {
        self.hook_started = Some(Instant::now());
        self.timings.clear();
        Ok(())
    }

    fn before_action(&mut self, _ctx: &PluginContext<'_>, _action: &ActionConfig) -> Result<()> {
        self.started = Some(Instant::now());
        Ok(())
    }

    fn after_action(&mut self, _ctx: &PluginContext<'_>, action: &ActionConfig) -> Result<()> {
        if let Some(started) = self.started.take() {
            self.timings
                .push((action.display_name().to_string(), started.elapsed()));
        }
        Ok(())
    }

    fn after_hook(&mut self, ctx: &PluginContext<'_>) -> Result<()> {
        let io = ctx.run().io;
        let title = self
            .summary_title
            .clone()
            .unwrap_or_else(|| format!("{} timings", ctx.run().hook));
        io.write(&title);
        for (name, elapsed) in &self.timings {
            io.write(&format!("  {:>8.3}s  {name}", elapsed.as_secs_f64()));
        }
        if let Some(started) = self.hook_started.take() {
            io.write(&format!("  {:>8.3}s  total", started.elapsed().as_secs_f64()));
        }
        Ok(())
    }
}
