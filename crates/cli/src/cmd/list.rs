//! `hookline list`: configured hooks at a glance

use clap::{Args, ValueEnum};
use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL};
use hookline_config::{Config, HookConfig};
use hookline_core::HookName;
use owo_colors::OwoColorize;

use crate::command::Command;
use crate::common::RuntimeContext;
use crate::error::Result;
use crate::ui::StatusIcon;

/// Output format of `list`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ListFormat {
    /// One line per hook
    #[default]
    Simple,
    /// Bordered table
    Table,
    /// Machine readable JSON
    Json,
}

/// List configured hooks
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Output format
    #[arg(short, long, value_enum, default_value_t = ListFormat::Simple)]
    pub format: ListFormat,
}

impl ListCommand {
    /// Render the hook list
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails
    pub fn render(&self, config: &Config) -> Result<String> {
        match self.format {
            ListFormat::Simple => Ok(render_simple(config)),
            ListFormat::Table => Ok(render_table(config)),
            ListFormat::Json => render_json(config),
        }
    }
}

impl Command for ListCommand {
    type Output = ();

    fn execute(&self, context: &RuntimeContext) -> Result<()> {
        println!("{}", self.render(&context.config)?);
        Ok(())
    }
}

fn status(hook: &HookConfig) -> StatusIcon {
    if !hook.enabled {
        StatusIcon::Skipped
    } else if hook.actions.is_empty() {
        StatusIcon::Warning
    } else {
        StatusIcon::Hook
    }
}

fn render_simple(config: &Config) -> String {
    if config.hooks.is_empty() {
        return "No hooks configured.".yellow().to_string();
    }

    let mut lines = Vec::with_capacity(config.hooks.len());
    for (name, hook) in &config.hooks {
        let mut line = format!(
            "{} {} ({} {})",
            status(hook).colored(),
            name.bold(),
            hook.actions.len(),
            plural(hook.actions.len(), "action", "actions"),
        );
        if !hook.enabled {
            line.push_str(&format!(" {}", "disabled".dimmed()));
        }
        lines.push(line);
    }
    lines.join("\n")
}

fn render_table(config: &Config) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Hook", "Enabled", "Actions", "Conditions", "Blocking"]);

    for (name, hook) in &config.hooks {
        table.add_row(vec![
            name.to_string(),
            yes_no(hook.enabled).to_string(),
            hook.actions.len().to_string(),
            hook.conditions.len().to_string(),
            yes_no(name.can_block()).to_string(),
        ]);
    }
    table.to_string()
}

fn render_json(config: &Config) -> Result<String> {
    let hooks: Vec<serde_json::Value> = config
        .hooks
        .iter()
        .map(|(name, hook)| hook_json(*name, hook))
        .collect();

    let json = serde_json::json!({
        "config": config.path().map(|p| p.display().to_string()),
        "plugins": config.plugins.iter().map(|p| p.plugin.as_str()).collect::<Vec<_>>(),
        "hooks": hooks,
    });
    Ok(serde_json::to_string_pretty(&json)?)
}

fn hook_json(name: HookName, hook: &HookConfig) -> serde_json::Value {
    serde_json::json!({
        "name": name,
        "enabled": hook.enabled,
        "conditions": hook.conditions.len(),
        "actions": hook.actions.iter().map(|a| a.display_name()).collect::<Vec<_>>(),
    })
}

fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

fn plural<'a>(count: usize, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 { one } else { many }
}
