//! `hookline show`: details of one hook

use clap::Args;
use hookline_config::{ActionConfig, ConditionArg, ConditionConfig, Config, OptionValue};
use hookline_core::HookName;
use owo_colors::OwoColorize;

use crate::command::Command;
use crate::common::RuntimeContext;
use crate::error::{CommandError, Result};

/// Show the configuration of a hook
#[derive(Debug, Args)]
pub struct ShowCommand {
    /// Hook to show
    #[arg(value_name = "HOOK")]
    pub hook: HookName,
}

impl ShowCommand {
    /// Render the hook details
    ///
    /// # Errors
    ///
    /// Returns an error if the hook has no configuration
    pub fn render(&self, config: &Config) -> Result<String> {
        let hook = config
            .hook(self.hook)
            .ok_or(CommandError::HookNotConfigured(self.hook))?;

        let mut out = vec![
            format!("{}", self.hook.bold()),
            format!("  enabled:  {}", hook.enabled),
            format!("  blocking: {}", self.hook.can_block()),
        ];

        if !self.hook.argument_names().is_empty() {
            out.push(format!(
                "  arguments: {}",
                self.hook.argument_names().join(", ")
            ));
        }

        if !hook.conditions.is_empty() {
            out.push("  conditions:".to_string());
            for condition in &hook.conditions {
                out.push(format!("    - {}", describe_condition(condition)));
            }
        }

        if hook.actions.is_empty() {
            out.push(format!("  {}", "no actions".dimmed()));
        }
        for (index, action) in hook.actions.iter().enumerate() {
            describe_action(index + 1, action, &mut out);
        }

        Ok(out.join("\n"))
    }
}

impl Command for ShowCommand {
    type Output = ();

    fn execute(&self, context: &RuntimeContext) -> Result<()> {
        println!("{}", self.render(&context.config)?);
        Ok(())
    }
}

fn describe_action(position: usize, action: &ActionConfig, out: &mut Vec<String>) {
    out.push(format!("  {position}. {}", action.display_name().cyan()));
    if action.label.is_some() {
        out.push(format!("     action: {}", action.action));
    }
    for (key, value) in &action.options {
        out.push(format!("     {key}: {value}"));
    }
    for condition in &action.conditions {
        out.push(format!("     if {}", describe_condition(condition)));
    }
    if action.allow_failure {
        out.push(format!("     {}", "failure allowed".yellow()));
    }
}

/// Single-line rendering of a condition tree
///
/// Logic combinators wrap their children in parentheses, predicates list
/// their arguments.
#[must_use]
pub fn describe_condition(condition: &ConditionConfig) -> String {
    if condition.args.is_empty() {
        return condition.exec.clone();
    }

    let args: Vec<String> = condition
        .args
        .iter()
        .map(|arg| match arg {
            ConditionArg::Condition(nested) => describe_condition(nested),
            ConditionArg::Value(OptionValue::String(text)) => format!("{text:?}"),
            ConditionArg::Value(value) => value.to_string(),
        })
        .collect();
    format!("{}({})", condition.exec, args.join(", "))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use hookline_config::HookConfig;

    fn config() -> Config {
        let action = ActionConfig::new("hookline::file::max-size")
            .with_option("max-size", "1M")
            .with_condition(ConditionConfig::logic(
                "hookline::logic::or",
                vec![
                    ConditionConfig::new("hookline::file-staged::of-type", vec!["rs".into()]),
                    ConditionConfig::new("test -f Cargo.toml", Vec::new()),
                ],
            ));
        let mut labelled = ActionConfig::new("cargo fmt --check");
        labelled.label = Some("rustfmt".to_string());
        labelled.allow_failure = true;

        Config::default().with_hook(
            HookName::PreCommit,
            HookConfig {
                enabled: true,
                actions: vec![action, labelled],
                conditions: Vec::new(),
            },
        )
    }

    #[test]
    fn test_render_actions() {
        let output = ShowCommand {
            hook: HookName::PreCommit,
        }
        .render(&config())
        .unwrap();

        assert!(output.contains("enabled:  true"));
        assert!(output.contains("hookline::file::max-size"));
        assert!(output.contains("max-size: 1M"));
        assert!(output.contains("rustfmt"));
        assert!(output.contains("action: cargo fmt --check"));
        assert!(output.contains("failure allowed"));
        assert!(!output.contains("arguments:"));
    }

    #[test]
    fn test_describe_condition() {
        let condition = ConditionConfig::logic(
            "hookline::logic::not",
            vec![ConditionConfig::new(
                "hookline::config::custom-value-is-truthy",
                vec!["SKIP".into(), OptionValue::Int(1)],
            )],
        );
        assert_eq!(
            describe_condition(&condition),
            r#"hookline::logic::not(hookline::config::custom-value-is-truthy("SKIP", 1))"#
        );
        assert_eq!(
            describe_condition(&ConditionConfig::new("test -f Makefile", Vec::new())),
            "test -f Makefile"
        );
    }

    #[test]
    fn test_unconfigured_hook() {
        let err = ShowCommand {
            hook: HookName::PrePush,
        }
        .render(&config())
        .err()
        .unwrap();
        assert!(matches!(err, CommandError::HookNotConfigured(HookName::PrePush)));
    }
}
