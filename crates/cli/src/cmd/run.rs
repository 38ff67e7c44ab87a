//! `hookline run`: execute the actions configured for a hook
//!
//! This is what the installed git hook scripts call. Positional arguments are
//! the ones git passed to the hook; they are named after the hook's argument
//! list so placeholders and actions can read them.

use clap::Args;
use hookline_core::HookName;
use hookline_engine::{HookRunner, RunReport};
use std::io::IsTerminal;

use crate::command::Command;
use crate::common::RuntimeContext;
use crate::error::Result;
use crate::ui::StatusIcon;
use crate::ui::console::{ConsoleIo, hook_arguments, read_lines};

/// Run a git hook
#[derive(Debug, Args)]
pub struct RunCommand {
    /// Hook to run (e.g. pre-commit, commit-msg, pre-push)
    #[arg(value_name = "HOOK")]
    pub hook: HookName,

    /// Arguments git passed to the hook
    #[arg(value_name = "GIT_ARGS")]
    pub git_args: Vec<String>,

    /// Extra named argument, repeatable
    #[arg(long = "arg", value_name = "NAME=VALUE")]
    pub args: Vec<String>,

    /// Never prompt, answer every question with its default
    #[arg(long, short = 'n')]
    pub no_interaction: bool,
}

impl RunCommand {
    /// Whether prompts may reach a user
    ///
    /// The configuration can force or forbid prompts. Otherwise a terminal
    /// on stderr decides, since git connects stdin to its own pipe for
    /// pre-push and post-rewrite.
    fn interactive(&self, setting: Option<bool>) -> bool {
        if self.no_interaction {
            return false;
        }
        setting.unwrap_or_else(|| std::io::stderr().is_terminal())
    }

    fn standard_input(&self) -> Result<Vec<String>> {
        let stdin = std::io::stdin();
        if !self.hook.reads_stdin() || stdin.is_terminal() {
            return Ok(Vec::new());
        }
        read_lines(stdin.lock())
    }
}

impl Command for RunCommand {
    type Output = i32;

    fn execute(&self, context: &RuntimeContext) -> Result<i32> {
        let arguments = hook_arguments(self.hook, &self.git_args, &self.args)?;
        let stdin = self.standard_input()?;
        let interactive = self.interactive(context.config.settings.interactive);

        tracing::debug!(
            hook = %self.hook,
            arguments = arguments.len(),
            stdin_lines = stdin.len(),
            interactive,
            "Running hook"
        );

        let io = ConsoleIo::new(arguments, stdin, interactive);
        let runner = HookRunner::new(&context.config, &io, &context.repository);
        let report = runner.run(self.hook)?;

        if let Some(line) = summary(&report) {
            eprintln!("{line}");
        }
        Ok(report.exit_code())
    }
}

/// One-line result of a run, `None` when nothing was configured to run
#[must_use]
pub fn summary(report: &RunReport) -> Option<String> {
    if report.executed.is_empty() && report.skipped.is_empty() && report.succeeded() {
        return None;
    }

    let icon = if report.succeeded() {
        if report.reported.is_empty() {
            StatusIcon::Success
        } else {
            StatusIcon::Warning
        }
    } else {
        StatusIcon::Error
    };

    let mut line = format!(
        "{} {}: {} executed, {} skipped",
        icon.colored(),
        report.hook,
        report.executed.len(),
        report.skipped.len()
    );
    if !report.errors.is_empty() {
        line.push_str(&format!(", {} failed", report.errors.len()));
    }
    Some(line)
}
