//! Commit message checks
//!
//! In `commit-msg` and `prepare-commit-msg` the message is read from the file
//! git passes as the `file` argument. In `pre-push` every commit of every
//! pushed range is checked.

use super::{Action, ActionRegistry, Subscriptions};
use crate::context::RunContext;
use crate::event::{Event, EventHandler, LifecycleEvent};
use crate::range;
use crate::{Error, Result};
use hookline_config::{ActionConfig, OptionValue};
use hookline_core::HookName;
use regex::Regex;
use std::path::{Path, PathBuf};

/// File inside the git directory a failed commit message is saved to
pub const CACHED_MESSAGE_FILE: &str = "HOOKLINE_MSG";

/// Everything below this line is dropped by git in `--verbose` commits
const SCISSORS: &str = "# ------------------------ >8 ------------------------";

pub(super) fn register(registry: &mut ActionRegistry) {
    registry.register("hookline::message::regex", || Box::new(MessageRegex));
    registry.register("hookline::message::rules", || Box::new(MessageRules));
    registry.register("hookline::message::cache-on-failure", || {
        Box::new(CacheOnFailure)
    });
}

/// Path of the message file, resolved against the repository root
fn message_file(ctx: &RunContext<'_>) -> Result<PathBuf> {
    let file = ctx.io.argument("file").ok_or_else(|| {
        Error::Configuration(format!("hook '{}' was given no message file", ctx.hook))
    })?;
    Ok(resolve_path(ctx.repository.root(), &file))
}

fn resolve_path(root: &Path, file: &str) -> PathBuf {
    let path = Path::new(file);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

/// Drop comment lines and the verbose diff, trim trailing blank lines
fn clean_message(raw: &str) -> String {
    let mut lines = Vec::new();
    for line in raw.lines() {
        if line == SCISSORS {
            break;
        }
        if !line.starts_with('#') {
            lines.push(line.trim_end());
        }
    }
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines.join("\n")
}

/// Messages the running hook is about
fn commit_messages(ctx: &RunContext<'_>) -> Result<Vec<String>> {
    match ctx.hook {
        HookName::CommitMsg | HookName::PrepareCommitMsg => {
            let path = message_file(ctx)?;
            let raw = std::fs::read_to_string(&path).map_err(|e| {
                Error::Configuration(format!(
                    "Failed to read commit message {}: {e}",
                    path.display()
                ))
            })?;
            Ok(vec![clean_message(&raw)])
        }
        HookName::PrePush => {
            let mut messages = Vec::new();
            for range in range::detect(ctx.hook, ctx.io, ctx.repository)? {
                let Some(from) = range.from.as_deref() else {
                    tracing::debug!(to = %range.to, "Skipping message check for new branch");
                    continue;
                };
                for commit in ctx.repository.commits_between(from, &range.to)? {
                    messages.push(clean_message(&commit.message));
                }
            }
            Ok(messages)
        }
        other => Err(Error::Configuration(format!(
            "commit messages cannot be checked in '{other}'"
        ))),
    }
}

fn subject(message: &str) -> &str {
    message.lines().next().unwrap_or_default()
}

fn required_str<'a>(action: &'a ActionConfig, key: &str) -> Result<&'a str> {
    action
        .option(key)
        .and_then(OptionValue::as_str)
        .ok_or_else(|| Error::Configuration(format!("option '{key}' is required")))
}

fn bool_option(action: &ActionConfig, key: &str, default: bool) -> Result<bool> {
    match action.option(key) {
        None => Ok(default),
        Some(value) => value
            .as_bool()
            .ok_or_else(|| Error::Configuration(format!("option '{key}' must be a boolean"))),
    }
}

fn length_option(action: &ActionConfig, key: &str, default: usize) -> Result<usize> {
    match action.option(key) {
        None => Ok(default),
        Some(value) => value
            .as_int()
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(|| {
                Error::Configuration(format!("option '{key}' must be a positive number"))
            }),
    }
}

/// Every message must match the `regex` option
struct MessageRegex;

impl Action for MessageRegex {
    fn execute(&self, ctx: &RunContext<'_>, action: &ActionConfig) -> Result<()> {
        let pattern = required_str(action, "regex")?;
        let regex = Regex::new(pattern)
            .map_err(|e| Error::Configuration(format!("invalid regex '{pattern}': {e}")))?;

        for message in commit_messages(ctx)? {
            if !regex.is_match(&message) {
                let error = action
                    .option("error")
                    .and_then(OptionValue::as_str)
                    .map_or_else(
                        || format!("Commit message must match '{pattern}'"),
                        str::to_string,
                    );
                return Err(Error::action_failed(
                    action.display_name(),
                    format!("{error}\n  {}", subject(&message)),
                ));
            }
        }
        Ok(())
    }
}

/// Subject and body formatting rules
struct MessageRules;

#[derive(Debug, Clone, Copy)]
struct Rules {
    subject_max_length: usize,
    body_line_length: usize,
    capitalize_subject: bool,
    no_period: bool,
    blank_line_after_subject: bool,
}

impl Rules {
    fn from_options(action: &ActionConfig) -> Result<Self> {
        Ok(Self {
            subject_max_length: length_option(action, "subject-max-length", 50)?,
            body_line_length: length_option(action, "body-line-length", 72)?,
            capitalize_subject: bool_option(action, "capitalize-subject", true)?,
            no_period: bool_option(action, "no-period", true)?,
            blank_line_after_subject: bool_option(action, "blank-line-after-subject", true)?,
        })
    }

    fn violations(&self, message: &str) -> Vec<String> {
        let mut violations = Vec::new();
        let lines: Vec<&str> = message.lines().collect();
        let Some(subject) = lines.first().copied().filter(|s| !s.trim().is_empty()) else {
            return vec!["Commit message is empty".to_string()];
        };

        let length = subject.chars().count();
        if length > self.subject_max_length {
            violations.push(format!(
                "Subject is {length} characters long, limit is {}",
                self.subject_max_length
            ));
        }
        if self.capitalize_subject && subject.chars().next().is_some_and(char::is_lowercase) {
            violations.push("Subject must start with a capital letter".to_string());
        }
        if self.no_period && subject.ends_with('.') {
            violations.push("Subject must not end with a period".to_string());
        }
        if self.blank_line_after_subject && lines.get(1).is_some_and(|l| !l.is_empty()) {
            violations.push("Subject must be followed by a blank line".to_string());
        }
        for (index, line) in lines.iter().enumerate().skip(1) {
            let length = line.chars().count();
            if length > self.body_line_length {
                violations.push(format!(
                    "Line {} is {length} characters long, limit is {}",
                    index + 1,
                    self.body_line_length
                ));
            }
        }
        violations
    }
}

impl Action for MessageRules {
    fn execute(&self, ctx: &RunContext<'_>, action: &ActionConfig) -> Result<()> {
        let rules = Rules::from_options(action)?;
        for message in commit_messages(ctx)? {
            let violations = rules.violations(&message);
            if !violations.is_empty() {
                let mut output = format!("Commit message '{}' breaks the rules:", subject(&message));
                for violation in violations {
                    output.push_str("\n  - ");
                    output.push_str(&violation);
                }
                return Err(Error::action_failed(action.display_name(), output));
            }
        }
        Ok(())
    }
}

/// Saves the commit message when the hook fails so it can be reused
struct CacheOnFailure;

impl Action for CacheOnFailure {
    fn execute(&self, _ctx: &RunContext<'_>, _action: &ActionConfig) -> Result<()> {
        Ok(())
    }

    fn subscriptions(&self, _action: &ActionConfig) -> Subscriptions {
        let handler: Box<dyn EventHandler> = Box::new(cache_message);
        vec![(LifecycleEvent::HookFailed, handler)]
    }
}

fn cache_message(event: &Event<'_>) -> Result<()> {
    let Some(file) = event.io().argument("file") else {
        tracing::debug!(hook = %event.hook(), "No message file to cache");
        return Ok(());
    };
    let repository = event.repository();
    let source = resolve_path(repository.root(), &file);
    let target = repository.git_dir().join(CACHED_MESSAGE_FILE);
    std::fs::copy(&source, &target)?;
    tracing::info!(target = %target.display(), "Cached commit message");
    event.io().write(&format!(
        "Your commit message was saved to {}",
        target.display()
    ));
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;
    use crate::event::EventDispatcher;
    use crate::io::BufferedIo;
    use crate::testing::FakeRepository;
    use hookline_config::Config;
    use hookline_core::Commit;
    use tempfile::TempDir;

    fn message_repo(message: &str) -> (TempDir, FakeRepository) {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join(".git")).unwrap();
        std::fs::write(temp.path().join(".git/COMMIT_EDITMSG"), message).unwrap();
        let repository = FakeRepository::at(temp.path());
        (temp, repository)
    }

    fn run_action(action: &dyn Action, config: &ActionConfig, message: &str) -> Result<()> {
        let (_temp, repository) = message_repo(message);
        let io = BufferedIo::new().with_argument("file", ".git/COMMIT_EDITMSG");
        let hook_config = Config::default();
        let run = RunContext::new(HookName::CommitMsg, &io, &repository, &hook_config);
        action.execute(&run, config)
    }

    #[test]
    fn test_clean_message() {
        let raw = "Fix parser\n\nBody\n# Please enter the commit message\n\n";
        assert_eq!(clean_message(raw), "Fix parser\n\nBody");
        let verbose = format!("Add tests\n{SCISSORS}\ndiff --git a/x b/x\n");
        assert_eq!(clean_message(&verbose), "Add tests");
    }

    #[test]
    fn test_regex() {
        let config = ActionConfig::new("hookline::message::regex")
            .with_option("regex", r"^(feat|fix): ")
            .with_option("error", "Use a conventional prefix");

        run_action(&MessageRegex, &config, "fix: handle empty input\n").unwrap();
        let err = run_action(&MessageRegex, &config, "handle empty input\n").unwrap_err();
        assert!(matches!(
            err,
            Error::ActionFailed { ref output, .. }
                if output.starts_with("Use a conventional prefix")
        ));
    }

    #[test]
    fn test_regex_requires_option() {
        let config = ActionConfig::new("hookline::message::regex");
        assert!(run_action(&MessageRegex, &config, "anything").unwrap_err().is_configuration());
    }

    #[test]
    fn test_rules() {
        let config = ActionConfig::new("hookline::message::rules");
        run_action(&MessageRules, &config, "Add parser\n\nExplain why.\n").unwrap();

        let err = run_action(&MessageRules, &config, "add parser.\nno blank line\n").unwrap_err();
        let Error::ActionFailed { output, .. } = err else {
            panic!("expected action failure");
        };
        assert!(output.contains("capital letter"));
        assert!(output.contains("period"));
        assert!(output.contains("blank line"));
    }

    #[test]
    fn test_rules_options() {
        let rules = Rules::from_options(
            &ActionConfig::new("hookline::message::rules")
                .with_option("subject-max-length", 10_i64)
                .with_option("capitalize-subject", false),
        )
        .unwrap();
        assert_eq!(rules.violations("lowercase ok"), vec![
            "Subject is 12 characters long, limit is 10".to_string()
        ]);
        assert!(rules.violations("short").is_empty());
        assert_eq!(rules.violations(""), vec!["Commit message is empty".to_string()]);

        let bad = ActionConfig::new("hookline::message::rules").with_option("no-period", "maybe");
        assert!(Rules::from_options(&bad).is_err());
    }

    #[test]
    fn test_pre_push_checks_pushed_commits() {
        let mut repository = FakeRepository::new();
        repository.commits = vec![Commit {
            id: "abc".to_string(),
            summary: "wip".to_string(),
            message: "wip".to_string(),
            author: "Hook Tester".to_string(),
        }];
        let io = BufferedIo::new().with_stdin(["refs/heads/main abc refs/heads/main def"]);
        let config = Config::default();
        let run = RunContext::new(HookName::PrePush, &io, &repository, &config);

        let action = ActionConfig::new("hookline::message::regex").with_option("regex", "^[A-Z]");
        let err = MessageRegex.execute(&run, &action).unwrap_err();
        assert!(matches!(err, Error::ActionFailed { ref output, .. } if output.ends_with("wip")));
    }

    #[test]
    fn test_unsupported_hook() {
        let repository = FakeRepository::new();
        let io = BufferedIo::new();
        let config = Config::default();
        let run = RunContext::new(HookName::PreCommit, &io, &repository, &config);
        let action = ActionConfig::new("hookline::message::rules");
        assert!(MessageRules.execute(&run, &action).unwrap_err().is_configuration());
    }

    #[test]
    fn test_cache_on_failure_copies_message() {
        let (temp, repository) = message_repo("Half written message\n");
        let io = BufferedIo::new().with_argument("file", ".git/COMMIT_EDITMSG");
        let config = Config::default();
        let run = RunContext::new(HookName::CommitMsg, &io, &repository, &config);
        let action = ActionConfig::new("hookline::message::cache-on-failure");

        let mut dispatcher = EventDispatcher::new();
        for (event, handler) in CacheOnFailure.subscriptions(&action) {
            dispatcher.subscribe(event, vec![handler]);
        }
        assert_eq!(dispatcher.handler_count(LifecycleEvent::HookFailed), 1);
        dispatcher
            .dispatch(LifecycleEvent::HookFailed, &run, None)
            .unwrap();

        let cached = std::fs::read_to_string(temp.path().join(".git").join(CACHED_MESSAGE_FILE))
            .unwrap();
        assert_eq!(cached, "Half written message\n");
    }
}
