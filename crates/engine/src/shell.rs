//! Shell command execution
//!
//! Shell actions and command conditions both go through [`run`]: the command
//! string is handed to the platform shell, stderr is merged into stdout and
//! the exit status is returned instead of being turned into an error.

use std::path::Path;

/// Environment variable exported to every command with the running hook's name
pub const HOOK_ENV_VAR: &str = "HOOKLINE_HOOK";

/// Result of one shell command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellOutput {
    /// Exit code (`None` when killed by a signal)
    pub code: Option<i32>,
    /// Combined stdout and stderr, trailing whitespace trimmed
    pub output: String,
}

impl ShellOutput {
    /// Whether the command exited with status 0
    #[must_use]
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Run `command` through the platform shell in `working_dir`
///
/// Blocks until the command exits. There is no timeout.
///
/// # Errors
///
/// Returns error only if the shell cannot be spawned
#[tracing::instrument(skip(working_dir), fields(working_dir = %working_dir.display()))]
pub fn run(command: &str, working_dir: &Path, hook: &str) -> std::io::Result<ShellOutput> {
    let expression = if cfg!(windows) {
        duct::cmd!("cmd", "/C", command)
    } else {
        duct::cmd!("sh", "-c", command)
    };

    let output = expression
        .dir(working_dir)
        .env(HOOK_ENV_VAR, hook)
        .stdin_null()
        .stderr_to_stdout()
        .stdout_capture()
        .unchecked()
        .run()?;

    let result = ShellOutput {
        code: output.status.code(),
        output: String::from_utf8_lossy(&output.stdout).trim_end().to_string(),
    };
    tracing::debug!(code = ?result.code, "Command finished");
    Ok(result)
}

#[cfg(all(test, unix))]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_success_and_output() {
        let temp = tempfile::TempDir::new().unwrap();
        let out = run("echo hello", temp.path(), "pre-commit").unwrap();
        assert!(out.success());
        assert_eq!(out.output, "hello");
    }

    #[test]
    fn test_failure_is_not_an_error() {
        let temp = tempfile::TempDir::new().unwrap();
        let out = run("echo broken >&2; exit 3", temp.path(), "pre-commit").unwrap();
        assert!(!out.success());
        assert_eq!(out.code, Some(3));
        assert_eq!(out.output, "broken");
    }

    #[test]
    fn test_hook_name_is_exported() {
        let temp = tempfile::TempDir::new().unwrap();
        let out = run("echo $HOOKLINE_HOOK", temp.path(), "pre-push").unwrap();
        assert_eq!(out.output, "pre-push");
    }

    #[test]
    fn test_runs_in_working_dir() {
        let temp = tempfile::TempDir::new().unwrap();
        std::fs::write(temp.path().join("marker"), "").unwrap();
        let out = run("ls", temp.path(), "pre-commit").unwrap();
        assert_eq!(out.output, "marker");
    }
}
