//! Terminal implementation of the engine's IO interface

use crate::error::{CommandError, Result};
use dialoguer::{Input, theme::ColorfulTheme};
use hookline_core::{HookName, Io};
use indexmap::IndexMap;
use owo_colors::OwoColorize;
use std::io::BufRead;

/// IO talking to the terminal git runs the hook in
///
/// Output goes to stdout, errors to stderr. Prompts use `dialoguer` and are
/// only shown when the IO is interactive.
#[derive(Debug, Default)]
pub struct ConsoleIo {
    arguments: IndexMap<String, String>,
    stdin: Vec<String>,
    interactive: bool,
}

impl ConsoleIo {
    /// Create a console IO
    #[must_use]
    pub fn new(arguments: IndexMap<String, String>, stdin: Vec<String>, interactive: bool) -> Self {
        Self {
            arguments,
            stdin,
            interactive,
        }
    }
}

impl Io for ConsoleIo {
    fn write(&self, message: &str) {
        println!("{message}");
    }

    fn write_error(&self, message: &str) {
        eprintln!("{}", message.red());
    }

    fn ask(&self, question: &str, default: &str) -> hookline_core::Result<String> {
        if !self.interactive {
            return Ok(default.to_string());
        }

        let answer: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt(question)
            .default(default.to_string())
            .allow_empty(true)
            .interact_text()
            .map_err(|e| hookline_core::Error::Prompt(e.to_string()))?;

        if answer.trim().is_empty() {
            Ok(default.to_string())
        } else {
            Ok(answer)
        }
    }

    fn argument(&self, name: &str) -> Option<String> {
        self.arguments.get(name).cloned()
    }

    fn arguments(&self) -> Vec<(String, String)> {
        self.arguments
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    fn standard_input(&self) -> &[String] {
        &self.stdin
    }

    fn is_interactive(&self) -> bool {
        self.interactive
    }
}

/// Parse a `--arg name=value` pair
///
/// # Errors
///
/// Returns an error when there is no `=` or the name is empty
pub fn parse_argument(raw: &str) -> Result<(String, String)> {
    match raw.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(CommandError::InvalidArgument(raw.to_string())),
    }
}

/// Name the positional arguments git passed and merge explicit `--arg` pairs
///
/// Positionals beyond the hook's known arguments are kept as `arg<N>`
/// (1-based). Explicit pairs win over positionals of the same name.
///
/// # Errors
///
/// Returns an error on a malformed `--arg`
pub fn hook_arguments(
    hook: HookName,
    positional: &[String],
    explicit: &[String],
) -> Result<IndexMap<String, String>> {
    let names = hook.argument_names();
    let mut arguments = IndexMap::new();

    for (index, value) in positional.iter().enumerate() {
        let name = names
            .get(index)
            .map_or_else(|| format!("arg{}", index + 1), |n| (*n).to_string());
        arguments.insert(name, value.clone());
    }

    for raw in explicit {
        let (name, value) = parse_argument(raw)?;
        arguments.insert(name, value);
    }

    Ok(arguments)
}

/// Read the lines git wrote to the hook's stdin, dropping empty ones
///
/// # Errors
///
/// Returns an error if reading fails
pub fn read_lines<R: BufRead>(reader: R) -> Result<Vec<String>> {
    let mut lines = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if !line.trim().is_empty() {
            lines.push(line);
        }
    }
    Ok(lines)
}
