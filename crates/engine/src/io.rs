//! In-memory IO
//!
//! [`BufferedIo`] collects everything written to it and answers prompts from a
//! scripted queue. Non-terminal front-ends and tests run hooks through it.

use hookline_core::{Io, Result};
use indexmap::IndexMap;
use std::cell::RefCell;
use std::collections::VecDeque;

/// IO that records output and replays scripted answers
#[derive(Debug, Default)]
pub struct BufferedIo {
    arguments: IndexMap<String, String>,
    stdin: Vec<String>,
    interactive: bool,
    answers: RefCell<VecDeque<String>>,
    questions: RefCell<Vec<String>>,
    output: RefCell<Vec<String>>,
    errors: RefCell<Vec<String>>,
}

impl BufferedIo {
    /// Create a non-interactive IO without arguments
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a named hook argument
    #[must_use]
    pub fn with_argument(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.arguments.insert(name.into(), value.into());
        self
    }

    /// Set the lines git wrote to stdin
    #[must_use]
    pub fn with_stdin<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stdin = lines.into_iter().map(Into::into).collect();
        self
    }

    /// Make the IO interactive and queue answers for upcoming questions
    #[must_use]
    pub fn with_answers<I, S>(mut self, answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.interactive = true;
        self.answers
            .get_mut()
            .extend(answers.into_iter().map(Into::into));
        self
    }

    /// Informational messages written so far
    #[must_use]
    pub fn output(&self) -> Vec<String> {
        self.output.borrow().clone()
    }

    /// Error messages written so far
    #[must_use]
    pub fn errors(&self) -> Vec<String> {
        self.errors.borrow().clone()
    }

    /// Questions asked so far
    #[must_use]
    pub fn questions(&self) -> Vec<String> {
        self.questions.borrow().clone()
    }
}

impl Io for BufferedIo {
    fn write(&self, message: &str) {
        self.output.borrow_mut().push(message.to_string());
    }

    fn write_error(&self, message: &str) {
        self.errors.borrow_mut().push(message.to_string());
    }

    fn ask(&self, question: &str, default: &str) -> Result<String> {
        self.questions.borrow_mut().push(question.to_string());
        if !self.interactive {
            return Ok(default.to_string());
        }
        let answer = self.answers.borrow_mut().pop_front().unwrap_or_default();
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

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_non_interactive_returns_default() {
        let io = BufferedIo::new();
        assert_eq!(io.ask("Continue?", "n").unwrap(), "n");
        assert_eq!(io.questions(), vec!["Continue?"]);
    }

    #[test]
    fn test_scripted_answers() {
        let io = BufferedIo::new().with_answers(["y", ""]);
        assert!(io.is_interactive());
        assert_eq!(io.ask("First?", "n").unwrap(), "y");
        assert_eq!(io.ask("Second?", "n").unwrap(), "n");
        assert_eq!(io.ask("Third?", "x").unwrap(), "x");
    }

    #[test]
    fn test_records_output() {
        let io = BufferedIo::new()
            .with_argument("file", ".git/COMMIT_EDITMSG")
            .with_stdin(["a b c d"]);
        io.write("hello");
        io.write_error("oops");
        assert_eq!(io.output(), vec!["hello"]);
        assert_eq!(io.errors(), vec!["oops"]);
        assert_eq!(io.argument("file").as_deref(), Some(".git/COMMIT_EDITMSG"));
        assert_eq!(io.standard_input(), &["a b c d".to_string()]);
        assert_eq!(io.arguments().len(), 1);
    }
}
