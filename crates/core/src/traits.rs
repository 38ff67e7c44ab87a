//! Collaborator traits for the hook engine
//!
//! The engine never talks to a terminal or to git directly. It goes through the
//! two interfaces defined here so that:
//! - **Tests** can run whole hooks against an in-memory IO and a fake repository
//! - **Front-ends** decide how prompts and output look (CLI, CI, editor integration)
//! - **Git access** can be swapped (libgit2 today, another backend tomorrow)

use crate::Result;
use std::path::Path;

/// Input/output abstraction for one hook run
///
/// Wraps everything the engine needs from the outside world besides git:
/// user-facing output, interactive questions, the positional arguments git
/// passed to the hook, and the lines git wrote to the hook's stdin.
///
/// # Examples
///
/// ```ignore
/// fn greet(io: &dyn Io) -> Result<()> {
///     let name = io.ask("Who is committing?", "nobody")?;
///     io.write(&format!("Hello {name}"));
///     Ok(())
/// }
/// ```
pub trait Io {
    /// Write an informational message
    fn write(&self, message: &str);

    /// Write an error message
    fn write_error(&self, message: &str);

    /// Ask the user a question, returning `default` when the answer is empty
    /// or the IO is not interactive
    fn ask(&self, question: &str, default: &str) -> Result<String>;

    /// Get a named hook argument (e.g. `file` for commit-msg)
    fn argument(&self, name: &str) -> Option<String>;

    /// All named hook arguments, in the order they were provided
    fn arguments(&self) -> Vec<(String, String)>;

    /// Lines git wrote to the hook's standard input
    fn standard_input(&self) -> &[String];

    /// Whether prompts can reach a user
    fn is_interactive(&self) -> bool;
}

/// A single commit as seen by conditions and actions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    /// Full object id
    pub id: String,
    /// First line of the message
    pub summary: String,
    /// Complete message
    pub message: String,
    /// Author name
    pub author: String,
}

/// Read-only git queries the engine relies on
///
/// File lists are repository-relative paths using `/` separators. `diff_filter`
/// follows `git diff --diff-filter` letters (`A`dded, `C`opied, `M`odified,
/// `R`enamed, `D`eleted, `T`ype changed); an empty filter means "everything".
pub trait Repository {
    /// Root of the working tree
    fn root(&self) -> &Path;

    /// The `.git` directory
    fn git_dir(&self) -> &Path;

    /// Short name of the checked-out branch (`HEAD` when detached)
    fn current_branch(&self) -> Result<String>;

    /// Upstream of the current branch, if one is configured
    fn upstream_branch(&self) -> Result<Option<String>>;

    /// Files staged in the index compared to `HEAD`
    fn staged_files(&self, diff_filter: &str) -> Result<Vec<String>>;

    /// Staged files with the given extension
    fn staged_files_of_type(&self, extension: &str) -> Result<Vec<String>> {
        Ok(self
            .staged_files("ACMR")?
            .into_iter()
            .filter(|path| has_extension(path, extension))
            .collect())
    }

    /// Files changed between two revisions
    ///
    /// With `from = None` every commit reachable from `to` but not from any
    /// remote-tracking branch is considered (a branch pushed for the first time).
    fn changed_files(&self, from: Option<&str>, to: &str, diff_filter: &str)
    -> Result<Vec<String>>;

    /// Best common ancestor of two revisions
    fn merge_base(&self, a: &str, b: &str) -> Result<Option<String>>;

    /// Commits reachable from `to` but not from `from`, newest first
    fn commits_between(&self, from: &str, to: &str) -> Result<Vec<Commit>>;

    /// Resolve a revision to an object id, `None` when it does not exist
    fn resolve(&self, revision: &str) -> Result<Option<String>>;
}

/// Check whether `path` has `extension` (compared case-insensitively, leading dot optional)
#[must_use]
pub fn has_extension(path: &str, extension: &str) -> bool {
    let extension = extension.trim_start_matches('.');
    Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(extension))
}

/// Check whether `path` lives below `directory` (repository-relative)
#[must_use]
pub fn is_in_directory(path: &str, directory: &str) -> bool {
    let directory = directory.trim_start_matches("./").trim_end_matches('/');
    if directory.is_empty() {
        return true;
    }
    path.strip_prefix(directory)
        .is_some_and(|rest| rest.starts_with('/'))
}
