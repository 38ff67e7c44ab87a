//! Supported git hooks
//!
//! Git calls hooks by file name; hookline maps those names onto a closed enum so
//! that configuration keys and CLI arguments are validated at parse time.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A git hook hookline knows how to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HookName {
    /// Before a commit is created
    PreCommit,
    /// Before the commit message editor opens
    PrepareCommitMsg,
    /// After the commit message was written
    CommitMsg,
    /// After a commit was created
    PostCommit,
    /// Before refs are pushed to a remote
    PrePush,
    /// After `git checkout` / `git switch`
    PostCheckout,
    /// After a successful merge
    PostMerge,
    /// After `git commit --amend` or `git rebase`
    PostRewrite,
    /// Before a rebase starts
    PreRebase,
}

impl HookName {
    /// Every supported hook, in the order git typically fires them
    pub const ALL: [HookName; 9] = [
        HookName::PreCommit,
        HookName::PrepareCommitMsg,
        HookName::CommitMsg,
        HookName::PostCommit,
        HookName::PrePush,
        HookName::PostCheckout,
        HookName::PostMerge,
        HookName::PostRewrite,
        HookName::PreRebase,
    ];

    /// Get the git file name of this hook
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            HookName::PreCommit => "pre-commit",
            HookName::PrepareCommitMsg => "prepare-commit-msg",
            HookName::CommitMsg => "commit-msg",
            HookName::PostCommit => "post-commit",
            HookName::PrePush => "pre-push",
            HookName::PostCheckout => "post-checkout",
            HookName::PostMerge => "post-merge",
            HookName::PostRewrite => "post-rewrite",
            HookName::PreRebase => "pre-rebase",
        }
    }

    /// Names of the positional arguments git passes to this hook
    ///
    /// The CLI uses these to turn `$1 $2 ...` into named IO arguments that
    /// placeholders such as `{$FILE}` or `{$ARG|value-of:target}` can read.
    #[must_use]
    pub fn argument_names(&self) -> &'static [&'static str] {
        match self {
            HookName::PreCommit | HookName::PostCommit => &[],
            HookName::PrepareCommitMsg => &["file", "mode", "hash"],
            HookName::CommitMsg => &["file"],
            HookName::PrePush => &["target", "url"],
            HookName::PostCheckout => &["previous-head", "new-head", "mode"],
            HookName::PostMerge => &["squash"],
            HookName::PostRewrite => &["git-command"],
            HookName::PreRebase => &["upstream", "branch"],
        }
    }

    /// Whether git feeds ref information to this hook over standard input
    #[must_use]
    pub fn reads_stdin(&self) -> bool {
        matches!(self, HookName::PrePush | HookName::PostRewrite)
    }

    /// Whether this hook can abort the git operation that triggered it
    #[must_use]
    pub fn can_block(&self) -> bool {
        matches!(
            self,
            HookName::PreCommit
                | HookName::PrepareCommitMsg
                | HookName::CommitMsg
                | HookName::PrePush
                | HookName::PreRebase
        )
    }
}

impl fmt::Display for HookName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HookName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        HookName::ALL
            .iter()
            .copied()
            .find(|hook| hook.name() == s)
            .ok_or_else(|| Error::InvalidHookName(s.to_string()))
    }
}
