//! Ref ranges a hook operates on
//!
//! "Changed files" means different things per hook. For pre-push it is
//! whatever is about to be pushed. For post-checkout it is the difference
//! between the previous and the new `HEAD`. For post-merge and post-rewrite it
//! is everything since `ORIG_HEAD`. Other hooks have no range.

use hookline_core::{HookName, Io, Repository, Result};

/// A `(from, to)` pair of revisions
///
/// `from = None` means "a ref the remote has never seen".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefRange {
    /// Exclusive start revision
    pub from: Option<String>,
    /// Inclusive end revision
    pub to: String,
}

impl RefRange {
    /// Create a range
    pub fn new(from: Option<&str>, to: &str) -> Self {
        Self {
            from: from.map(str::to_string),
            to: to.to_string(),
        }
    }
}

/// Git writes object ids made of zeros for refs that do not exist
fn is_zero_sha(sha: &str) -> bool {
    !sha.is_empty() && sha.bytes().all(|b| b == b'0')
}

/// Parse pre-push standard input
///
/// Each line reads `<local ref> <local sha> <remote ref> <remote sha>`.
/// Deleted refs (zero local sha) are skipped; refs new to the remote (zero
/// remote sha) get no start revision. Malformed lines are ignored.
#[must_use]
pub fn parse_push_lines(lines: &[String]) -> Vec<RefRange> {
    let mut ranges = Vec::new();
    for line in lines {
        let fields: Vec<&str> = line.split_whitespace().collect();
        let [_local_ref, local_sha, _remote_ref, remote_sha] = fields.as_slice() else {
            if !line.trim().is_empty() {
                tracing::warn!(line = %line, "Ignoring malformed pre-push input line");
            }
            continue;
        };
        if is_zero_sha(local_sha) {
            tracing::debug!(line = %line, "Skipping deleted ref");
            continue;
        }
        let from = (!is_zero_sha(remote_sha)).then_some(*remote_sha);
        ranges.push(RefRange::new(from, local_sha));
    }
    ranges
}

/// Detect the ranges of the running hook
///
/// # Errors
///
/// Returns error if resolving `ORIG_HEAD` fails
pub fn detect(hook: HookName, io: &dyn Io, repository: &dyn Repository) -> Result<Vec<RefRange>> {
    match hook {
        HookName::PrePush => Ok(parse_push_lines(io.standard_input())),
        HookName::PostCheckout => {
            let previous = io.argument("previous-head");
            let new = io.argument("new-head");
            match (previous, new) {
                (Some(previous), Some(new)) if !is_zero_sha(&previous) => {
                    Ok(vec![RefRange::new(Some(&previous), &new)])
                }
                (Some(_), Some(new)) => Ok(vec![RefRange::new(None, &new)]),
                _ => Ok(Vec::new()),
            }
        }
        HookName::PostMerge | HookName::PostRewrite => {
            if repository.resolve("ORIG_HEAD")?.is_some() {
                Ok(vec![RefRange::new(Some("ORIG_HEAD"), "HEAD")])
            } else {
                Ok(Vec::new())
            }
        }
        _ => Ok(Vec::new()),
    }
}

/// Files changed across `ranges`, first occurrence order, without duplicates
///
/// # Errors
///
/// Returns error if a repository query fails
pub fn changed_files(
    repository: &dyn Repository,
    ranges: &[RefRange],
    diff_filter: &str,
) -> Result<Vec<String>> {
    let mut files: Vec<String> = Vec::new();
    for range in ranges {
        for file in repository.changed_files(range.from.as_deref(), &range.to, diff_filter)? {
            if !files.contains(&file) {
                files.push(file);
            }
        }
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::io::BufferedIo;
    use crate::testing::FakeRepository;

    const ZERO: &str = "0000000000000000000000000000000000000000";

    #[test]
    fn test_parse_push_lines() {
        let lines = vec![
            "refs/heads/main abc123 refs/heads/main def456".to_string(),
            format!("refs/heads/new 111aaa refs/heads/new {ZERO}"),
            format!("(delete) {ZERO} refs/heads/old 222bbb"),
            "garbage".to_string(),
            String::new(),
        ];
        assert_eq!(
            parse_push_lines(&lines),
            vec![
                RefRange::new(Some("def456"), "abc123"),
                RefRange::new(None, "111aaa"),
            ]
        );
    }

    #[test]
    fn test_detect_pre_push() {
        let io = BufferedIo::new().with_stdin(["refs/heads/main a refs/heads/main b"]);
        let ranges = detect(HookName::PrePush, &io, &FakeRepository::new()).unwrap();
        assert_eq!(ranges, vec![RefRange::new(Some("b"), "a")]);
    }

    #[test]
    fn test_detect_post_checkout() {
        let io = BufferedIo::new()
            .with_argument("previous-head", "old")
            .with_argument("new-head", "new")
            .with_argument("mode", "1");
        let ranges = detect(HookName::PostCheckout, &io, &FakeRepository::new()).unwrap();
        assert_eq!(ranges, vec![RefRange::new(Some("old"), "new")]);

        let clone = BufferedIo::new()
            .with_argument("previous-head", ZERO)
            .with_argument("new-head", "new");
        let ranges = detect(HookName::PostCheckout, &clone, &FakeRepository::new()).unwrap();
        assert_eq!(ranges, vec![RefRange::new(None, "new")]);
    }

    #[test]
    fn test_detect_post_merge_needs_orig_head() {
        let io = BufferedIo::new();
        let mut repository = FakeRepository::new();
        assert!(detect(HookName::PostMerge, &io, &repository).unwrap().is_empty());

        repository.has_orig_head = true;
        assert_eq!(
            detect(HookName::PostRewrite, &io, &repository).unwrap(),
            vec![RefRange::new(Some("ORIG_HEAD"), "HEAD")]
        );
    }

    #[test]
    fn test_pre_commit_has_no_range() {
        let io = BufferedIo::new();
        assert!(
            detect(HookName::PreCommit, &io, &FakeRepository::new())
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn test_changed_files_deduplicates_across_ranges() {
        let repository = FakeRepository::new().with_changed(&["a.rs", "b.rs"]);
        let ranges = vec![RefRange::new(Some("x"), "y"), RefRange::new(None, "z")];
        let files = changed_files(&repository, &ranges, "ACMR").unwrap();
        assert_eq!(files, vec!["a.rs", "b.rs"]);
        assert_eq!(repository.changed_queries.get(), 2);
    }
}
