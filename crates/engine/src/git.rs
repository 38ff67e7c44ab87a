//! Git access through libgit2
//!
//! [`Git2Repository`] implements the read-only [`Repository`] queries the
//! engine needs. Nothing here mutates the repository.

use crate::Result;
use hookline_core::{Commit, Repository};
use std::path::{Path, PathBuf};

/// Helper function to convert git2 errors to `hookline_core` errors
#[inline]
#[allow(clippy::needless_pass_by_value)]
fn git_err(e: git2::Error) -> hookline_core::Error {
    hookline_core::Error::Repository(e.message().to_string())
}

/// `git diff --diff-filter` letter of a delta
fn status_letter(status: git2::Delta) -> Option<char> {
    match status {
        git2::Delta::Added => Some('A'),
        git2::Delta::Copied => Some('C'),
        git2::Delta::Deleted => Some('D'),
        git2::Delta::Modified => Some('M'),
        git2::Delta::Renamed => Some('R'),
        git2::Delta::Typechange => Some('T'),
        _ => None,
    }
}

/// Collect the paths of a diff whose status passes `diff_filter`
fn diff_paths(diff: &git2::Diff<'_>, diff_filter: &str, into: &mut Vec<String>) {
    for delta in diff.deltas() {
        let Some(letter) = status_letter(delta.status()) else {
            continue;
        };
        if !diff_filter.is_empty() && !diff_filter.to_ascii_uppercase().contains(letter) {
            continue;
        }
        let file = if letter == 'D' {
            delta.old_file()
        } else {
            delta.new_file()
        };
        if let Some(path) = file.path() {
            let path = path.to_string_lossy().into_owned();
            if !into.contains(&path) {
                into.push(path);
            }
        }
    }
}

/// Repository backed by libgit2
pub struct Git2Repository {
    repo: git2::Repository,
    root: PathBuf,
    git_dir: PathBuf,
}

impl Git2Repository {
    /// Open the repository containing `path`
    ///
    /// # Errors
    ///
    /// Returns an error if no repository is found or it has no working tree
    pub fn discover(path: &Path) -> Result<Self> {
        let repo = git2::Repository::discover(path)?;
        let root = repo
            .workdir()
            .ok_or_else(|| {
                crate::Error::Configuration(format!(
                    "Repository at {} has no working tree",
                    repo.path().display()
                ))
            })?
            .to_path_buf();
        let git_dir = repo.path().to_path_buf();

        tracing::debug!(root = %root.display(), "Opened repository");
        Ok(Self {
            repo,
            root,
            git_dir,
        })
    }

    /// Tree of `HEAD`, `None` before the first commit
    fn head_tree(&self) -> std::result::Result<Option<git2::Tree<'_>>, git2::Error> {
        match self.repo.head() {
            Ok(head) => Ok(Some(head.peel_to_tree()?)),
            Err(e)
                if e.code() == git2::ErrorCode::UnbornBranch
                    || e.code() == git2::ErrorCode::NotFound =>
            {
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    fn commit_oid(&self, revision: &str) -> std::result::Result<git2::Oid, git2::Error> {
        Ok(self.repo.revparse_single(revision)?.peel_to_commit()?.id())
    }

    fn diff_trees(
        &self,
        from: Option<&git2::Tree<'_>>,
        to: &git2::Tree<'_>,
        diff_filter: &str,
        into: &mut Vec<String>,
    ) -> std::result::Result<(), git2::Error> {
        let mut diff = self.repo.diff_tree_to_tree(from, Some(to), None)?;
        diff.find_similar(None)?;
        diff_paths(&diff, diff_filter, into);
        Ok(())
    }
}

impl Repository for Git2Repository {
    fn root(&self) -> &Path {
        &self.root
    }

    fn git_dir(&self) -> &Path {
        &self.git_dir
    }

    fn current_branch(&self) -> hookline_core::Result<String> {
        match self.repo.head() {
            Ok(head) if head.is_branch() => Ok(head.shorthand().unwrap_or("HEAD").to_string()),
            Ok(_) => Ok("HEAD".to_string()),
            Err(e) if e.code() == git2::ErrorCode::UnbornBranch => {
                // No commit yet: HEAD still names the branch it will create
                let head = self.repo.find_reference("HEAD").map_err(git_err)?;
                Ok(head
                    .symbolic_target()
                    .and_then(|target| target.strip_prefix("refs/heads/"))
                    .unwrap_or("HEAD")
                    .to_string())
            }
            Err(e) => Err(git_err(e)),
        }
    }

    fn upstream_branch(&self) -> hookline_core::Result<Option<String>> {
        let branch = self.current_branch()?;
        let Ok(local) = self.repo.find_branch(&branch, git2::BranchType::Local) else {
            return Ok(None);
        };
        match local.upstream() {
            Ok(upstream) => Ok(upstream.name().map_err(git_err)?.map(str::to_string)),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(None),
            Err(e) => Err(git_err(e)),
        }
    }

    fn staged_files(&self, diff_filter: &str) -> hookline_core::Result<Vec<String>> {
        let head_tree = self.head_tree().map_err(git_err)?;
        let mut diff = self
            .repo
            .diff_tree_to_index(head_tree.as_ref(), None, None)
            .map_err(git_err)?;
        diff.find_similar(None).map_err(git_err)?;

        let mut files = Vec::new();
        diff_paths(&diff, diff_filter, &mut files);
        Ok(files)
    }

    fn changed_files(
        &self,
        from: Option<&str>,
        to: &str,
        diff_filter: &str,
    ) -> hookline_core::Result<Vec<String>> {
        let to_commit = self
            .repo
            .find_commit(self.commit_oid(to).map_err(git_err)?)
            .map_err(git_err)?;
        let to_tree = to_commit.tree().map_err(git_err)?;
        let mut files = Vec::new();

        if let Some(from) = from {
            let from_tree = self
                .repo
                .revparse_single(from)
                .and_then(|object| object.peel_to_tree())
                .map_err(git_err)?;
            self.diff_trees(Some(&from_tree), &to_tree, diff_filter, &mut files)
                .map_err(git_err)?;
            return Ok(files);
        }

        // New branch: every commit the remotes do not know yet
        let mut walk = self.repo.revwalk().map_err(git_err)?;
        walk.push(to_commit.id()).map_err(git_err)?;
        walk.hide_glob("refs/remotes/*").map_err(git_err)?;
        for oid in walk {
            let commit = self
                .repo
                .find_commit(oid.map_err(git_err)?)
                .map_err(git_err)?;
            let tree = commit.tree().map_err(git_err)?;
            let parent_tree = match commit.parent(0) {
                Ok(parent) => Some(parent.tree().map_err(git_err)?),
                Err(_) => None,
            };
            self.diff_trees(parent_tree.as_ref(), &tree, diff_filter, &mut files)
                .map_err(git_err)?;
        }
        Ok(files)
    }

    fn merge_base(&self, a: &str, b: &str) -> hookline_core::Result<Option<String>> {
        let (Some(a), Some(b)) = (self.resolve(a)?, self.resolve(b)?) else {
            return Ok(None);
        };
        let a = git2::Oid::from_str(&a).map_err(git_err)?;
        let b = git2::Oid::from_str(&b).map_err(git_err)?;
        match self.repo.merge_base(a, b) {
            Ok(oid) => Ok(Some(oid.to_string())),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(None),
            Err(e) => Err(git_err(e)),
        }
    }

    fn commits_between(&self, from: &str, to: &str) -> hookline_core::Result<Vec<Commit>> {
        let mut walk = self.repo.revwalk().map_err(git_err)?;
        walk.set_sorting(git2::Sort::TOPOLOGICAL | git2::Sort::TIME)
            .map_err(git_err)?;
        walk.push(self.commit_oid(to).map_err(git_err)?)
            .map_err(git_err)?;
        walk.hide(self.commit_oid(from).map_err(git_err)?)
            .map_err(git_err)?;

        let mut commits = Vec::new();
        for oid in walk {
            let commit = self
                .repo
                .find_commit(oid.map_err(git_err)?)
                .map_err(git_err)?;
            commits.push(Commit {
                id: commit.id().to_string(),
                summary: commit.summary().unwrap_or_default().to_string(),
                message: commit.message().unwrap_or_default().to_string(),
                author: commit.author().name().unwrap_or_default().to_string(),
            });
        }
        Ok(commits)
    }

    fn resolve(&self, revision: &str) -> hookline_core::Result<Option<String>> {
        match self.commit_oid(revision) {
            Ok(oid) => Ok(Some(oid.to_string())),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(None),
            Err(e) => Err(git_err(e)),
        }
    }
}
