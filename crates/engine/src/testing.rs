//! Test doubles shared by the unit tests of this crate

#![allow(clippy::unwrap_used, clippy::panic)]

use crate::git::Git2Repository;
use hookline_core::{Commit, Repository, Result};
use std::cell::Cell;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Repository double with canned answers and query counters
pub struct FakeRepository {
    pub root: PathBuf,
    pub git_dir: PathBuf,
    pub branch: String,
    pub upstream: Option<String>,
    pub staged: Vec<String>,
    pub changed: Vec<String>,
    pub commits: Vec<Commit>,
    pub has_orig_head: bool,
    pub broken: bool,
    pub staged_queries: Cell<usize>,
    pub changed_queries: Cell<usize>,
}

impl FakeRepository {
    pub fn new() -> Self {
        Self::at(Path::new("/repo"))
    }

    pub fn at(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            git_dir: root.join(".git"),
            branch: "main".to_string(),
            upstream: None,
            staged: Vec::new(),
            changed: Vec::new(),
            commits: Vec::new(),
            has_orig_head: false,
            broken: false,
            staged_queries: Cell::new(0),
            changed_queries: Cell::new(0),
        }
    }

    pub fn with_staged(mut self, files: &[&str]) -> Self {
        self.staged = files.iter().map(ToString::to_string).collect();
        self
    }

    pub fn with_changed(mut self, files: &[&str]) -> Self {
        self.changed = files.iter().map(ToString::to_string).collect();
        self
    }

    pub fn on_branch(mut self, branch: &str) -> Self {
        self.branch = branch.to_string();
        self
    }

    pub fn broken(mut self) -> Self {
        self.broken = true;
        self
    }

    fn check(&self) -> Result<()> {
        if self.broken {
            Err(hookline_core::Error::Repository("repository is broken".to_string()))
        } else {
            Ok(())
        }
    }
}

impl Repository for FakeRepository {
    fn root(&self) -> &Path {
        &self.root
    }

    fn git_dir(&self) -> &Path {
        &self.git_dir
    }

    fn current_branch(&self) -> Result<String> {
        self.check()?;
        Ok(self.branch.clone())
    }

    fn upstream_branch(&self) -> Result<Option<String>> {
        self.check()?;
        Ok(self.upstream.clone())
    }

    fn staged_files(&self, _diff_filter: &str) -> Result<Vec<String>> {
        self.check()?;
        self.staged_queries.set(self.staged_queries.get() + 1);
        Ok(self.staged.clone())
    }

    fn changed_files(
        &self,
        _from: Option<&str>,
        _to: &str,
        _diff_filter: &str,
    ) -> Result<Vec<String>> {
        self.check()?;
        self.changed_queries.set(self.changed_queries.get() + 1);
        Ok(self.changed.clone())
    }

    fn merge_base(&self, _a: &str, _b: &str) -> Result<Option<String>> {
        self.check()?;
        Ok(Some("base".to_string()))
    }

    fn commits_between(&self, _from: &str, _to: &str) -> Result<Vec<Commit>> {
        self.check()?;
        Ok(self.commits.clone())
    }

    fn resolve(&self, revision: &str) -> Result<Option<String>> {
        self.check()?;
        if revision == "ORIG_HEAD" && !self.has_orig_head {
            return Ok(None);
        }
        Ok(Some(revision.to_string()))
    }
}

/// Scratch git repository on disk
pub struct GitFixture {
    dir: TempDir,
    repo: git2::Repository,
}

impl GitFixture {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let mut opts = git2::RepositoryInitOptions::new();
        opts.initial_head("main");
        let repo = git2::Repository::init_opts(dir.path(), &opts).unwrap();
        let mut config = repo.config().unwrap();
        config.set_str("user.name", "Hook Tester").unwrap();
        config.set_str("user.email", "tester@example.com").unwrap();
        Self { dir, repo }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn open(&self) -> Git2Repository {
        Git2Repository::discover(self.path()).unwrap()
    }

    pub fn write(&self, relative: &str, content: &str) {
        let path = self.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
    }

    pub fn remove(&self, relative: &str) {
        std::fs::remove_file(self.path().join(relative)).unwrap();
    }

    pub fn stage_all(&self) {
        let mut index = self.repo.index().unwrap();
        index
            .add_all(["*"], git2::IndexAddOption::DEFAULT, None)
            .unwrap();
        index.update_all(["*"], None).unwrap();
        index.write().unwrap();
    }

    /// Stage everything and commit, returning the new commit id
    pub fn commit_all(&self, message: &str) -> String {
        self.stage_all();
        let mut index = self.repo.index().unwrap();
        let tree_id = index.write_tree().unwrap();
        let tree = self.repo.find_tree(tree_id).unwrap();
        let signature = self.repo.signature().unwrap();
        let parent = self.repo.head().ok().map(|h| h.peel_to_commit().unwrap());
        let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();
        self.repo
            .commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)
            .unwrap()
            .to_string()
    }
}
