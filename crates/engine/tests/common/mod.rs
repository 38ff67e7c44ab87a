//! Shared fixtures for the engine integration tests

#![allow(clippy::unwrap_used, dead_code)]

use hookline_config::{ActionConfig, Config, HookConfig};
use hookline_core::{Commit, HookName, Repository, Result};
use hookline_engine::Git2Repository;
use std::cell::Cell;
use std::path::Path;
use tempfile::TempDir;

/// Scratch repository on disk
pub struct GitRepo {
    dir: TempDir,
    repo: git2::Repository,
}

impl GitRepo {
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

    pub fn exists(&self, relative: &str) -> bool {
        self.path().join(relative).exists()
    }

    pub fn stage(&self, relative: &str) {
        let mut index = self.repo.index().unwrap();
        index.add_path(Path::new(relative)).unwrap();
        index.write().unwrap();
    }

    pub fn commit_all(&self, message: &str) -> String {
        let mut index = self.repo.index().unwrap();
        index
            .add_all(["*"], git2::IndexAddOption::DEFAULT, None)
            .unwrap();
        index.write().unwrap();
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

/// Wraps a repository and counts file list queries
pub struct CountingRepository<R> {
    inner: R,
    pub staged_queries: Cell<usize>,
}

impl<R: Repository> CountingRepository<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            staged_queries: Cell::new(0),
        }
    }
}

impl<R: Repository> Repository for CountingRepository<R> {
    fn root(&self) -> &Path {
        self.inner.root()
    }

    fn git_dir(&self) -> &Path {
        self.inner.git_dir()
    }

    fn current_branch(&self) -> Result<String> {
        self.inner.current_branch()
    }

    fn upstream_branch(&self) -> Result<Option<String>> {
        self.inner.upstream_branch()
    }

    fn staged_files(&self, diff_filter: &str) -> Result<Vec<String>> {
        self.staged_queries.set(self.staged_queries.get() + 1);
        self.inner.staged_files(diff_filter)
    }

    fn changed_files(&self, from: Option<&str>, to: &str, diff_filter: &str) -> Result<Vec<String>> {
        self.inner.changed_files(from, to, diff_filter)
    }

    fn merge_base(&self, a: &str, b: &str) -> Result<Option<String>> {
        self.inner.merge_base(a, b)
    }

    fn commits_between(&self, from: &str, to: &str) -> Result<Vec<Commit>> {
        self.inner.commits_between(from, to)
    }

    fn resolve(&self, revision: &str) -> Result<Option<String>> {
        self.inner.resolve(revision)
    }
}

/// Configuration with one hook holding `actions`
pub fn config_with(hook: HookName, actions: Vec<ActionConfig>) -> Config {
    Config::default().with_hook(
        hook,
        HookConfig {
            enabled: true,
            actions,
            conditions: Vec::new(),
        },
    )
}
