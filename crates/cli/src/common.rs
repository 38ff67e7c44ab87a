//! Common types shared across CLI commands

use crate::error::{CommandError, Result};
use hookline_config::Config;
use hookline_core::Repository;
use hookline_engine::Git2Repository;
use std::path::{Path, PathBuf};

/// Runtime context for CLI commands
///
/// Opened once per invocation: the repository hooks run against and the
/// configuration that describes them.
pub struct RuntimeContext {
    /// Loaded configuration
    pub config: Config,
    /// Repository the hook runs in
    pub repository: Git2Repository,
}

impl RuntimeContext {
    /// Open the repository and load its configuration
    ///
    /// `repository` defaults to the current directory. Without an explicit
    /// `config` file the configuration is discovered from the repository root.
    ///
    /// # Errors
    ///
    /// Returns an error if no repository is found or the configuration is invalid
    pub fn load(repository: Option<&Path>, config: Option<&Path>) -> Result<Self> {
        let start = match repository {
            Some(path) => path.to_path_buf(),
            None => std::env::current_dir()?,
        };

        let repository = Git2Repository::discover(&start).map_err(|e| {
            tracing::debug!(path = %start.display(), error = %e, "Repository discovery failed");
            CommandError::NotARepository(start.clone())
        })?;

        let config = match config {
            Some(path) => Config::load(path)?,
            None => Config::discover(repository.root())?,
        };

        Ok(Self { config, repository })
    }

    /// Root of the working tree
    #[must_use]
    pub fn root(&self) -> &Path {
        self.repository.root()
    }

    /// Configuration file in use, if any
    #[must_use]
    pub fn config_path(&self) -> Option<PathBuf> {
        self.config.path().map(Path::to_path_buf)
    }
}
