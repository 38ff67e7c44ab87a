//! Hookline CLI library
//!
//! All CLI logic lives here so it can be tested without spawning the binary.
//! `main.rs` only parses arguments, calls [`run`] and turns the result into
//! an exit code.

pub mod cmd;
pub mod command;
pub mod common;
pub mod error;
pub mod ui;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use command::Command;
use common::RuntimeContext;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "\ncommit:  ",
    env!("VERGEN_GIT_SHA"),
    "\nbuilt:   ",
    env!("VERGEN_BUILD_TIMESTAMP"),
    "\nrustc:   ",
    env!("VERGEN_RUSTC_SEMVER"),
);

/// Hookline - configurable git hooks
#[derive(Parser)]
#[command(name = "hookline")]
#[command(about = "Run configurable actions from git hooks")]
#[command(version, long_version = LONG_VERSION)]
#[command(long_about = "Run configurable actions from git hooks

Each git hook calls `hookline run <hook>`. The repository's hookline.toml
lists, per hook, the shell commands and built-in checks to run, the
conditions gating them and the plugins observing the run.

Examples:
  • hookline run pre-commit
  • hookline run commit-msg .git/COMMIT_EDITMSG
  • hookline list --format table
  • hookline show pre-push")]
pub struct Cli {
    /// Path to the config file (default: discovered from the repository)
    #[arg(long, global = true, env = "HOOKLINE_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Repository to operate on (default: current directory)
    #[arg(long, short = 'r', global = true, value_name = "DIR")]
    pub repository: Option<PathBuf>,

    /// Enable verbose output (shows DEBUG level logs)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Write logs to a file (useful for debugging)
    #[arg(long, global = true, env = "HOOKLINE_LOG_FILE", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for the hookline CLI
#[derive(Subcommand)]
pub enum Commands {
    /// Run the actions configured for a git hook
    Run(cmd::run::RunCommand),

    /// List configured hooks
    List(cmd::list::ListCommand),

    /// Show the configuration of one hook
    Show(cmd::show::ShowCommand),
}

/// Initialize logging and run the CLI
///
/// Returns the process exit code.
///
/// # Errors
///
/// Returns an error if logging cannot be set up or the command fails to run
pub fn run(cli: Cli) -> Result<i32> {
    hookline_config::logging::init(cli.verbose, cli.log_file.as_deref())
        .context("Failed to initialize logging")?;
    execute(&cli)
}

/// Run the parsed command without touching global logging state
///
/// # Errors
///
/// Returns an error if the repository or configuration cannot be loaded, or
/// the command fails
pub fn execute(cli: &Cli) -> Result<i32> {
    let context = RuntimeContext::load(cli.repository.as_deref(), cli.config.as_deref())
        .context("Failed to load hookline")?;

    match &cli.command {
        Commands::Run(command) => command
            .execute(&context)
            .with_context(|| format!("Failed to run hook '{}'", command.hook)),
        Commands::List(command) => {
            command.execute(&context)?;
            Ok(0)
        }
        Commands::Show(command) => {
            command.execute(&context)?;
            Ok(0)
        }
    }
}
