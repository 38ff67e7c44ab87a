//! Build script for hookline-cli.
//!
//! Emits `VERGEN_*` variables used by `hookline --version`:
//! build timestamp, rustc version and the git commit the binary was built from.
//! Outside a git checkout vergen falls back to placeholder values.

use vergen_git2::{Emitter, Git2Builder};

fn main() -> anyhow::Result<()> {
    let build = vergen::BuildBuilder::default()
        .build_timestamp(true)
        .build()?;
    let rustc = vergen::RustcBuilder::default().semver(true).build()?;

    vergen::Emitter::default()
        .add_instructions(&build)?
        .add_instructions(&rustc)?
        .emit()?;

    let git2 = Git2Builder::default().sha(true).build()?;
    Emitter::default().add_instructions(&git2)?.emit()?;

    Ok(())
}
