//! arborist: classify local Git branches and clean up the ones that are done.
//!
//! The crate is layered so that branch logic never talks to git directly:
//!
//! - [`core`] holds the branch validator, protection matcher, status
//!   classifier, deletion planner and executor, written against the
//!   [`core::RepoBackend`] trait
//! - [`git`] implements that trait by invoking the `git` binary
//! - [`commands`] wires both to the command line through [`output`]

use anyhow::{Context, Result};
use std::path::Path;
use std::process::{Command, Stdio};
use which::which;

pub mod commands;
pub mod core;
pub mod error;
pub mod git;
pub mod logging;
pub mod output;
pub mod settings;
pub mod styles;

pub use settings::ArboristSettings;

/// Version shown by `arborist --version`.
pub const VERSION: &str = env!("ARBORIST_VERSION_DISPLAY");

/// Whether `dir` (or the current directory) is inside a Git work tree.
pub fn is_git_repository(dir: Option<&Path>) -> Result<bool> {
    let mut cmd = Command::new("git");
    cmd.args(["rev-parse", "--is-inside-work-tree"])
        .stdout(Stdio::null())
        .stderr(Stdio::null());
    if let Some(dir) = dir {
        cmd.current_dir(dir);
    }
    let status = cmd
        .status()
        .context("Failed to check if inside Git repository")?;

    Ok(status.success())
}

pub fn check_dependencies() -> Result<()> {
    let required_tools = ["git"];
    let missing: Vec<&str> = required_tools
        .into_iter()
        .filter(|tool| which(tool).is_err())
        .collect();

    if !missing.is_empty() {
        anyhow::bail!("Missing required dependencies: {}", missing.join(", "));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_plain_directory_is_not_a_repository() {
        let dir = TempDir::new().unwrap();
        assert!(!is_git_repository(Some(dir.path())).unwrap());
    }

    #[test]
    fn test_git_is_available() {
        check_dependencies().unwrap();
    }
}
