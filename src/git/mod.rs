use std::path::{Path, PathBuf};
use std::process::Command;

mod backend;
mod branch;
mod config;
mod maintenance;
mod refs;
mod remote;
mod worktree;

pub use worktree::parse_worktree_porcelain;

/// Thin wrapper around the `git` executable.
///
/// Every method runs one `git` process and turns a non-zero exit status into
/// an error carrying git's stderr.
pub struct GitCommand {
    pub(crate) quiet: bool,
    pub(crate) work_dir: Option<PathBuf>,
}

impl GitCommand {
    pub fn new(quiet: bool) -> Self {
        Self {
            quiet,
            work_dir: None,
        }
    }

    /// Run every command in `dir` instead of the process working directory.
    pub fn with_work_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.work_dir = Some(dir.into());
        self
    }

    pub fn work_dir(&self) -> Option<&Path> {
        self.work_dir.as_deref()
    }

    /// A `git` command rooted at the configured working directory.
    pub(crate) fn command(&self) -> Command {
        let mut cmd = Command::new("git");
        if let Some(dir) = &self.work_dir {
            cmd.current_dir(dir);
        }
        cmd
    }
}
