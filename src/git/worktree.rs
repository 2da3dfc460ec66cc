use super::GitCommand;
use crate::core::WorktreeInfo;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

impl GitCommand {
    pub fn worktree_remove(&self, path: &Path, force: bool) -> Result<()> {
        let mut cmd = self.command();
        cmd.args(["worktree", "remove"]);

        if force {
            cmd.arg("--force");
        }

        cmd.arg(path);

        let output = cmd
            .output()
            .context("Failed to execute git worktree remove command")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("Git worktree remove failed: {}", stderr);
        }

        Ok(())
    }

    pub fn worktree_list_porcelain(&self) -> Result<String> {
        let output = self
            .command()
            .args(["worktree", "list", "--porcelain"])
            .output()
            .context("Failed to execute git worktree list command")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("Git worktree list failed: {}", stderr);
        }

        String::from_utf8(output.stdout).context("Failed to parse git worktree list output")
    }

    pub fn worktree_list(&self) -> Result<Vec<WorktreeInfo>> {
        Ok(parse_worktree_porcelain(&self.worktree_list_porcelain()?))
    }
}

/// Parse the porcelain output of `git worktree list --porcelain`.
///
/// Each entry is separated by a blank line and has the form:
/// ```text
/// worktree /path/to/worktree
/// HEAD <sha>
/// branch refs/heads/branch-name
/// ```
/// Bare entries have `bare` instead of `branch`, detached ones `detached`.
/// The first entry is the main working tree.
pub fn parse_worktree_porcelain(output: &str) -> Vec<WorktreeInfo> {
    let mut entries: Vec<WorktreeInfo> = Vec::new();
    let mut current: Option<WorktreeInfo> = None;

    for line in output.lines() {
        if let Some(path) = line.strip_prefix("worktree ") {
            if let Some(entry) = current.take() {
                entries.push(entry);
            }
            current = Some(WorktreeInfo {
                path: PathBuf::from(path),
                is_main: entries.is_empty(),
                ..Default::default()
            });
            continue;
        }

        let Some(entry) = current.as_mut() else {
            continue;
        };
        if let Some(head) = line.strip_prefix("HEAD ") {
            entry.head = Some(head.to_string());
        } else if let Some(branch_ref) = line.strip_prefix("branch ") {
            entry.branch = branch_ref.strip_prefix("refs/heads/").map(String::from);
        } else if line == "bare" {
            entry.is_bare = true;
        } else if line == "detached" {
            entry.is_detached = true;
        } else if line == "prunable" || line.starts_with("prunable ") {
            entry.is_prunable = true;
        }
    }
    if let Some(entry) = current.take() {
        entries.push(entry);
    }

    entries
}
