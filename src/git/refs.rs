use super::GitCommand;
use crate::core::RemoteBranch;
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::process::Stdio;

/// `for-each-ref` format for remote-tracking refs: ref, tip, symref target.
pub(crate) const REMOTE_BRANCH_FORMAT: &str = "%(refname)%09%(objectname)%09%(symref)";

impl GitCommand {
    pub fn for_each_ref(&self, format: &str, refs: &str) -> Result<String> {
        let output = self
            .command()
            .args(["for-each-ref", &format!("--format={format}"), refs])
            .output()
            .context("Failed to execute git for-each-ref command")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("Git for-each-ref failed: {}", stderr);
        }

        String::from_utf8(output.stdout).context("Failed to parse git for-each-ref output")
    }

    /// Remote-tracking branches of the given remotes, without symbolic refs.
    pub fn remote_branch_list(&self, remotes: &[String]) -> Result<Vec<RemoteBranch>> {
        let output = self.for_each_ref(REMOTE_BRANCH_FORMAT, "refs/remotes")?;
        Ok(parse_remote_branches(&output, remotes))
    }

    /// Resolve a revision to a commit id. Returns `None` when it does not exist.
    pub fn rev_parse_verify(&self, rev: &str) -> Result<Option<String>> {
        let output = self
            .command()
            .args(["rev-parse", "--verify", "--quiet", &format!("{rev}^{{commit}}")])
            .output()
            .context("Failed to execute git rev-parse command")?;

        if !output.status.success() {
            return Ok(None);
        }

        let stdout =
            String::from_utf8(output.stdout).context("Failed to parse git rev-parse output")?;
        Ok(Some(stdout.trim().to_string()))
    }

    /// Check if `commit` is an ancestor of `target` using merge-base.
    ///
    /// Exit status 1 means "not an ancestor"; anything else non-zero is an
    /// error (unknown revision, corrupt repository).
    pub fn merge_base_is_ancestor(&self, commit: &str, target: &str) -> Result<bool> {
        let output = self
            .command()
            .args(["merge-base", "--is-ancestor", commit, target])
            .output()
            .context("Failed to execute git merge-base command")?;

        match output.status.code() {
            Some(0) => Ok(true),
            Some(1) => Ok(false),
            _ => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                anyhow::bail!("Git merge-base failed: {}", stderr);
            }
        }
    }

    /// Check if the working directory is inside any Git repository (work tree or bare)
    pub fn is_inside_git_repo(&self) -> Result<bool> {
        let output = self
            .command()
            .args(["rev-parse", "--git-dir"])
            .stderr(Stdio::null())
            .output()
            .context("Failed to execute git rev-parse command")?;

        Ok(output.status.success())
    }

    pub fn get_git_dir(&self) -> Result<PathBuf> {
        let output = self
            .command()
            .args(["rev-parse", "--absolute-git-dir"])
            .output()
            .context("Failed to execute git rev-parse command")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("Git rev-parse failed: {}", stderr);
        }

        String::from_utf8(output.stdout)
            .context("Failed to parse git rev-parse output")
            .map(|s| PathBuf::from(s.trim()))
    }
}

/// Parse [`REMOTE_BRANCH_FORMAT`] output.
///
/// Remote names may contain `/`, so the longest known remote that prefixes a
/// ref wins. Refs of unknown remotes and symbolic refs (`origin/HEAD`) are
/// dropped.
pub(crate) fn parse_remote_branches(output: &str, remotes: &[String]) -> Vec<RemoteBranch> {
    let mut by_length: Vec<&String> = remotes.iter().collect();
    by_length.sort_by_key(|r| std::cmp::Reverse(r.len()));

    output
        .lines()
        .filter_map(|line| {
            let mut fields = line.split('\t');
            let refname = fields.next()?.strip_prefix("refs/remotes/")?;
            let tip = fields.next()?.trim();
            if !fields.next().unwrap_or("").trim().is_empty() {
                return None;
            }
            by_length.iter().find_map(|remote| {
                let branch = refname.strip_prefix(remote.as_str())?.strip_prefix('/')?;
                (!branch.is_empty() && branch != "HEAD").then(|| RemoteBranch {
                    remote: (*remote).clone(),
                    branch: branch.to_string(),
                    tip: tip.to_string(),
                })
            })
        })
        .collect()
}
