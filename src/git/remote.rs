use super::GitCommand;
use crate::core::RemoteDeleteOutcome;
use anyhow::{Context, Result};

impl GitCommand {
    /// Fetch with `--prune`. `None` fetches every remote.
    pub fn fetch_prune(&self, remote: Option<&str>) -> Result<()> {
        let mut cmd = self.command();
        cmd.arg("fetch");

        match remote {
            Some(remote) => cmd.arg(remote),
            None => cmd.arg("--all"),
        };
        cmd.arg("--prune");

        if self.quiet {
            cmd.arg("--quiet");
        }

        let output = cmd
            .env("GIT_TERMINAL_PROMPT", "0")
            .output()
            .context("Failed to execute git fetch command")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("Git fetch failed: {}", stderr);
        }

        Ok(())
    }

    /// Delete a remote branch via `git push <remote> --delete <branch>`.
    ///
    /// A ref that no longer exists on the remote is reported as
    /// [`RemoteDeleteOutcome::AlreadyGone`] rather than an error.
    pub fn push_delete(&self, remote: &str, branch: &str) -> Result<RemoteDeleteOutcome> {
        let mut cmd = self.command();
        cmd.args(["push", "--no-verify", remote, "--delete", branch]);

        if self.quiet {
            cmd.arg("--quiet");
        }

        let output = cmd
            .env("GIT_TERMINAL_PROMPT", "0")
            .output()
            .context("Failed to execute git push --delete command")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            if is_missing_remote_ref(&stderr) {
                return Ok(RemoteDeleteOutcome::AlreadyGone);
            }
            anyhow::bail!("Git push --delete failed: {}", stderr);
        }

        Ok(RemoteDeleteOutcome::Deleted)
    }

    /// Branch names present on `remote`, asked over the network.
    pub fn ls_remote_heads(&self, remote: &str) -> Result<Vec<String>> {
        let output = self
            .command()
            .args(["ls-remote", "--heads", remote])
            .env("GIT_TERMINAL_PROMPT", "0")
            .output()
            .context("Failed to execute git ls-remote command")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("Git ls-remote failed: {}", stderr);
        }

        let stdout =
            String::from_utf8(output.stdout).context("Failed to parse git ls-remote output")?;
        Ok(parse_ls_remote_heads(&stdout))
    }

    /// List all configured remotes.
    pub fn remote_list(&self) -> Result<Vec<String>> {
        let output = self
            .command()
            .args(["remote"])
            .output()
            .context("Failed to execute git remote command")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("Git remote failed: {}", stderr);
        }

        let stdout =
            String::from_utf8(output.stdout).context("Failed to parse git remote output")?;

        Ok(stdout
            .lines()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect())
    }
}

fn is_missing_remote_ref(stderr: &str) -> bool {
    stderr.contains("remote ref does not exist")
}

/// Parse `<sha>\trefs/heads/<name>` lines into branch names.
pub(crate) fn parse_ls_remote_heads(output: &str) -> Vec<String> {
    output
        .lines()
        .filter_map(|line| line.split_once('\t'))
        .filter_map(|(_, refname)| refname.trim().strip_prefix("refs/heads/"))
        .map(str::to_string)
        .collect()
}
