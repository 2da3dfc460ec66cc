use super::GitCommand;
use anyhow::{Context, Result};

impl GitCommand {
    pub fn reflog_expire(&self, expiry: &str) -> Result<()> {
        let output = self
            .command()
            .args(["reflog", "expire", &format!("--expire={expiry}"), "--all"])
            .output()
            .context("Failed to execute git reflog command")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("Git reflog expire failed: {}", stderr);
        }

        Ok(())
    }

    pub fn prune(&self) -> Result<()> {
        let output = self
            .command()
            .args(["prune"])
            .output()
            .context("Failed to execute git prune command")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("Git prune failed: {}", stderr);
        }

        Ok(())
    }

    pub fn gc(&self) -> Result<()> {
        let output = self
            .command()
            .args(["gc", "--quiet"])
            .output()
            .context("Failed to execute git gc command")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("Git gc failed: {}", stderr);
        }

        Ok(())
    }
}
