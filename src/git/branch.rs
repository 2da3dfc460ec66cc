use super::GitCommand;
use crate::core::{BranchInfo, TrackingRef};
use anyhow::{Context, Result};

/// `for-each-ref` format for local branches: ref, tip, upstream remote, upstream ref.
pub(crate) const BRANCH_FORMAT: &str =
    "%(refname)%09%(objectname)%09%(upstream:remotename)%09%(upstream:remoteref)";

impl GitCommand {
    /// All local branches with their tips and upstreams, sorted by name.
    pub fn branch_list(&self) -> Result<Vec<BranchInfo>> {
        let output = self.for_each_ref(BRANCH_FORMAT, "refs/heads")?;
        let mut branches = parse_branch_list(&output);
        branches.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(branches)
    }

    pub fn branch_create(&self, name: &str, start_point: Option<&str>) -> Result<()> {
        let mut cmd = self.command();
        cmd.args(["branch", "--no-track", name]);

        if let Some(start) = start_point {
            cmd.arg(start);
        }

        let output = cmd
            .output()
            .context("Failed to execute git branch command")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("Git branch create failed: {}", stderr);
        }

        Ok(())
    }

    pub fn branch_delete(&self, branch: &str, force: bool) -> Result<()> {
        let mut cmd = self.command();
        cmd.args(["branch"]);

        if force {
            cmd.arg("-D");
        } else {
            cmd.arg("-d");
        }

        cmd.arg(branch);

        let output = cmd
            .output()
            .context("Failed to execute git branch command")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("Git branch delete failed: {}", stderr);
        }

        Ok(())
    }

    /// Checkout a branch in the working directory.
    pub fn checkout(&self, branch: &str) -> Result<()> {
        let mut cmd = self.command();
        cmd.args(["checkout"]);

        if self.quiet {
            cmd.arg("--quiet");
        }

        cmd.arg(branch);

        let output = cmd
            .output()
            .context("Failed to execute git checkout command")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("Git checkout failed: {}", stderr);
        }

        Ok(())
    }

    /// Short name of the checked-out branch, `None` when HEAD is detached.
    pub fn symbolic_ref_short_head(&self) -> Result<Option<String>> {
        let output = self
            .command()
            .args(["symbolic-ref", "--quiet", "--short", "HEAD"])
            .output()
            .context("Failed to execute git symbolic-ref command")?;

        match output.status.code() {
            Some(0) => {
                let stdout = String::from_utf8(output.stdout)
                    .context("Failed to parse git symbolic-ref output")?;
                Ok(Some(stdout.trim().to_string()))
            }
            // Exit code 1 with --quiet means HEAD is not a symbolic ref (detached)
            Some(1) => Ok(None),
            _ => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                anyhow::bail!("Git symbolic-ref failed: {}", stderr);
            }
        }
    }
}

/// Parse [`BRANCH_FORMAT`] output.
///
/// An upstream on remote `.` is another local branch and is not treated as
/// remote tracking.
pub(crate) fn parse_branch_list(output: &str) -> Vec<BranchInfo> {
    output
        .lines()
        .filter_map(|line| {
            let mut fields = line.split('\t');
            let refname = fields.next()?;
            let name = refname.strip_prefix("refs/heads/")?;
            let tip = fields.next()?.trim();
            let remote = fields.next().unwrap_or("").trim();
            let remote_ref = fields.next().unwrap_or("").trim();

            let tracking = if remote.is_empty() || remote == "." || remote_ref.is_empty() {
                None
            } else {
                Some(TrackingRef {
                    remote: remote.to_string(),
                    branch: remote_ref
                        .strip_prefix("refs/heads/")
                        .unwrap_or(remote_ref)
                        .to_string(),
                })
            };

            Some(BranchInfo {
                name: name.to_string(),
                tip: tip.to_string(),
                tracking,
            })
        })
        .collect()
}
