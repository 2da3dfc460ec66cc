//! The version-control capability the core depends on.
//!
//! All branch logic talks to the repository through [`RepoBackend`]. The
//! production adapter is [`crate::git::GitCommand`], which shells out to `git`;
//! unit tests use an in-memory fake so the classifier, planner and executor can
//! be exercised without touching a real repository.

use anyhow::Result;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// A local branch as reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchInfo {
    pub name: String,
    /// Full object id of the branch tip.
    pub tip: String,
    /// Remote branch this branch is configured to track, if any.
    pub tracking: Option<TrackingRef>,
}

/// A local branch's upstream on a remote (`branch.<name>.remote` / `.merge`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TrackingRef {
    pub remote: String,
    /// Branch name on the remote, without the `refs/heads/` prefix.
    pub branch: String,
}

impl fmt::Display for TrackingRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.remote, self.branch)
    }
}

/// A remote-tracking ref (`refs/remotes/<remote>/<branch>`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteBranch {
    pub remote: String,
    pub branch: String,
    pub tip: String,
}

impl RemoteBranch {
    pub fn short_name(&self) -> String {
        format!("{}/{}", self.remote, self.branch)
    }
}

/// A working tree attached to the repository.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WorktreeInfo {
    pub path: PathBuf,
    pub head: Option<String>,
    /// Checked-out branch, without the `refs/heads/` prefix.
    pub branch: Option<String>,
    pub is_bare: bool,
    pub is_detached: bool,
    pub is_prunable: bool,
    /// The primary working directory (first entry of `git worktree list`).
    pub is_main: bool,
}

/// Result of asking a remote to delete one of its branches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteDeleteOutcome {
    Deleted,
    /// The remote reported the ref does not exist.
    AlreadyGone,
}

pub trait RepoBackend {
    // ── Queries ──────────────────────────────────────────────────────────

    /// All local branches, sorted by name.
    fn list_branches(&self) -> Result<Vec<BranchInfo>>;

    /// The checked-out branch of the primary working directory, `None` when detached.
    fn current_branch(&self) -> Result<Option<String>>;

    /// Whether `commit` is reachable from `target` (equal commits count).
    fn is_ancestor(&self, commit: &str, target: &str) -> Result<bool>;

    /// Resolve a revision to an object id, `None` if it does not exist.
    fn resolve(&self, rev: &str) -> Result<Option<String>>;

    fn remotes(&self) -> Result<Vec<String>>;

    /// Branch names currently present on `remote`, queried live.
    fn remote_heads(&self, remote: &str) -> Result<Vec<String>>;

    /// Remote-tracking refs, excluding symbolic `HEAD` entries.
    fn list_remote_branches(&self) -> Result<Vec<RemoteBranch>>;

    fn worktrees(&self) -> Result<Vec<WorktreeInfo>>;

    fn git_dir(&self) -> Result<PathBuf>;

    // ── Mutations ────────────────────────────────────────────────────────

    fn checkout(&self, branch: &str) -> Result<()>;

    fn create_branch(&self, name: &str, start_point: Option<&str>) -> Result<()>;

    fn delete_branch(&self, name: &str, force: bool) -> Result<()>;

    fn delete_remote_branch(&self, remote: &str, branch: &str) -> Result<RemoteDeleteOutcome>;

    fn remove_worktree(&self, path: &Path, force: bool) -> Result<()>;

    /// Fetch with prune semantics; `None` fetches every configured remote.
    fn fetch_prune(&self, remote: Option<&str>) -> Result<()>;

    fn expire_reflog(&self, expiry: &str) -> Result<()>;

    fn prune_objects(&self) -> Result<()>;

    fn gc(&self) -> Result<()>;

    // ── Provided ─────────────────────────────────────────────────────────

    /// Commit id of the local branch `name`.
    ///
    /// Looks under `refs/heads/` first so a tag with the same name does not
    /// shadow the branch; falls back to `name` as a plain revision.
    fn branch_commit(&self, name: &str) -> Result<Option<String>> {
        if let Some(id) = self.resolve(&format!("refs/heads/{name}"))? {
            return Ok(Some(id));
        }
        self.resolve(name)
    }

    fn find_branch(&self, name: &str) -> Result<Option<BranchInfo>> {
        Ok(self.list_branches()?.into_iter().find(|b| b.name == name))
    }

    fn branch_exists(&self, name: &str) -> Result<bool> {
        Ok(self.find_branch(name)?.is_some())
    }

    /// The secondary worktree a branch is checked out in, if any.
    fn worktree_for_branch(&self, name: &str) -> Result<Option<WorktreeInfo>> {
        Ok(self
            .worktrees()?
            .into_iter()
            .find(|wt| !wt.is_main && wt.branch.as_deref() == Some(name)))
    }
}
