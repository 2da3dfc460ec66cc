use super::GitCommand;
use crate::core::{BranchInfo, RemoteBranch, RemoteDeleteOutcome, RepoBackend, WorktreeInfo};
use anyhow::Result;
use std::path::{Path, PathBuf};

impl RepoBackend for GitCommand {
    fn list_branches(&self) -> Result<Vec<BranchInfo>> {
        self.branch_list()
    }

    fn current_branch(&self) -> Result<Option<String>> {
        self.symbolic_ref_short_head()
    }

    fn is_ancestor(&self, commit: &str, target: &str) -> Result<bool> {
        self.merge_base_is_ancestor(commit, target)
    }

    fn resolve(&self, rev: &str) -> Result<Option<String>> {
        self.rev_parse_verify(rev)
    }

    fn remotes(&self) -> Result<Vec<String>> {
        self.remote_list()
    }

    fn remote_heads(&self, remote: &str) -> Result<Vec<String>> {
        self.ls_remote_heads(remote)
    }

    fn list_remote_branches(&self) -> Result<Vec<RemoteBranch>> {
        let remotes = self.remote_list()?;
        self.remote_branch_list(&remotes)
    }

    fn worktrees(&self) -> Result<Vec<WorktreeInfo>> {
        self.worktree_list()
    }

    fn git_dir(&self) -> Result<PathBuf> {
        self.get_git_dir()
    }

    fn checkout(&self, branch: &str) -> Result<()> {
        GitCommand::checkout(self, branch)
    }

    fn create_branch(&self, name: &str, start_point: Option<&str>) -> Result<()> {
        self.branch_create(name, start_point)
    }

    fn delete_branch(&self, name: &str, force: bool) -> Result<()> {
        self.branch_delete(name, force)
    }

    fn delete_remote_branch(&self, remote: &str, branch: &str) -> Result<RemoteDeleteOutcome> {
        self.push_delete(remote, branch)
    }

    fn remove_worktree(&self, path: &Path, force: bool) -> Result<()> {
        self.worktree_remove(path, force)
    }

    fn fetch_prune(&self, remote: Option<&str>) -> Result<()> {
        GitCommand::fetch_prune(self, remote)
    }

    fn expire_reflog(&self, expiry: &str) -> Result<()> {
        self.reflog_expire(expiry)
    }

    fn prune_objects(&self) -> Result<()> {
        self.prune()
    }

    fn gc(&self) -> Result<()> {
        GitCommand::gc(self)
    }
}
