//! In-memory `RepoBackend` for unit tests.

use super::backend::{
    BranchInfo, RemoteBranch, RemoteDeleteOutcome, RepoBackend, TrackingRef, WorktreeInfo,
};
use anyhow::{bail, Result};
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
struct FakeBranch {
    tip: String,
    tracking: Option<TrackingRef>,
}

#[derive(Debug, Default)]
struct State {
    branches: BTreeMap<String, FakeBranch>,
    tags: BTreeMap<String, String>,
    /// commit -> commits reachable from it (excluding itself)
    ancestors: HashMap<String, HashSet<String>>,
    current: Option<String>,
    remotes: BTreeMap<String, BTreeSet<String>>,
    unreachable_remotes: HashSet<String>,
    remote_tracking: Vec<RemoteBranch>,
    worktrees: Vec<WorktreeInfo>,
    failing: HashSet<String>,
    mutations: Vec<String>,
    queries: Vec<String>,
}

/// Scriptable fake repository.
///
/// Branch tips are opaque strings; reachability is declared with
/// [`FakeBackend::with_ancestor`]. Every mutating call is recorded and
/// can be asserted with [`FakeBackend::mutations`]. Any operation named in
/// [`FakeBackend::failing`] returns an error.
#[derive(Debug, Default)]
pub struct FakeBackend {
    state: RefCell<State>,
}

impl FakeBackend {
    pub fn new() -> Self {
        let fake = Self::default();
        fake.state.borrow_mut().worktrees.push(WorktreeInfo {
            path: PathBuf::from("/repo"),
            is_main: true,
            ..Default::default()
        });
        fake
    }

    pub fn with_branch(self, name: &str, tip: &str) -> Self {
        self.state.borrow_mut().branches.insert(
            name.to_string(),
            FakeBranch {
                tip: tip.to_string(),
                tracking: None,
            },
        );
        self
    }

    pub fn with_tracking(self, name: &str, remote: &str, remote_branch: &str) -> Self {
        if let Some(b) = self.state.borrow_mut().branches.get_mut(name) {
            b.tracking = Some(TrackingRef {
                remote: remote.to_string(),
                branch: remote_branch.to_string(),
            });
        }
        self
    }

    /// Declare `ancestor` reachable from `descendant`.
    pub fn with_ancestor(self, ancestor: &str, descendant: &str) -> Self {
        self.state
            .borrow_mut()
            .ancestors
            .entry(descendant.to_string())
            .or_default()
            .insert(ancestor.to_string());
        self
    }

    pub fn with_current(self, name: &str) -> Self {
        self.state.borrow_mut().current = Some(name.to_string());
        self.set_main_worktree_branch(Some(name));
        self
    }

    pub fn with_remote(self, remote: &str, heads: &[&str]) -> Self {
        self.state.borrow_mut().remotes.insert(
            remote.to_string(),
            heads.iter().map(|h| h.to_string()).collect(),
        );
        self
    }

    pub fn with_unreachable_remote(self, remote: &str) -> Self {
        {
            let mut state = self.state.borrow_mut();
            state.remotes.entry(remote.to_string()).or_default();
            state.unreachable_remotes.insert(remote.to_string());
        }
        self
    }

    pub fn with_remote_tracking(self, remote: &str, branch: &str, tip: &str) -> Self {
        self.state.borrow_mut().remote_tracking.push(RemoteBranch {
            remote: remote.to_string(),
            branch: branch.to_string(),
            tip: tip.to_string(),
        });
        self
    }

    pub fn with_tag(self, name: &str, tip: &str) -> Self {
        self.state
            .borrow_mut()
            .tags
            .insert(name.to_string(), tip.to_string());
        self
    }

    pub fn with_worktree(self, path: &str, branch: &str) -> Self {
        self.state.borrow_mut().worktrees.push(WorktreeInfo {
            path: PathBuf::from(path),
            branch: Some(branch.to_string()),
            ..Default::default()
        });
        self
    }

    /// Make the named operation fail (e.g. `"delete_branch feature"`, `"fetch"`).
    pub fn failing(self, op: &str) -> Self {
        self.state.borrow_mut().failing.insert(op.to_string());
        self
    }

    pub fn mutations(&self) -> Vec<String> {
        self.state.borrow().mutations.clone()
    }

    pub fn queries(&self) -> Vec<String> {
        self.state.borrow().queries.clone()
    }

    pub fn branch_names(&self) -> Vec<String> {
        self.state.borrow().branches.keys().cloned().collect()
    }

    pub fn current(&self) -> Option<String> {
        self.state.borrow().current.clone()
    }

    fn set_main_worktree_branch(&self, name: Option<&str>) {
        let mut state = self.state.borrow_mut();
        if let Some(main) = state.worktrees.iter_mut().find(|w| w.is_main) {
            main.branch = name.map(str::to_string);
        }
    }

    fn record(&self, op: String) -> Result<()> {
        let mut state = self.state.borrow_mut();
        let fails = state.failing.contains(&op)
            || op
                .split_whitespace()
                .next()
                .is_some_and(|verb| state.failing.contains(verb));
        state.mutations.push(op.clone());
        if fails {
            bail!("simulated failure: {op}");
        }
        Ok(())
    }

    /// Resolve like git: full refs are exact, bare names prefer tags.
    fn tip_of(&self, rev: &str) -> Option<String> {
        let state = self.state.borrow();
        if let Some(name) = rev.strip_prefix("refs/heads/") {
            return state.branches.get(name).map(|b| b.tip.clone());
        }
        if let Some(name) = rev.strip_prefix("refs/tags/") {
            return state.tags.get(name).cloned();
        }
        if let Some(tip) = state.tags.get(rev) {
            return Some(tip.clone());
        }
        if let Some(b) = state.branches.get(rev) {
            return Some(b.tip.clone());
        }
        let known = state.branches.values().any(|b| b.tip == rev)
            || state.ancestors.contains_key(rev)
            || state.ancestors.values().any(|a| a.contains(rev));
        known.then(|| rev.to_string())
    }
}

impl RepoBackend for FakeBackend {
    fn list_branches(&self) -> Result<Vec<BranchInfo>> {
        if self.state.borrow().failing.contains("list_branches") {
            bail!("simulated failure: list_branches");
        }
        Ok(self
            .state
            .borrow()
            .branches
            .iter()
            .map(|(name, b)| BranchInfo {
                name: name.clone(),
                tip: b.tip.clone(),
                tracking: b.tracking.clone(),
            })
            .collect())
    }

    fn current_branch(&self) -> Result<Option<String>> {
        Ok(self.state.borrow().current.clone())
    }

    fn is_ancestor(&self, commit: &str, target: &str) -> Result<bool> {
        self.state
            .borrow_mut()
            .queries
            .push(format!("is_ancestor {commit} {target}"));
        if self.state.borrow().failing.contains("is_ancestor") {
            bail!("simulated failure: is_ancestor");
        }
        let Some(target_tip) = self.tip_of(target) else {
            bail!("fatal: Not a valid object name {target}");
        };
        if commit == target_tip {
            return Ok(true);
        }
        let state = self.state.borrow();
        Ok(state
            .ancestors
            .get(&target_tip)
            .is_some_and(|set| set.contains(commit)))
    }

    fn resolve(&self, rev: &str) -> Result<Option<String>> {
        Ok(self.tip_of(rev))
    }

    fn remotes(&self) -> Result<Vec<String>> {
        Ok(self.state.borrow().remotes.keys().cloned().collect())
    }

    fn remote_heads(&self, remote: &str) -> Result<Vec<String>> {
        self.state
            .borrow_mut()
            .queries
            .push(format!("remote_heads {remote}"));
        let state = self.state.borrow();
        if state.unreachable_remotes.contains(remote) {
            bail!("fatal: unable to access '{remote}': Could not resolve host");
        }
        match state.remotes.get(remote) {
            Some(heads) => Ok(heads.iter().cloned().collect()),
            None => bail!("fatal: '{remote}' does not appear to be a git repository"),
        }
    }

    fn list_remote_branches(&self) -> Result<Vec<RemoteBranch>> {
        Ok(self.state.borrow().remote_tracking.clone())
    }

    fn worktrees(&self) -> Result<Vec<WorktreeInfo>> {
        Ok(self.state.borrow().worktrees.clone())
    }

    fn git_dir(&self) -> Result<PathBuf> {
        Ok(PathBuf::from("/repo/.git"))
    }

    fn checkout(&self, branch: &str) -> Result<()> {
        self.record(format!("checkout {branch}"))?;
        if !self.state.borrow().branches.contains_key(branch) {
            bail!("error: pathspec '{branch}' did not match any file(s) known to git");
        }
        if let Some(wt) = self
            .state
            .borrow()
            .worktrees
            .iter()
            .find(|wt| !wt.is_main && wt.branch.as_deref() == Some(branch))
        {
            bail!(
                "fatal: '{branch}' is already checked out at '{}'",
                wt.path.display()
            );
        }
        self.state.borrow_mut().current = Some(branch.to_string());
        self.set_main_worktree_branch(Some(branch));
        Ok(())
    }

    fn create_branch(&self, name: &str, start_point: Option<&str>) -> Result<()> {
        self.record(format!("create_branch {name}"))?;
        let base = match start_point {
            Some(rev) => self.tip_of(rev),
            None => {
                let current = self.state.borrow().current.clone();
                current.and_then(|c| self.tip_of(&c))
            }
        };
        let Some(tip) = base else {
            bail!("fatal: not a valid object name");
        };
        self.state
            .borrow_mut()
            .branches
            .insert(name.to_string(), FakeBranch { tip, tracking: None });
        Ok(())
    }

    fn delete_branch(&self, name: &str, force: bool) -> Result<()> {
        self.record(format!("delete_branch {name} force={force}"))?;
        if self.state.borrow_mut().branches.remove(name).is_none() {
            bail!("error: branch '{name}' not found");
        }
        Ok(())
    }

    fn delete_remote_branch(&self, remote: &str, branch: &str) -> Result<RemoteDeleteOutcome> {
        self.record(format!("delete_remote_branch {remote}/{branch}"))?;
        let mut state = self.state.borrow_mut();
        state
            .remote_tracking
            .retain(|r| !(r.remote == remote && r.branch == branch));
        let Some(heads) = state.remotes.get_mut(remote) else {
            bail!("fatal: '{remote}' does not appear to be a git repository");
        };
        if heads.remove(branch) {
            Ok(RemoteDeleteOutcome::Deleted)
        } else {
            Ok(RemoteDeleteOutcome::AlreadyGone)
        }
    }

    fn remove_worktree(&self, path: &Path, force: bool) -> Result<()> {
        self.record(format!("remove_worktree {} force={force}", path.display()))?;
        self.state.borrow_mut().worktrees.retain(|w| w.path != path);
        Ok(())
    }

    fn fetch_prune(&self, remote: Option<&str>) -> Result<()> {
        self.record(format!("fetch {}", remote.unwrap_or("--all")))
    }

    fn expire_reflog(&self, expiry: &str) -> Result<()> {
        self.record(format!("reflog_expire {expiry}"))
    }

    fn prune_objects(&self) -> Result<()> {
        self.record("prune".to_string())
    }

    fn gc(&self) -> Result<()> {
        self.record("gc".to_string())
    }
}
