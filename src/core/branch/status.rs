use super::{BranchStatus, DeletionCandidate};
use crate::core::{BranchInfo, ProgressSink, RepoBackend, TrackingRef};
use crate::error::diagnostic;
use crate::log_debug;
use anyhow::{anyhow, Result};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

/// Classifies local branches against a target branch and remote state.
///
/// One `Classifier` is one classification pass: remote branch listings are
/// fetched at most once per remote and reused only for the lifetime of the
/// classifier. Create a fresh one for every pass.
pub struct Classifier<'a> {
    backend: &'a dyn RepoBackend,
    target: String,
    /// Commit the target branch points at, resolved once per pass.
    target_commit: RefCell<Option<String>>,
    remote_heads: RefCell<HashMap<String, HashSet<String>>>,
}

impl<'a> Classifier<'a> {
    pub fn new(backend: &'a dyn RepoBackend, target: impl Into<String>) -> Self {
        Self {
            backend,
            target: target.into(),
            target_commit: RefCell::new(None),
            remote_heads: RefCell::new(HashMap::new()),
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    /// Classify a single branch. Backend failures yield `Unknown`.
    pub fn classify(&self, branch: &BranchInfo) -> BranchStatus {
        match self.evaluate(branch) {
            Ok(status) => status,
            Err(e) => {
                log_debug!("cannot classify '{}': {}", branch.name, diagnostic(&e));
                BranchStatus::Unknown
            }
        }
    }

    /// Classify every branch except the target, sorted by name.
    ///
    /// Branches that end up `Unknown` are reported through `sink` as warnings.
    pub fn classify_all(
        &self,
        branches: &[BranchInfo],
        sink: &mut dyn ProgressSink,
    ) -> Vec<DeletionCandidate> {
        let mut candidates: Vec<DeletionCandidate> = branches
            .iter()
            .filter(|b| b.name != self.target)
            .map(|b| {
                let status = match self.evaluate(b) {
                    Ok(status) => status,
                    Err(e) => {
                        sink.on_warning(&format!(
                            "cannot classify '{}': {}",
                            b.name,
                            diagnostic(&e)
                        ));
                        BranchStatus::Unknown
                    }
                };
                sink.on_debug(&format!("{}: {}", b.name, status));
                DeletionCandidate {
                    name: b.name.clone(),
                    status,
                    tracking: b.tracking.clone(),
                }
            })
            .collect();
        candidates.sort_by(|a, b| a.name.cmp(&b.name));
        candidates
    }

    fn evaluate(&self, branch: &BranchInfo) -> Result<BranchStatus> {
        if let Some(tracking) = &branch.tracking {
            if self.is_gone(tracking)? {
                return Ok(BranchStatus::Gone);
            }
        }

        if self.backend.is_ancestor(&branch.tip, &self.target_commit()?)? {
            Ok(BranchStatus::Merged)
        } else {
            Ok(BranchStatus::Unmerged)
        }
    }

    fn target_commit(&self) -> Result<String> {
        if let Some(id) = self.target_commit.borrow().as_ref() {
            return Ok(id.clone());
        }
        let id = self
            .backend
            .branch_commit(&self.target)?
            .ok_or_else(|| anyhow!("target branch '{}' not found", self.target))?;
        *self.target_commit.borrow_mut() = Some(id.clone());
        Ok(id)
    }

    /// A tracking ref is gone when no configured remote has the branch.
    ///
    /// The tracking remote is asked first. A remote that cannot be reached is
    /// not evidence either way: if none of the reachable remotes has the
    /// branch and at least one remote failed, the result is an error.
    fn is_gone(&self, tracking: &TrackingRef) -> Result<bool> {
        let mut remotes = self.backend.remotes()?;
        if let Some(pos) = remotes.iter().position(|r| *r == tracking.remote) {
            let own = remotes.remove(pos);
            remotes.insert(0, own);
        }

        let mut failure = None;
        for remote in &remotes {
            match self.remote_has_branch(remote, &tracking.branch) {
                Ok(true) => return Ok(false),
                Ok(false) => {}
                Err(e) => failure = Some(e),
            }
        }

        match failure {
            Some(e) => Err(e.context(format!("cannot verify upstream '{tracking}'"))),
            None => Ok(true),
        }
    }

    fn remote_has_branch(&self, remote: &str, branch: &str) -> Result<bool> {
        if let Some(heads) = self.remote_heads.borrow().get(remote) {
            return Ok(heads.contains(branch));
        }
        let heads: HashSet<String> = self.backend.remote_heads(remote)?.into_iter().collect();
        let found = heads.contains(branch);
        self.remote_heads
            .borrow_mut()
            .insert(remote.to_string(), heads);
        Ok(found)
    }
}
