//! Safe deletion of local branches.
//!
//! Every destructive step is gated by a fresh look at the repository: the
//! planner's view may be stale by the time a branch is actually deleted.
//! Per-branch order is: validate name, exists, not current, not protected,
//! merged (unless forcing), remote tracking allowed, then worktree removal,
//! remote deletion and finally the local ref.

use super::{validate_branch_name, BranchStatus, Classifier, ProtectionMatcher};
use crate::core::{ProgressSink, RemoteBranch, RemoteDeleteOutcome, RepoBackend, TrackingRef};
use crate::error::{diagnostic, BranchError, Result};
use std::path::PathBuf;

/// What was removed for one branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionOutcome {
    pub branch: String,
    pub worktree_removed: Option<PathBuf>,
    pub remote_deleted: Option<TrackingRef>,
    /// The remote ref was already gone when we tried to delete it.
    pub remote_already_gone: bool,
}

impl DeletionOutcome {
    /// Human-readable list of the parts that were deleted.
    pub fn deleted_parts(&self) -> String {
        let mut parts = Vec::new();
        if self.worktree_removed.is_some() {
            parts.push("worktree");
        }
        if self.remote_deleted.is_some() && !self.remote_already_gone {
            parts.push("remote branch");
        }
        parts.push("branch");
        parts.join(", ")
    }
}

/// Result of a batch: processing never stops at the first failure.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub deleted: Vec<DeletionOutcome>,
    pub failed: Vec<(String, BranchError)>,
    /// Branch checked out before deleting, if the current one was in the batch.
    pub switched_to: Option<String>,
}

impl BatchReport {
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }

    pub fn deleted_names(&self) -> Vec<&str> {
        self.deleted.iter().map(|d| d.branch.as_str()).collect()
    }

    pub fn merge(&mut self, other: BatchReport) {
        self.deleted.extend(other.deleted);
        self.failed.extend(other.failed);
        if self.switched_to.is_none() {
            self.switched_to = other.switched_to;
        }
    }
}

pub struct BranchDeleter<'a> {
    backend: &'a dyn RepoBackend,
    target: &'a str,
    protections: &'a ProtectionMatcher,
}

impl<'a> BranchDeleter<'a> {
    pub fn new(
        backend: &'a dyn RepoBackend,
        target: &'a str,
        protections: &'a ProtectionMatcher,
    ) -> Self {
        Self {
            backend,
            target,
            protections,
        }
    }

    /// Delete a single branch after re-validating it.
    pub fn delete_one(
        &self,
        name: &str,
        force: bool,
        sink: &mut dyn ProgressSink,
    ) -> Result<DeletionOutcome> {
        validate_branch_name(name)?;

        let branch = self
            .backend
            .find_branch(name)
            .map_err(BranchError::backend)?
            .ok_or_else(|| BranchError::not_found(name))?;

        let current = self
            .backend
            .current_branch()
            .map_err(BranchError::backend)?;
        if current.as_deref() == Some(name) {
            return Err(BranchError::IsCurrentBranch {
                branch: name.to_string(),
            });
        }

        if let Some(pattern) = self.protections.matching_pattern(name) {
            return Err(BranchError::Protected {
                branch: name.to_string(),
                pattern: pattern.to_string(),
            });
        }

        if !force {
            let status = Classifier::new(self.backend, self.target).classify(&branch);
            sink.on_debug(&format!("{name}: {status}"));
            if matches!(status, BranchStatus::Unmerged | BranchStatus::Unknown) {
                return Err(BranchError::NotMerged {
                    branch: name.to_string(),
                    target: self.target.to_string(),
                });
            }
            if let Some(tracking) = &branch.tracking {
                return Err(BranchError::HasRemoteTracking {
                    branch: name.to_string(),
                    upstream: tracking.to_string(),
                });
            }
        }

        let mut outcome = DeletionOutcome {
            branch: name.to_string(),
            worktree_removed: None,
            remote_deleted: None,
            remote_already_gone: false,
        };

        let worktree = self
            .backend
            .worktree_for_branch(name)
            .map_err(BranchError::backend)?;
        if let Some(wt) = worktree {
            sink.on_step(&format!("Removing worktree {}", wt.path.display()));
            self.backend
                .remove_worktree(&wt.path, true)
                .map_err(|e| BranchError::WorktreeRemovalFailed {
                    branch: name.to_string(),
                    path: wt.path.clone(),
                    detail: diagnostic(&e),
                })?;
            outcome.worktree_removed = Some(wt.path);
        }

        if let Some(tracking) = branch.tracking {
            sink.on_step(&format!("Deleting remote branch {tracking}"));
            match self
                .backend
                .delete_remote_branch(&tracking.remote, &tracking.branch)
            {
                Ok(RemoteDeleteOutcome::Deleted) => {}
                Ok(RemoteDeleteOutcome::AlreadyGone) => {
                    sink.on_debug(&format!("remote branch {tracking} already gone"));
                    outcome.remote_already_gone = true;
                }
                Err(e) => {
                    return Err(BranchError::RemoteDeleteFailed {
                        remote: tracking.remote,
                        branch: tracking.branch,
                        detail: diagnostic(&e),
                    });
                }
            }
            outcome.remote_deleted = Some(tracking);
        }

        sink.on_step(&format!("Deleting branch {name}"));
        self.backend
            .delete_branch(name, force)
            .map_err(|e| BranchError::LocalDeleteFailed {
                branch: name.to_string(),
                detail: diagnostic(&e),
            })?;

        Ok(outcome)
    }

    /// Delete several branches, continuing past individual failures.
    ///
    /// If the checked-out branch is part of the batch, a safe branch is checked
    /// out first. Failing to find or switch to one aborts the whole batch
    /// before anything is deleted.
    pub fn delete_batch(
        &self,
        names: &[String],
        force: bool,
        sink: &mut dyn ProgressSink,
    ) -> Result<BatchReport> {
        let mut report = BatchReport {
            switched_to: self.ensure_safe_checkout(names, sink)?,
            ..Default::default()
        };

        for name in names {
            match self.delete_one(name, force, sink) {
                Ok(outcome) => report.deleted.push(outcome),
                Err(e) => {
                    sink.on_debug(&format!("{name}: {e}"));
                    report.failed.push((name.clone(), e));
                }
            }
        }

        Ok(report)
    }

    /// Move off the current branch if it is about to be deleted.
    ///
    /// Returns the branch that was checked out, or `None` when no switch was needed.
    pub fn ensure_safe_checkout(
        &self,
        to_delete: &[String],
        sink: &mut dyn ProgressSink,
    ) -> Result<Option<String>> {
        let Some(current) = self
            .backend
            .current_branch()
            .map_err(BranchError::backend)?
        else {
            return Ok(None);
        };
        if !to_delete.contains(&current) {
            return Ok(None);
        }

        let branches: Vec<String> = self
            .backend
            .list_branches()
            .map_err(BranchError::backend)?
            .into_iter()
            .map(|b| b.name)
            .collect();

        // Branches checked out in another worktree cannot be checked out here.
        let bound: Vec<String> = self
            .backend
            .worktrees()
            .map_err(BranchError::backend)?
            .into_iter()
            .filter_map(|wt| wt.branch)
            .filter(|b| *b != current)
            .collect();

        let safe = find_safe_branch(&branches, &current, to_delete, &bound)
            .ok_or_else(|| BranchError::NoSafeBranch {
                current: current.clone(),
            })?;

        self.backend
            .checkout(&safe)
            .map_err(|e| BranchError::CheckoutFailed {
                branch: safe.clone(),
                detail: diagnostic(&e),
            })?;
        sink.on_step(&format!("Switched to branch '{safe}'"));
        Ok(Some(safe))
    }

    /// Delete merged remote branches, continuing past individual failures.
    pub fn delete_remote_batch(
        &self,
        branches: &[RemoteBranch],
        sink: &mut dyn ProgressSink,
    ) -> (Vec<String>, Vec<(String, BranchError)>) {
        let mut deleted = Vec::new();
        let mut failed = Vec::new();

        for rb in branches {
            let label = rb.short_name();
            sink.on_step(&format!("Deleting remote branch {label}"));
            match self.backend.delete_remote_branch(&rb.remote, &rb.branch) {
                Ok(_) => deleted.push(label),
                Err(e) => failed.push((
                    label,
                    BranchError::RemoteDeleteFailed {
                        remote: rb.remote.clone(),
                        branch: rb.branch.clone(),
                        detail: diagnostic(&e),
                    },
                )),
            }
        }

        (deleted, failed)
    }
}

/// First branch in name order that is not current, not about to be deleted
/// and not checked out in another worktree.
pub fn find_safe_branch(
    branches: &[String],
    current: &str,
    to_delete: &[String],
    checked_out: &[String],
) -> Option<String> {
    let mut sorted: Vec<&String> = branches.iter().collect();
    sorted.sort();
    sorted
        .into_iter()
        .find(|b| b.as_str() != current && !to_delete.contains(b) && !checked_out.contains(b))
        .cloned()
}

/// Create `name` at `start_point` (or the current HEAD).
pub fn create_branch(
    backend: &dyn RepoBackend,
    name: &str,
    start_point: Option<&str>,
) -> Result<()> {
    validate_branch_name(name)?;

    if backend.branch_exists(name).map_err(BranchError::backend)? {
        return Err(BranchError::AlreadyExists {
            branch: name.to_string(),
        });
    }

    if let Some(rev) = start_point {
        if backend.resolve(rev).map_err(BranchError::backend)?.is_none() {
            return Err(BranchError::not_found(rev));
        }
    }

    backend
        .create_branch(name, start_point)
        .map_err(|e| BranchError::CreateFailed {
            branch: name.to_string(),
            detail: diagnostic(&e),
        })
}
