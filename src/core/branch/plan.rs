use super::{BranchStatus, DeletionCandidate, ProtectionMatcher};
use crate::core::{RemoteBranch, RepoBackend};
use anyhow::{anyhow, Result};
use std::fmt;

/// Why the planner left a branch out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    Current,
    Protected(String),
    /// Live upstream and no `--force`.
    RemoteTracking(String),
    Unmerged,
    Unknown,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Current => write!(f, "currently checked out"),
            Self::Protected(pattern) => write!(f, "protected by '{pattern}'"),
            Self::RemoteTracking(upstream) => write!(f, "tracks {upstream}; use --force"),
            Self::Unmerged => write!(f, "not merged; use --force"),
            Self::Unknown => write!(f, "status unknown"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeletionPlan {
    /// Branches to delete, sorted by name.
    pub delete: Vec<DeletionCandidate>,
    pub skipped: Vec<(String, SkipReason)>,
}

impl DeletionPlan {
    pub fn is_empty(&self) -> bool {
        self.delete.is_empty()
    }

    pub fn names(&self) -> Vec<String> {
        self.delete.iter().map(|c| c.name.clone()).collect()
    }
}

/// Decide which classified branches may be deleted.
///
/// The current branch, protected branches and `Unknown` branches are never
/// included. A branch with a live upstream needs `force`; `Gone` branches
/// don't. `Unmerged` branches need `force`.
pub fn plan(
    statuses: &[DeletionCandidate],
    current_branch: Option<&str>,
    protections: &ProtectionMatcher,
    force: bool,
) -> DeletionPlan {
    let mut result = DeletionPlan::default();

    for candidate in statuses {
        let name = candidate.name.as_str();

        let skip = if Some(name) == current_branch {
            Some(SkipReason::Current)
        } else if let Some(pattern) = protections.matching_pattern(name) {
            Some(SkipReason::Protected(pattern.to_string()))
        } else {
            match candidate.status {
                BranchStatus::Unknown => Some(SkipReason::Unknown),
                BranchStatus::Gone => None,
                _ if candidate.tracking.is_some() && !force => {
                    let upstream = candidate
                        .tracking
                        .as_ref()
                        .map(ToString::to_string)
                        .unwrap_or_default();
                    Some(SkipReason::RemoteTracking(upstream))
                }
                BranchStatus::Merged => None,
                BranchStatus::Unmerged if force => None,
                BranchStatus::Unmerged => Some(SkipReason::Unmerged),
            }
        };

        match skip {
            Some(reason) => result.skipped.push((candidate.name.clone(), reason)),
            None => result.delete.push(candidate.clone()),
        }
    }

    result.delete.sort_by(|a, b| a.name.cmp(&b.name));
    result.skipped.sort_by(|a, b| a.0.cmp(&b.0));
    result
}

/// Remote-tracking branches merged into `target`, sorted by `remote/branch`.
///
/// Protection patterns apply to the branch part of the name; the target's
/// own remote counterparts are never proposed.
pub fn plan_remote(
    backend: &dyn RepoBackend,
    remote_branches: &[RemoteBranch],
    target: &str,
    protections: &ProtectionMatcher,
) -> Result<Vec<RemoteBranch>> {
    let target_commit = backend
        .branch_commit(target)?
        .ok_or_else(|| anyhow!("target branch '{target}' not found"))?;
    let mut merged = Vec::new();
    for rb in remote_branches {
        if rb.branch == target || protections.is_protected(&rb.branch) {
            continue;
        }
        if backend.is_ancestor(&rb.tip, &target_commit)? {
            merged.push(rb.clone());
        }
    }
    merged.sort_by_key(RemoteBranch::short_name);
    Ok(merged)
}
