//! Branch classification and safe deletion.
//!
//! Data flows leaf-first through the submodules:
//! `validate` and `protect` are pure checks, `status` classifies branches
//! against a target, `plan` turns classifications into a deletion list, and
//! `delete` carries the list out against the backend.

pub mod delete;
pub mod plan;
pub mod protect;
pub mod status;
pub mod validate;

pub use delete::{BatchReport, BranchDeleter, DeletionOutcome};
pub use plan::{plan, plan_remote, DeletionPlan, SkipReason};
pub use protect::{is_protected, ProtectionMatcher};
pub use status::Classifier;
pub use validate::validate_branch_name;

use crate::core::TrackingRef;
use serde::Serialize;
use std::fmt;

/// Relationship of a branch to the target branch and its remote.
///
/// Recomputed on every pass; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BranchStatus {
    /// Tip is an ancestor of the target's tip.
    Merged,
    Unmerged,
    /// Has a tracking ref that no remote resolves anymore.
    Gone,
    /// Classification failed; never safe to delete.
    Unknown,
}

impl BranchStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Merged => "MERGED",
            Self::Unmerged => "UNMERGED",
            Self::Gone => "GONE",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Whether the planner may propose this branch without `--force`.
    pub fn is_deletable(self) -> bool {
        matches!(self, Self::Merged | Self::Gone)
    }
}

impl fmt::Display for BranchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A branch paired with its status for the duration of one planning pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionCandidate {
    pub name: String,
    pub status: BranchStatus,
    pub tracking: Option<TrackingRef>,
}
