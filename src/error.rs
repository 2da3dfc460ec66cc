//! Error taxonomy for branch operations.
//!
//! Every failure the core can report maps to exactly one [`ErrorKind`]. Kinds are
//! grouped into three categories that decide how far an error propagates:
//!
//! - **Validation** errors reject a malformed branch name before any backend call.
//! - **Precondition** errors stop a single branch operation before anything is
//!   mutated; retrying with different arguments (e.g. `--force`) may succeed.
//! - **Backend** errors wrap a diagnostic from `git` itself.
//!
//! None of these abort a batch on their own. The callers in `core::branch::delete`
//! and `commands::clean` decide which ones are fatal for a whole run.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, BranchError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BranchError {
    // Validation
    #[error("branch name cannot be empty")]
    EmptyName,

    #[error("invalid branch name '{name}': {detail}")]
    InvalidEdgeChar { name: String, detail: String },

    #[error("invalid branch name '{name}': cannot contain '//'")]
    DoubleSlash { name: String },

    #[error("invalid branch name '{name}': contains invalid characters: {chars}")]
    InvalidChar { name: String, chars: String },

    #[error("invalid branch name '{name}': contains control characters")]
    ControlChar { name: String },

    #[error("invalid branch name '{name}': cannot start or end with '.'")]
    LeadingOrTrailingDot { name: String },

    #[error("invalid branch name '{name}': cannot contain '@{{'")]
    ReflogSyntax { name: String },

    // Precondition
    #[error("branch '{branch}' not found")]
    NotFound { branch: String },

    #[error("branch '{branch}' already exists")]
    AlreadyExists { branch: String },

    #[error("cannot delete the currently checked-out branch '{branch}'")]
    IsCurrentBranch { branch: String },

    #[error("branch '{branch}' is protected by pattern '{pattern}'")]
    Protected { branch: String, pattern: String },

    #[error("branch '{branch}' is not fully merged into '{target}'; use --force to delete anyway")]
    NotMerged { branch: String, target: String },

    #[error("branch '{branch}' tracks '{upstream}'; use --force to delete it together with its remote branch")]
    HasRemoteTracking { branch: String, upstream: String },

    #[error("cannot find a safe branch to switch to from '{current}'")]
    NoSafeBranch { current: String },

    // Backend
    #[error("failed to delete remote branch '{remote}/{branch}': {detail}")]
    RemoteDeleteFailed {
        remote: String,
        branch: String,
        detail: String,
    },

    #[error("failed to delete branch '{branch}': {detail}")]
    LocalDeleteFailed { branch: String, detail: String },

    #[error("failed to remove worktree {} for branch '{branch}': {detail}", .path.display())]
    WorktreeRemovalFailed {
        branch: String,
        path: PathBuf,
        detail: String,
    },

    #[error("failed to fetch from remotes: {detail}")]
    FetchFailed { detail: String },

    #[error("repository optimization failed: {detail}")]
    OptimizeFailed { detail: String },

    #[error("failed to create branch '{branch}': {detail}")]
    CreateFailed { branch: String, detail: String },

    #[error("failed to switch to branch '{branch}': {detail}")]
    CheckoutFailed { branch: String, detail: String },

    #[error("git operation failed: {detail}")]
    Backend { detail: String },
}

/// Stable identifier for each error variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    EmptyName,
    InvalidEdgeChar,
    DoubleSlash,
    InvalidChar,
    ControlChar,
    LeadingOrTrailingDot,
    ReflogSyntax,
    NotFound,
    AlreadyExists,
    IsCurrentBranch,
    Protected,
    NotMerged,
    HasRemoteTracking,
    NoSafeBranch,
    RemoteDeleteFailed,
    LocalDeleteFailed,
    WorktreeRemovalFailed,
    FetchFailed,
    OptimizeFailed,
    CreateFailed,
    CheckoutFailed,
    Backend,
}

/// How far an error of a given kind is allowed to propagate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Validation,
    Precondition,
    Backend,
}

impl ErrorKind {
    pub fn category(self) -> Category {
        match self {
            Self::EmptyName
            | Self::InvalidEdgeChar
            | Self::DoubleSlash
            | Self::InvalidChar
            | Self::ControlChar
            | Self::LeadingOrTrailingDot
            | Self::ReflogSyntax => Category::Validation,
            Self::NotFound
            | Self::AlreadyExists
            | Self::IsCurrentBranch
            | Self::Protected
            | Self::NotMerged
            | Self::HasRemoteTracking
            | Self::NoSafeBranch => Category::Precondition,
            Self::RemoteDeleteFailed
            | Self::LocalDeleteFailed
            | Self::WorktreeRemovalFailed
            | Self::FetchFailed
            | Self::OptimizeFailed
            | Self::CreateFailed
            | Self::CheckoutFailed
            | Self::Backend => Category::Backend,
        }
    }
}

impl BranchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyName => ErrorKind::EmptyName,
            Self::InvalidEdgeChar { .. } => ErrorKind::InvalidEdgeChar,
            Self::DoubleSlash { .. } => ErrorKind::DoubleSlash,
            Self::InvalidChar { .. } => ErrorKind::InvalidChar,
            Self::ControlChar { .. } => ErrorKind::ControlChar,
            Self::LeadingOrTrailingDot { .. } => ErrorKind::LeadingOrTrailingDot,
            Self::ReflogSyntax { .. } => ErrorKind::ReflogSyntax,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::AlreadyExists { .. } => ErrorKind::AlreadyExists,
            Self::IsCurrentBranch { .. } => ErrorKind::IsCurrentBranch,
            Self::Protected { .. } => ErrorKind::Protected,
            Self::NotMerged { .. } => ErrorKind::NotMerged,
            Self::HasRemoteTracking { .. } => ErrorKind::HasRemoteTracking,
            Self::NoSafeBranch { .. } => ErrorKind::NoSafeBranch,
            Self::RemoteDeleteFailed { .. } => ErrorKind::RemoteDeleteFailed,
            Self::LocalDeleteFailed { .. } => ErrorKind::LocalDeleteFailed,
            Self::WorktreeRemovalFailed { .. } => ErrorKind::WorktreeRemovalFailed,
            Self::FetchFailed { .. } => ErrorKind::FetchFailed,
            Self::OptimizeFailed { .. } => ErrorKind::OptimizeFailed,
            Self::CreateFailed { .. } => ErrorKind::CreateFailed,
            Self::CheckoutFailed { .. } => ErrorKind::CheckoutFailed,
            Self::Backend { .. } => ErrorKind::Backend,
        }
    }

    pub fn category(&self) -> Category {
        self.kind().category()
    }

    /// Wrap an arbitrary backend failure, keeping the full context chain as detail.
    pub fn backend(err: anyhow::Error) -> Self {
        Self::Backend {
            detail: diagnostic(&err),
        }
    }

    pub fn not_found(branch: impl Into<String>) -> Self {
        Self::NotFound {
            branch: branch.into(),
        }
    }
}

/// Render an `anyhow` error chain as a single trimmed line for error details.
pub fn diagnostic(err: &anyhow::Error) -> String {
    format!("{err:#}").trim().replace('\n', " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BranchError::IsCurrentBranch {
            branch: "main".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "cannot delete the currently checked-out branch 'main'"
        );

        let err = BranchError::ReflogSyntax {
            name: "a@{b".to_string(),
        };
        assert_eq!(err.to_string(), "invalid branch name 'a@{b': cannot contain '@{'");
    }

    #[test]
    fn test_not_merged_mentions_force() {
        let err = BranchError::NotMerged {
            branch: "feature".to_string(),
            target: "main".to_string(),
        };
        assert!(err.to_string().contains("--force"));
        assert!(err.to_string().contains("feature"));
    }

    #[test]
    fn test_worktree_error_includes_path() {
        let err = BranchError::WorktreeRemovalFailed {
            branch: "feature".to_string(),
            path: PathBuf::from("/tmp/wt"),
            detail: "locked".to_string(),
        };
        assert!(err.to_string().contains("/tmp/wt"));
    }

    #[test]
    fn test_categories() {
        assert_eq!(BranchError::EmptyName.category(), Category::Validation);
        assert_eq!(
            BranchError::not_found("x").category(),
            Category::Precondition
        );
        assert_eq!(
            BranchError::FetchFailed {
                detail: "offline".to_string()
            }
            .category(),
            Category::Backend
        );
        assert_eq!(
            BranchError::NoSafeBranch {
                current: "main".to_string()
            }
            .kind(),
            ErrorKind::NoSafeBranch
        );
    }

    #[test]
    fn test_backend_flattens_chain() {
        let err = anyhow::anyhow!("fatal: bad object\n").context("Git branch delete failed");
        let wrapped = BranchError::backend(err);
        match wrapped {
            BranchError::Backend { detail } => {
                assert_eq!(detail, "Git branch delete failed: fatal: bad object");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
