//! Core business logic abstractions.
//!
//! This module defines the traits and types that allow core operations to
//! report progress and ask for confirmation without depending on specific UI
//! implementations (CLI, tests, etc.).

pub mod backend;
pub mod branch;
#[cfg(test)]
pub(crate) mod fake;
pub mod maintenance;
mod progress;

pub use backend::{
    BranchInfo, RemoteBranch, RemoteDeleteOutcome, RepoBackend, TrackingRef, WorktreeInfo,
};
pub use progress::OutputSink;

// ─────────────────────────────────────────────────────────────────────────
// Progress reporting
// ─────────────────────────────────────────────────────────────────────────

/// Trait for core operations to report progress without depending on `Output`.
///
/// Commands create an adapter (e.g., `OutputSink`) that bridges this trait
/// to the actual output implementation. Tests can use `NullSink` to suppress
/// all output.
pub trait ProgressSink {
    /// Report an intermediate step (shown in verbose mode).
    fn on_step(&mut self, msg: &str);

    /// Report a warning (always shown).
    fn on_warning(&mut self, msg: &str);

    /// Report a debug message (shown in verbose mode).
    fn on_debug(&mut self, msg: &str);
}

/// A no-op sink that discards all progress messages.
///
/// Useful for tests and contexts where no output is desired.
pub struct NullSink;

impl ProgressSink for NullSink {
    fn on_step(&mut self, _msg: &str) {}
    fn on_warning(&mut self, _msg: &str) {}
    fn on_debug(&mut self, _msg: &str) {}
}

// ─────────────────────────────────────────────────────────────────────────
// Confirmation
// ─────────────────────────────────────────────────────────────────────────

/// Trait for asking the operator whether a destructive step may proceed.
///
/// The CLI provides a terminal prompt; `--no-interactive` and tests use
/// `AutoConfirm`.
pub trait ConfirmGate {
    /// Return `true` to proceed.
    fn confirm(&mut self, prompt: &str) -> bool;
}

/// A gate that approves every prompt.
pub struct AutoConfirm;

impl ConfirmGate for AutoConfirm {
    fn confirm(&mut self, _prompt: &str) -> bool {
        true
    }
}
