//! Repository maintenance around a cleanup run.
//!
//! `fetch_and_prune` runs before classification so that gone upstreams are
//! visible. `optimize_repository` runs last and is best effort: callers report
//! its failure without undoing anything.

use crate::core::{ProgressSink, RepoBackend};
use crate::error::{diagnostic, BranchError, Result};
use std::fs;

/// Fetch with prune semantics.
///
/// `remote` is fetched on its own when it is configured; otherwise every
/// remote is fetched. A repository without remotes is left alone.
pub fn fetch_and_prune(
    backend: &dyn RepoBackend,
    remote: &str,
    sink: &mut dyn ProgressSink,
) -> Result<()> {
    let remotes = backend.remotes().map_err(|e| BranchError::FetchFailed {
        detail: diagnostic(&e),
    })?;
    if remotes.is_empty() {
        sink.on_step("No remotes configured, skipping fetch");
        return Ok(());
    }

    sink.on_step("Fetching from remotes...");
    let selected = remotes.iter().any(|r| r == remote).then_some(remote);
    if selected.is_none() {
        sink.on_debug(&format!("remote '{remote}' not configured, fetching all"));
    }

    sink.on_step("Pruning old references...");
    backend
        .fetch_prune(selected)
        .map_err(|e| BranchError::FetchFailed {
            detail: diagnostic(&e),
        })
}

/// Expire reflogs, prune unreachable objects and run `gc`.
///
/// Stops at the first failing step.
pub fn optimize_repository(
    backend: &dyn RepoBackend,
    reflog_expiry: &str,
    sink: &mut dyn ProgressSink,
) -> Result<()> {
    let failed = |e: anyhow::Error| BranchError::OptimizeFailed {
        detail: diagnostic(&e),
    };

    // A leftover gc.log makes `git gc` refuse to run until it is removed.
    let gc_log = backend.git_dir().map_err(failed)?.join("gc.log");
    if gc_log.exists() {
        sink.on_debug(&format!("removing stale {}", gc_log.display()));
        if let Err(e) = fs::remove_file(&gc_log) {
            sink.on_warning(&format!("cannot remove {}: {e}", gc_log.display()));
        }
    }

    sink.on_step("Expiring reflog...");
    backend.expire_reflog(reflog_expiry).map_err(failed)?;

    sink.on_step("Pruning unreachable objects...");
    backend.prune_objects().map_err(failed)?;

    sink.on_step("Running garbage collection...");
    backend.gc().map_err(failed)?;

    sink.on_step("Repository optimization complete");
    Ok(())
}
