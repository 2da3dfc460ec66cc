use super::{open_repository, GlobalArgs};
use crate::{
    core::{
        branch::{
            plan, plan_remote, BranchDeleter, BranchStatus, Classifier, DeletionCandidate,
            ProtectionMatcher,
        },
        maintenance::{fetch_and_prune, optimize_repository},
        ConfirmGate, OutputSink, ProgressSink, RemoteBranch, RepoBackend,
    },
    error::{self, BranchError},
    output::{CliOutput, Output, OutputConfig, SpinnerSink, TerminalConfirm},
    settings::ArboristSettings,
};
use anyhow::Result;

#[derive(clap::Args, Debug, Clone, Default)]
#[command(about = "Delete merged and gone branches, then optimize the repository")]
#[command(long_about = r#"
Fetches from the configured remote with pruning, classifies every local branch
against the target branch and deletes the ones that are safe to remove:

  - MERGED branches without a live upstream
  - GONE branches, whose upstream was deleted on the remote

Branches with a live upstream and UNMERGED branches are only deleted with
--force; deleting a branch with an upstream also deletes the remote branch.
A secondary worktree that has the branch checked out is removed first.

The checked-out branch, protected branches (main, master and develop by
default) and branches whose status cannot be determined are never deleted.
Use -p/--protect to protect more patterns for this run, e.g.
`--protect 'release/*,hotfix'`.

After deleting, the repository is optimized (reflog expiry, prune, gc) unless
--no-gc is given. A failure to delete one branch does not stop the others and
does not change the exit status.
"#)]
pub struct Args {
    #[arg(
        short,
        long,
        value_name = "PATTERNS",
        help = "Additional comma-separated branch patterns to protect"
    )]
    pub protect: Vec<String>,

    #[arg(
        short,
        long,
        help = "Also delete unmerged branches and branches with a live upstream"
    )]
    pub force: bool,

    #[arg(short = 'n', long, help = "Do not ask for confirmation")]
    pub no_interactive: bool,

    #[arg(short, long, help = "Show what would be deleted without changing anything")]
    pub dry_run: bool,

    #[arg(long, help = "Skip repository optimization")]
    pub no_gc: bool,

    #[arg(long, help = "Also delete merged branches on the remotes")]
    pub remote: bool,

    #[arg(long, value_name = "BRANCH", help = "Branch to compare against")]
    pub target: Option<String>,
}

/// What a `clean` run did.
#[derive(Debug, Default)]
pub struct CleanReport {
    pub planned: Vec<String>,
    pub deleted: Vec<String>,
    pub failed: Vec<(String, BranchError)>,
    pub remote_planned: Vec<String>,
    pub remote_deleted: Vec<String>,
    pub remote_failed: Vec<(String, BranchError)>,
    pub dry_run: bool,
    pub cancelled: bool,
    pub optimized: bool,
}

pub fn run(args: &Args, global: &GlobalArgs) -> Result<()> {
    let (git, settings) = open_repository(global)?;
    let mut output = CliOutput::new(OutputConfig::new(global.quiet, global.verbose));
    let mut confirm = TerminalConfirm;
    let options = RunOptions { spinner: true };
    run_with(args, &git, &settings, &mut output, &mut confirm, options)?;
    Ok(())
}

/// How progress of long-running steps is rendered.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Show maintenance progress on a terminal spinner instead of the output.
    pub spinner: bool,
}

pub fn run_with(
    args: &Args,
    backend: &dyn RepoBackend,
    settings: &ArboristSettings,
    output: &mut dyn Output,
    confirm: &mut dyn ConfirmGate,
    options: RunOptions,
) -> Result<CleanReport> {
    let mut settings = settings.clone();
    settings.extend_protected(&args.protect);
    if let Some(target) = &args.target {
        settings.target_branch = target.clone();
    }
    let target = settings.target_branch.clone();
    let dry_run = args.dry_run || settings.dry_run_by_default;
    let interactive = settings.interactive && !args.no_interactive;

    let mut report = CleanReport {
        dry_run,
        ..Default::default()
    };

    if backend.branch_commit(&target)?.is_none() {
        return Err(BranchError::not_found(&target).into());
    }

    if !dry_run {
        with_progress(&mut *output, options, "Fetching from remotes", "", |sink| {
            fetch_and_prune(backend, &settings.remote, sink)
        })?;
    }

    let protections = ProtectionMatcher::new(&settings.protected_patterns);
    let branches = backend.list_branches()?;
    let classifier = Classifier::new(backend, target.as_str());
    let candidates = classifier.classify_all(&branches, &mut OutputSink(&mut *output));
    let current = backend.current_branch()?;
    let deletion_plan = plan(&candidates, current.as_deref(), &protections, args.force);

    for (name, reason) in &deletion_plan.skipped {
        output.step(&format!("Keeping {name}: {reason}"));
    }

    let remote_plan: Vec<RemoteBranch> = if args.remote {
        plan_remote(backend, &backend.list_remote_branches()?, &target, &protections)?
    } else {
        Vec::new()
    };

    report.planned = deletion_plan.names();
    report.remote_planned = remote_plan.iter().map(RemoteBranch::short_name).collect();

    if dry_run {
        for candidate in &deletion_plan.delete {
            output.info(&format!(
                "would delete {} ({})",
                candidate.name, candidate.status
            ));
        }
        for name in &report.remote_planned {
            output.info(&format!("would delete remote branch {name}"));
        }
        if report.planned.is_empty() && report.remote_planned.is_empty() {
            output.info("Nothing to clean up");
        }
        return Ok(report);
    }

    if report.planned.is_empty() && report.remote_planned.is_empty() {
        output.info("Nothing to clean up");
    } else {
        print_plan(&mut *output, &deletion_plan.delete, &report.remote_planned);

        if interactive && !confirm.confirm("Delete these branches?") {
            output.info("Operation cancelled");
            report.cancelled = true;
            return Ok(report);
        }

        let deleter = BranchDeleter::new(backend, &target, &protections);
        let (gone, rest): (Vec<_>, Vec<_>) = deletion_plan
            .delete
            .iter()
            .partition(|c| c.status == BranchStatus::Gone);
        let gone: Vec<String> = gone.into_iter().map(|c| c.name.clone()).collect();
        let rest: Vec<String> = rest.into_iter().map(|c| c.name.clone()).collect();

        // Gone branches have nothing left upstream to lose, so they are forced.
        let mut batch = deleter.delete_batch(&gone, true, &mut OutputSink(&mut *output))?;
        batch.merge(deleter.delete_batch(&rest, args.force, &mut OutputSink(&mut *output))?);

        if let Some(branch) = &batch.switched_to {
            output.info(&format!("Switched to branch '{branch}'"));
        }
        for outcome in &batch.deleted {
            output.result(&format!(
                "Deleted {} ({})",
                outcome.branch,
                outcome.deleted_parts()
            ));
        }
        for (name, err) in &batch.failed {
            output.warning(&format!("failed to delete {name}: {err}"));
        }
        report.deleted = batch.deleted.iter().map(|d| d.branch.clone()).collect();
        report.failed = batch.failed;

        if !remote_plan.is_empty() {
            let (deleted, failed) =
                deleter.delete_remote_batch(&remote_plan, &mut OutputSink(&mut *output));
            for name in &deleted {
                output.result(&format!("Deleted remote branch {name}"));
            }
            for (name, err) in &failed {
                output.warning(&format!("failed to delete remote branch {name}: {err}"));
            }
            report.remote_deleted = deleted;
            report.remote_failed = failed;
        }

        output.success(&summary(&report));
    }

    if args.no_gc || settings.skip_gc {
        output.step("Skipping repository optimization");
        return Ok(report);
    }

    let optimized = with_progress(
        &mut *output,
        options,
        "Optimizing repository",
        "Repository optimized",
        |sink| optimize_repository(backend, &settings.reflog_expiry, sink),
    );
    match optimized {
        Ok(()) => report.optimized = true,
        Err(e) => output.warning(&e.to_string()),
    }

    Ok(report)
}

/// Run `f` as `operation`, with either a terminal spinner or the output as
/// its progress sink.
///
/// On success the spinner is replaced by `done` (if non-empty).
fn with_progress(
    output: &mut dyn Output,
    options: RunOptions,
    operation: &str,
    done: &str,
    f: impl FnOnce(&mut dyn ProgressSink) -> error::Result<()>,
) -> error::Result<()> {
    if !options.spinner {
        output.operation_start(operation);
        let result = f(&mut OutputSink(&mut *output));
        output.operation_end(operation, result.is_ok());
        return result;
    }
    let mut spinner = SpinnerSink::new(
        &format!("{operation}..."),
        output.is_quiet(),
        output.is_verbose(),
    );
    let result = f(&mut spinner);
    match &result {
        Ok(()) => spinner.finish(done),
        Err(_) => spinner.clear(),
    }
    result
}

fn print_plan(
    output: &mut dyn Output,
    local: &[DeletionCandidate],
    remote: &[String],
) {
    if !local.is_empty() {
        output.info(&format!("Branches to delete ({}):", local.len()));
        for candidate in local {
            output.list_item(&format!("{} ({})", candidate.name, candidate.status));
        }
    }
    if !remote.is_empty() {
        output.info(&format!("Remote branches to delete ({}):", remote.len()));
        for name in remote {
            output.list_item(name);
        }
    }
}

fn summary(report: &CleanReport) -> String {
    let deleted = report.deleted.len() + report.remote_deleted.len();
    let failed = report.failed.len() + report.remote_failed.len();
    let noun = if deleted == 1 { "branch" } else { "branches" };
    if failed == 0 {
        format!("Deleted {deleted} {noun}")
    } else {
        format!("Deleted {deleted} {noun}, {failed} failed")
    }
}
