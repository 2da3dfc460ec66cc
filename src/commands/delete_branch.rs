use super::{open_repository, GlobalArgs};
use crate::{
    core::{
        branch::{BranchDeleter, DeletionOutcome, ProtectionMatcher},
        OutputSink, RepoBackend,
    },
    output::{CliOutput, Output, OutputConfig},
    settings::ArboristSettings,
};
use anyhow::Result;

#[derive(clap::Args, Debug, Clone, Default)]
#[command(about = "Safely delete a single branch")]
#[command(long_about = r#"
Deletes one local branch after the same checks `clean` applies. The command
refuses to delete a branch that:

  - is currently checked out
  - matches a protected pattern
  - is not merged into the target branch
  - tracks a remote branch

Use -f (--force) to delete an unmerged or tracking branch. With --force, a
tracking branch's remote branch is deleted too. A secondary worktree that has
the branch checked out is removed first. Protected and checked-out branches
are refused even with --force.
"#)]
pub struct Args {
    #[arg(help = "Name of the branch to delete")]
    pub name: String,

    #[arg(
        short,
        long,
        help = "Delete even if unmerged or tracking a remote branch"
    )]
    pub force: bool,

    #[arg(long, value_name = "BRANCH", help = "Branch to check merges against")]
    pub target: Option<String>,
}

pub fn run(args: &Args, global: &GlobalArgs) -> Result<()> {
    let (git, settings) = open_repository(global)?;
    let mut output = CliOutput::new(OutputConfig::new(global.quiet, global.verbose));
    run_with(args, &git, &settings, &mut output)?;
    Ok(())
}

pub fn run_with(
    args: &Args,
    backend: &dyn RepoBackend,
    settings: &ArboristSettings,
    output: &mut dyn Output,
) -> Result<DeletionOutcome> {
    let target = args.target.as_deref().unwrap_or(&settings.target_branch);
    let protections = ProtectionMatcher::new(&settings.protected_patterns);
    let deleter = BranchDeleter::new(backend, target, &protections);

    let outcome = deleter.delete_one(&args.name, args.force, &mut OutputSink(&mut *output))?;

    if let Some(path) = &outcome.worktree_removed {
        output.step(&format!("Removed worktree {}", path.display()));
    }
    if outcome.remote_already_gone {
        output.step("Remote branch was already deleted");
    }
    output.result(&format!(
        "Deleted branch {} ({})",
        outcome.branch,
        outcome.deleted_parts()
    ));
    Ok(outcome)
}
