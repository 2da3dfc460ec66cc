//! Command-line interface for arborist.
//!
//! Each subcommand lives in its own module with an `Args` struct, a `run`
//! entry point that wires up the real repository and terminal, and a
//! `run_with` function that takes the backend, settings and output as
//! parameters so it can be exercised in tests.

pub mod clean;
pub mod completions;
pub mod create_branch;
pub mod delete_branch;
pub mod status;

use crate::{
    check_dependencies, git::GitCommand, logging::init_logging, settings::ArboristSettings,
};
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "arborist")]
#[command(version = crate::VERSION)]
#[command(about = "Classify and clean up local Git branches")]
#[command(long_about = r#"
arborist inspects the local branches of a Git repository and classifies each
one against a target branch (main by default):

  MERGED    the branch tip is already part of the target branch
  UNMERGED  the branch has commits the target does not
  GONE      the branch tracks a remote branch that no longer exists
  UNKNOWN   the status could not be determined

`arborist clean` deletes merged and gone branches, removing secondary
worktrees and remote branches along the way, then runs routine repository
maintenance. Protected branches and the checked-out branch are never deleted.

Defaults come from ~/.config/arborist/config.toml and `git config arborist.*`.
"#)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    #[arg(
        short = 'C',
        global = true,
        value_name = "PATH",
        help = "Run as if arborist was started in PATH"
    )]
    pub directory: Option<PathBuf>,

    #[arg(
        short,
        long,
        global = true,
        help = "Operate quietly; suppress progress reporting"
    )]
    pub quiet: bool,

    #[arg(short, long, global = true, help = "Be verbose; show detailed progress")]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show every local branch with its status
    #[command(visible_alias = "list")]
    Status(status::Args),

    /// Delete merged and gone branches, then optimize the repository
    Clean(clean::Args),

    /// Safely delete a single branch
    DeleteBranch(delete_branch::Args),

    /// Create a branch without checking it out
    CreateBranch(create_branch::Args),

    /// Generate shell completion scripts
    Completions(completions::Args),
}

pub fn run(cli: Cli) -> Result<()> {
    init_logging(cli.global.verbose, cli.global.quiet);

    match &cli.command {
        Command::Status(args) => status::run(args, &cli.global),
        Command::Clean(args) => clean::run(args, &cli.global),
        Command::DeleteBranch(args) => delete_branch::run(args, &cli.global),
        Command::CreateBranch(args) => create_branch::run(args, &cli.global),
        Command::Completions(args) => completions::run(args),
    }
}

/// Locate the repository and load its settings.
pub(crate) fn open_repository(global: &GlobalArgs) -> Result<(GitCommand, ArboristSettings)> {
    check_dependencies()?;

    let mut git = GitCommand::new(global.quiet);
    if let Some(dir) = &global.directory {
        if !dir.is_dir() {
            anyhow::bail!("cannot change to '{}': No such directory", dir.display());
        }
        git = git.with_work_dir(dir);
    }

    if !git.is_inside_git_repo()? {
        anyhow::bail!("Not inside a Git repository");
    }

    let settings = ArboristSettings::load(&git)?;
    Ok((git, settings))
}
