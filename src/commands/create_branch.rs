use super::{open_repository, GlobalArgs};
use crate::{
    core::{branch::delete::create_branch, RepoBackend},
    output::{CliOutput, Output, OutputConfig},
};
use anyhow::Result;

#[derive(clap::Args, Debug, Clone, Default)]
#[command(about = "Create a branch without checking it out")]
#[command(long_about = r#"
Creates a local branch at the given start point, or at the current HEAD when
no start point is given. The branch name is validated first and an existing
branch is never overwritten. The new branch does not track any remote branch
and is not checked out.
"#)]
pub struct Args {
    #[arg(help = "Name of the branch to create")]
    pub name: String,

    #[arg(
        short,
        long,
        value_name = "REF",
        help = "Commit, branch or tag to start the branch at"
    )]
    pub start_point: Option<String>,
}

pub fn run(args: &Args, global: &GlobalArgs) -> Result<()> {
    let (git, _settings) = open_repository(global)?;
    let mut output = CliOutput::new(OutputConfig::new(global.quiet, global.verbose));
    run_with(args, &git, &mut output)
}

pub fn run_with(args: &Args, backend: &dyn RepoBackend, output: &mut dyn Output) -> Result<()> {
    create_branch(backend, &args.name, args.start_point.as_deref())?;

    match &args.start_point {
        Some(start) => output.result(&format!("Created branch {} at {start}", args.name)),
        None => output.result(&format!("Created branch {}", args.name)),
    }
    Ok(())
}
