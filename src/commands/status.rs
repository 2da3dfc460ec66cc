use super::{open_repository, GlobalArgs};
use crate::{
    core::{branch::Classifier, OutputSink, RepoBackend},
    error::BranchError,
    output::{CliOutput, Output, OutputConfig},
    settings::ArboristSettings,
    styles,
};
use anyhow::Result;
use serde::Serialize;
use tabled::{builder::Builder, settings::Style};

#[derive(clap::Args)]
#[command(about = "Show every local branch with its status")]
#[command(long_about = r#"
Lists every local branch with its status relative to the target branch:

  MERGED    the branch tip is reachable from the target
  UNMERGED  the branch has commits the target does not
  GONE      the branch's upstream no longer exists on any remote
  UNKNOWN   the status could not be determined (see --verbose)

The checked-out branch is marked with `*`; the target branch itself is shown
as `target`. Remote state is queried live but nothing is fetched or changed.

Use --json for machine-readable output suitable for scripting.
"#)]
pub struct Args {
    #[arg(long, value_name = "BRANCH", help = "Branch to compare against")]
    pub target: Option<String>,

    #[arg(long, help = "Output in JSON format")]
    pub json: bool,
}

/// One line of `status` output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusRow {
    pub name: String,
    pub current: bool,
    /// Branch status, or `target` for the target branch.
    pub status: String,
    pub upstream: Option<String>,
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
) -> Result<Vec<StatusRow>> {
    let target = args
        .target
        .clone()
        .unwrap_or_else(|| settings.target_branch.clone());
    if backend.branch_commit(&target)?.is_none() {
        return Err(BranchError::not_found(&target).into());
    }

    let branches = backend.list_branches()?;
    let current = backend.current_branch()?;
    let classifier = Classifier::new(backend, target.as_str());
    let candidates = classifier.classify_all(&branches, &mut OutputSink(&mut *output));

    let mut rows: Vec<StatusRow> = branches
        .iter()
        .map(|branch| {
            let status = if branch.name == target {
                "target".to_string()
            } else {
                candidates
                    .iter()
                    .find(|c| c.name == branch.name)
                    .map(|c| c.status.to_string())
                    .unwrap_or_default()
            };
            StatusRow {
                name: branch.name.clone(),
                current: current.as_deref() == Some(branch.name.as_str()),
                status,
                upstream: branch.tracking.as_ref().map(ToString::to_string),
            }
        })
        .collect();
    rows.sort_by(|a, b| a.name.cmp(&b.name));

    if args.json {
        output.raw(&format!("{}\n", serde_json::to_string_pretty(&rows)?));
    } else if !rows.is_empty() {
        output.raw(&format!("{}\n", render_table(&rows, styles::colors_enabled())));
    }

    Ok(rows)
}

fn render_table(rows: &[StatusRow], use_color: bool) -> String {
    let mut builder = Builder::new();
    let header: Vec<String> = ["", "Branch", "Status", "Upstream"]
        .iter()
        .map(|h| {
            if use_color && !h.is_empty() {
                styles::dim(h)
            } else {
                h.to_string()
            }
        })
        .collect();
    builder.push_record(header);

    for row in rows {
        let marker = match (row.current, use_color) {
            (true, true) => styles::cyan("*"),
            (true, false) => "*".to_string(),
            (false, _) => " ".to_string(),
        };
        builder.push_record([
            marker,
            row.name.clone(),
            colorize_status(&row.status, use_color),
            row.upstream.clone().unwrap_or_default(),
        ]);
    }

    let mut table = builder.build();
    table.with(Style::blank());
    table.to_string()
}

fn colorize_status(status: &str, use_color: bool) -> String {
    if !use_color {
        return status.to_string();
    }
    match status {
        "MERGED" => styles::green(status),
        "GONE" => styles::yellow(status),
        "UNKNOWN" => styles::red(status),
        "target" => styles::dim(status),
        _ => status.to_string(),
    }
}
