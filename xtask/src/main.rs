//! xtask - Development automation tasks for arborist
//!
//! This binary provides development-time tasks that don't need to be
//! included in the distributed binary.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_mangen::Man;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

/// Subcommands that get their own `arborist-<name>.1` page.
const SUBCOMMANDS: &[&str] = &[
    "status",
    "clean",
    "delete-branch",
    "create-branch",
    "completions",
];

/// Get the clap Command for a man page name (`arborist` or a subcommand).
fn get_command_for_name(command_name: &str) -> Option<clap::Command> {
    let root = arborist::commands::Cli::command();
    if command_name == "arborist" {
        return Some(root);
    }
    let sub = root.find_subcommand(command_name)?.clone();
    Some(sub.name(format!("arborist-{command_name}")))
}

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Development automation tasks for arborist")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate man pages for arborist and its subcommands
    GenMan {
        /// Output directory for man pages
        #[arg(long, default_value = "man")]
        output_dir: PathBuf,

        /// Specific subcommand to generate a man page for (default: all)
        #[arg(long)]
        command: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::GenMan {
            output_dir,
            command,
        } => generate_man_pages(&output_dir, command.as_deref()),
    }
}

/// Generate man pages and write to a directory
fn generate_man_pages(output_dir: &Path, command: Option<&str>) -> Result<()> {
    fs::create_dir_all(output_dir).with_context(|| {
        format!(
            "Failed to create output directory: {}",
            output_dir.display()
        )
    })?;

    let commands_to_generate: Vec<&str> = match command {
        Some(cmd) => vec![cmd],
        None => std::iter::once("arborist")
            .chain(SUBCOMMANDS.iter().copied())
            .collect(),
    };

    for command_name in commands_to_generate {
        let cmd = get_command_for_name(command_name)
            .with_context(|| format!("Unknown command: {command_name}"))?;
        let page_name = cmd.get_name().to_string();

        let man = Man::new(cmd);
        let mut buffer = Vec::new();
        man.render(&mut buffer)?;

        let file_path = output_dir.join(format!("{page_name}.1"));
        fs::write(&file_path, &buffer)
            .with_context(|| format!("Failed to write man page: {}", file_path.display()))?;

        eprintln!("Generated: {}", file_path.display());
    }

    eprintln!("\nMan pages generated in: {}", output_dir.display());
    Ok(())
}
