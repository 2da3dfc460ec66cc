//! Shell completion generation for arborist.
//!
//! Scripts are generated by clap_complete from the full command definition,
//! so every subcommand and flag is covered.

use super::Cli;
use anyhow::{Context, Result};
use clap::CommandFactory;
use clap_complete::{generate, Shell};
use std::io::{self, Write};
use std::path::PathBuf;

const BIN_NAME: &str = "arborist";

#[derive(clap::Args, Debug, Clone)]
#[command(about = "Generate shell completion scripts")]
pub struct Args {
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,

    #[arg(short, long, help = "Install completions to the standard shell location")]
    pub install: bool,
}

pub fn run(args: &Args) -> Result<()> {
    if args.install {
        install_completions(args.shell)
    } else {
        write_completions(args.shell, &mut io::stdout())
    }
}

/// Write the completion script for `shell` to `out`.
pub fn write_completions(shell: Shell, out: &mut dyn Write) -> Result<()> {
    let mut buf = Vec::new();
    generate(shell, &mut Cli::command(), BIN_NAME, &mut buf);
    out.write_all(&buf)
        .context("Failed to write completion script")?;
    Ok(())
}

/// Install completions to standard shell locations
fn install_completions(shell: Shell) -> Result<()> {
    let install_dir = completion_dir(shell)?;

    std::fs::create_dir_all(&install_dir)
        .with_context(|| format!("Failed to create completion directory: {install_dir:?}"))?;

    let file_path = install_dir.join(completion_filename(shell));
    let mut file = std::fs::File::create(&file_path)
        .with_context(|| format!("Failed to create completion file: {file_path:?}"))?;
    write_completions(shell, &mut file)?;

    eprintln!("Installed completions to {}", file_path.display());
    print_post_install_message(shell);
    Ok(())
}

/// Get the standard completion directory for a shell
fn completion_dir(shell: Shell) -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;

    let dir = match shell {
        Shell::Bash => {
            let xdg_data = std::env::var("XDG_DATA_HOME")
                .map(PathBuf::from)
                .unwrap_or_else(|_| home.join(".local/share"));
            xdg_data.join("bash-completion/completions")
        }
        // commonly added to fpath
        Shell::Zsh => home.join(".zfunc"),
        Shell::Fish => {
            let xdg_config = std::env::var("XDG_CONFIG_HOME")
                .map(PathBuf::from)
                .unwrap_or_else(|_| home.join(".config"));
            xdg_config.join("fish/completions")
        }
        _ => anyhow::bail!("Installing completions is not supported for {shell}"),
    };

    Ok(dir)
}

fn completion_filename(shell: Shell) -> String {
    match shell {
        Shell::Bash => BIN_NAME.to_string(),
        Shell::Zsh => format!("_{BIN_NAME}"),
        Shell::Fish => format!("{BIN_NAME}.fish"),
        _ => format!("{BIN_NAME}.{shell}"),
    }
}

fn print_post_install_message(shell: Shell) {
    match shell {
        Shell::Bash => {
            eprintln!("\nCompletions load automatically when bash-completion is installed.");
        }
        Shell::Zsh => {
            eprintln!("\nTo activate completions, add this to your ~/.zshrc:");
            eprintln!("  fpath=(~/.zfunc $fpath)");
            eprintln!("  autoload -Uz compinit && compinit");
        }
        Shell::Fish => {
            eprintln!("\nCompletions are automatically loaded by fish.");
        }
        _ => {}
    }
}
