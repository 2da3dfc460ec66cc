use arborist::{
    commands::{self, Cli},
    output::{CliOutput, Output},
};
use clap::Parser;

fn main() {
    let cli = Cli::parse();

    if let Err(err) = commands::run(cli) {
        CliOutput::default_output().error(&format!("{err:#}"));
        std::process::exit(1);
    }
}
