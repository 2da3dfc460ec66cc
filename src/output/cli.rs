//! CLI output implementation.

use super::{Output, OutputConfig};
use crate::styles::{self, colors_enabled, colors_enabled_stderr};

/// CLI output implementation that writes directly to stdout/stderr.
///
/// Git-like output format:
/// - `step()` → verbose only, no prefix
/// - `result()` → primary output, always shown (unless quiet)
/// - `warning()` → `eprintln!("warning: {msg}")`
/// - `error()` → `eprintln!("error: {msg}")`
#[derive(Debug)]
pub struct CliOutput {
    config: OutputConfig,
}

impl CliOutput {
    pub fn new(config: OutputConfig) -> Self {
        Self { config }
    }

    /// Create a CLI output with default (non-quiet, non-verbose) settings.
    pub fn default_output() -> Self {
        Self::new(OutputConfig::default())
    }

    pub fn quiet() -> Self {
        Self::new(OutputConfig::new(true, false))
    }

    pub fn verbose() -> Self {
        Self::new(OutputConfig::new(false, true))
    }
}

impl Output for CliOutput {
    fn info(&mut self, msg: &str) {
        if !self.config.quiet {
            println!("{msg}");
        }
    }

    fn success(&mut self, msg: &str) {
        if !self.config.quiet {
            if colors_enabled() {
                println!("{}{msg}{}", styles::GREEN, styles::RESET);
            } else {
                println!("{msg}");
            }
        }
    }

    fn warning(&mut self, msg: &str) {
        // Warnings are always shown (not affected by quiet mode)
        if colors_enabled_stderr() {
            eprintln!("{}warning:{} {msg}", styles::YELLOW, styles::RESET);
        } else {
            eprintln!("warning: {msg}");
        }
    }

    fn error(&mut self, msg: &str) {
        // Errors are always shown (not affected by quiet mode)
        if colors_enabled_stderr() {
            eprintln!("{}error:{} {msg}", styles::RED, styles::RESET);
        } else {
            eprintln!("error: {msg}");
        }
    }

    fn debug(&mut self, msg: &str) {
        if self.config.verbose {
            if colors_enabled() {
                println!("{}debug: {msg}{}", styles::DIM, styles::RESET);
            } else {
                println!("debug: {msg}");
            }
        }
    }

    fn step(&mut self, msg: &str) {
        if self.config.verbose && !self.config.quiet {
            if colors_enabled() {
                println!("{}{msg}{}", styles::DIM, styles::RESET);
            } else {
                println!("{msg}");
            }
        }
    }

    fn result(&mut self, msg: &str) {
        if !self.config.quiet {
            if colors_enabled() {
                println!("{}{msg}{}", styles::BOLD, styles::RESET);
            } else {
                println!("{msg}");
            }
        }
    }

    fn list_item(&mut self, item: &str) {
        if !self.config.quiet {
            println!(" - {item}");
        }
    }

    fn operation_start(&mut self, operation: &str) {
        self.step(&format!("{operation}..."));
    }

    fn operation_end(&mut self, operation: &str, success: bool) {
        if self.config.verbose && !self.config.quiet {
            if success {
                println!("{operation} completed");
            } else {
                eprintln!("{operation} failed");
            }
        }
    }

    fn raw(&mut self, content: &str) {
        // Raw output is not affected by quiet mode - it's explicit content
        print!("{content}");
    }

    fn is_quiet(&self) -> bool {
        self.config.quiet
    }

    fn is_verbose(&self) -> bool {
        self.config.verbose
    }
}
