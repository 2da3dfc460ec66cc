//! Output abstraction layer for separating IO from business logic.
//!
//! This module provides the `Output` trait that abstracts all output operations,
//! so command logic can be driven from the CLI or captured in tests.
//!
//! # Usage
//!
//! Commands should accept `&mut dyn Output` and use its methods instead of
//! direct `println!` or `eprintln!` calls:
//!
//! ```ignore
//! pub fn run_with_output(args: &Args, output: &mut dyn Output) -> Result<()> {
//!     output.step("Fetching from remotes...");
//!     output.result("Deleted 3 branches");
//!     Ok(())
//! }
//! ```

mod cli;
mod prompt;
mod spinner;

pub use cli::CliOutput;
pub use prompt::TerminalConfirm;
pub use spinner::SpinnerSink;
pub use test::{OutputEntry, TestOutput};

/// Configuration for output behavior.
#[derive(Debug, Clone, Default)]
pub struct OutputConfig {
    /// Suppress most output when true.
    pub quiet: bool,
    /// Enable debug/verbose output when true.
    pub verbose: bool,
}

impl OutputConfig {
    pub fn new(quiet: bool, verbose: bool) -> Self {
        Self { quiet, verbose }
    }
}

/// Trait for abstracting output operations.
///
/// Implementors should respect `quiet` and `verbose` modes where appropriate.
pub trait Output {
    // ─────────────────────────────────────────────────────────────────────────
    // Basic Messages
    // ─────────────────────────────────────────────────────────────────────────

    /// Display an informational message.
    /// Respects quiet mode.
    fn info(&mut self, msg: &str);

    /// Display a success message.
    /// Respects quiet mode.
    fn success(&mut self, msg: &str);

    /// Display a warning message to stderr.
    /// Always shown (not affected by quiet mode).
    fn warning(&mut self, msg: &str);

    /// Display an error message to stderr.
    /// Always shown (not affected by quiet mode).
    fn error(&mut self, msg: &str);

    /// Display a debug message.
    /// Only shown in verbose mode.
    fn debug(&mut self, msg: &str);

    // ─────────────────────────────────────────────────────────────────────────
    // Structured Output
    // ─────────────────────────────────────────────────────────────────────────

    /// Display an intermediate step message.
    /// Only shown in verbose mode (not in default output).
    fn step(&mut self, msg: &str);

    /// Display a final result message.
    /// The primary success output shown in default mode.
    fn result(&mut self, msg: &str);

    /// Display a list item.
    /// Renders as " - item" in CLI.
    fn list_item(&mut self, item: &str);

    // ─────────────────────────────────────────────────────────────────────────
    // Operation Lifecycle
    // ─────────────────────────────────────────────────────────────────────────

    /// Signal the start of a long-running operation (fetch, optimization).
    fn operation_start(&mut self, operation: &str);

    /// Signal the end of a long-running operation.
    fn operation_end(&mut self, operation: &str, success: bool);

    // ─────────────────────────────────────────────────────────────────────────
    // Special Output
    // ─────────────────────────────────────────────────────────────────────────

    /// Output raw, unformatted content.
    /// Useful for machine-readable output such as `status --json`.
    fn raw(&mut self, content: &str);

    // ─────────────────────────────────────────────────────────────────────────
    // State Queries
    // ─────────────────────────────────────────────────────────────────────────

    fn is_quiet(&self) -> bool;

    fn is_verbose(&self) -> bool;
}
