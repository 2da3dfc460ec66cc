//! Spinner-backed progress sink for long-running maintenance steps.

use crate::core::ProgressSink;
use crate::styles;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::IsTerminal;
use std::time::Duration;

/// Renders `ProgressSink` milestones on a single spinner line on stderr.
///
/// When stderr is not a terminal (or quiet mode is on) no spinner is drawn
/// and steps are printed as plain lines in verbose mode only, matching
/// `CliOutput::step`.
pub struct SpinnerSink {
    bar: Option<ProgressBar>,
    verbose: bool,
    use_color: bool,
}

impl SpinnerSink {
    pub fn new(initial: &str, quiet: bool, verbose: bool) -> Self {
        let bar = if !quiet && std::io::stderr().is_terminal() {
            let bar = ProgressBar::new_spinner();
            let style = ProgressStyle::with_template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_chars(
                    "\u{2807}\u{2819}\u{2839}\u{2838}\u{283c}\u{2834}\u{2826}\u{2827}\u{2807}\u{280f}",
                );
            bar.set_style(style);
            bar.set_message(initial.to_string());
            bar.enable_steady_tick(Duration::from_millis(80));
            Some(bar)
        } else {
            None
        };

        Self {
            bar,
            verbose,
            use_color: styles::colors_enabled_stderr(),
        }
    }

    /// Stop the spinner and leave `msg` in its place.
    pub fn finish(self, msg: &str) {
        let drawn = self.bar.is_some();
        if let Some(bar) = self.bar {
            bar.finish_and_clear();
        }
        if !msg.is_empty() && (drawn || self.verbose) {
            println!("{msg}");
        }
    }

    /// Stop the spinner without leaving anything behind.
    pub fn clear(self) {
        if let Some(bar) = self.bar {
            bar.finish_and_clear();
        }
    }
}

impl ProgressSink for SpinnerSink {
    fn on_step(&mut self, msg: &str) {
        match &self.bar {
            Some(bar) => bar.set_message(msg.to_string()),
            None if self.verbose => println!("{msg}"),
            None => {}
        }
    }

    fn on_warning(&mut self, msg: &str) {
        let line = if self.use_color {
            format!("{}warning:{} {msg}", styles::YELLOW, styles::RESET)
        } else {
            format!("warning: {msg}")
        };
        match &self.bar {
            Some(bar) => bar.suspend(|| eprintln!("{line}")),
            None => eprintln!("{line}"),
        }
    }

    fn on_debug(&mut self, msg: &str) {
        if !self.verbose {
            return;
        }
        match &self.bar {
            Some(bar) => bar.suspend(|| println!("debug: {msg}")),
            None => println!("debug: {msg}"),
        }
    }
}
