//! Process-wide leveled logging.
//!
//! Used for diagnostics that originate below the `Output` layer (the git
//! adapter, the classifier) where no output handle is available.

use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Error,
    Warning,
    Info,
    Debug,
}

static LOG_LEVEL: OnceLock<LogLevel> = OnceLock::new();

pub fn level_for(verbose: bool, quiet: bool) -> LogLevel {
    if verbose {
        LogLevel::Debug
    } else if quiet {
        LogLevel::Warning
    } else {
        LogLevel::Info
    }
}

pub fn init_logging(verbose: bool, quiet: bool) {
    LOG_LEVEL.set(level_for(verbose, quiet)).ok(); // Ignore errors if already set
}

pub fn get_log_level() -> LogLevel {
    *LOG_LEVEL.get().unwrap_or(&LogLevel::Info)
}

pub fn log(level: LogLevel, message: &str) {
    if level <= get_log_level() {
        match level {
            LogLevel::Error => eprintln!("error: {message}"),
            LogLevel::Warning => eprintln!("warning: {message}"),
            LogLevel::Info => println!("{message}"),
            LogLevel::Debug => println!("debug: {message}"),
        }
    }
}

#[macro_export]
macro_rules! log_warning {
    ($($arg:tt)*) => {
        $crate::logging::log($crate::logging::LogLevel::Warning, &format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        $crate::logging::log($crate::logging::LogLevel::Debug, &format!($($arg)*))
    };
}
