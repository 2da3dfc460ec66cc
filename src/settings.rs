//! User settings for arborist.
//!
//! Settings are layered, lowest precedence first:
//!
//! 1. built-in defaults ([`defaults`])
//! 2. the TOML file at `$XDG_CONFIG_HOME/arborist/config.toml`
//!    (or the path in `ARBORIST_CONFIG`)
//! 3. `git config` (local, then global, as git resolves it)
//! 4. command-line flags, applied by the commands themselves
//!
//! # Config Keys
//!
//! | Key | File field | Default | Description |
//! |-----|------------|---------|-------------|
//! | `arborist.protect` | `protected_patterns` | `main`, `master`, `develop` | Branches never deleted (multi-valued) |
//! | `arborist.dryRun` | `dry_run_by_default` | `false` | Only show what `clean` would do |
//! | `arborist.interactive` | `interactive` | `true` | Ask before deleting |
//! | `arborist.skipGc` | `skip_gc` | `false` | Skip repository optimization after `clean` |
//! | `arborist.target` | `target_branch` | `"main"` | Branch merges are checked against |
//! | `arborist.remote` | `remote` | `"origin"` | Remote fetched before `clean` |
//! | `arborist.reflogExpiry` | `reflog_expiry` | `"90.days"` | `--expire` value for reflog expiry |
//!
//! # Example
//!
//! ```bash
//! # Protect release branches in this repository
//! git config --add arborist.protect 'release/*'
//!
//! # Never run gc after cleaning
//! git config --global arborist.skipGc true
//! ```

use crate::git::GitCommand;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "ARBORIST_CONFIG";

/// Default values for settings.
pub mod defaults {
    /// Default protected branch patterns.
    pub const PROTECTED_PATTERNS: &[&str] = &["main", "master", "develop"];

    pub const DRY_RUN: bool = false;

    pub const INTERACTIVE: bool = true;

    pub const SKIP_GC: bool = false;

    /// Default branch merges are checked against.
    pub const TARGET_BRANCH: &str = "main";

    pub const REMOTE: &str = "origin";

    /// Default `git reflog expire --expire` value.
    pub const REFLOG_EXPIRY: &str = "90.days";
}

/// Git config keys for arborist settings.
pub mod keys {
    /// Multi-valued; each value may itself be a comma-separated list.
    pub const PROTECT: &str = "arborist.protect";

    pub const DRY_RUN: &str = "arborist.dryRun";

    pub const INTERACTIVE: &str = "arborist.interactive";

    pub const SKIP_GC: &str = "arborist.skipGc";

    pub const TARGET: &str = "arborist.target";

    pub const REMOTE: &str = "arborist.remote";

    pub const REFLOG_EXPIRY: &str = "arborist.reflogExpiry";
}

/// Effective configuration passed explicitly to the planner and commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArboristSettings {
    /// Branch names or patterns that are never deleted.
    pub protected_patterns: Vec<String>,

    /// Whether `clean` only reports what it would do unless told otherwise.
    pub dry_run_by_default: bool,

    /// Whether `clean` asks for confirmation before deleting.
    pub interactive: bool,

    /// Whether `clean` skips repository optimization.
    pub skip_gc: bool,

    /// Branch that merge status is computed against.
    pub target_branch: String,

    /// Remote fetched before classification.
    pub remote: String,

    /// Reflog expiry used during optimization.
    pub reflog_expiry: String,
}

impl Default for ArboristSettings {
    fn default() -> Self {
        Self {
            protected_patterns: defaults::PROTECTED_PATTERNS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            dry_run_by_default: defaults::DRY_RUN,
            interactive: defaults::INTERACTIVE,
            skip_gc: defaults::SKIP_GC,
            target_branch: defaults::TARGET_BRANCH.to_string(),
            remote: defaults::REMOTE.to_string(),
            reflog_expiry: defaults::REFLOG_EXPIRY.to_string(),
        }
    }
}

/// The TOML config file. Every field is optional and overrides the defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    protected_patterns: Option<Vec<String>>,
    dry_run_by_default: Option<bool>,
    interactive: Option<bool>,
    skip_gc: Option<bool>,
    target_branch: Option<String>,
    remote: Option<String>,
    reflog_expiry: Option<String>,
}

impl ArboristSettings {
    /// Load settings from the config file and git config.
    pub fn load(git: &GitCommand) -> Result<Self> {
        let mut settings = Self::default();

        if let Some(path) = config_path() {
            settings.apply_file(&path)?;
        }

        settings.apply_git(git)?;
        Ok(settings)
    }

    /// Overlay values from a TOML file. A missing file is not an error.
    pub fn apply_file(&mut self, path: &Path) -> Result<()> {
        if !path.exists() {
            return Ok(());
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let file: FileConfig = toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        self.apply_file_config(file);
        Ok(())
    }

    fn apply_file_config(&mut self, file: FileConfig) {
        if let Some(patterns) = file.protected_patterns {
            self.protected_patterns = patterns;
        }
        if let Some(value) = file.dry_run_by_default {
            self.dry_run_by_default = value;
        }
        if let Some(value) = file.interactive {
            self.interactive = value;
        }
        if let Some(value) = file.skip_gc {
            self.skip_gc = value;
        }
        if let Some(value) = file.target_branch.filter(|v| !v.is_empty()) {
            self.target_branch = value;
        }
        if let Some(value) = file.remote.filter(|v| !v.is_empty()) {
            self.remote = value;
        }
        if let Some(value) = file.reflog_expiry.filter(|v| !v.is_empty()) {
            self.reflog_expiry = value;
        }
    }

    /// Overlay values from git config.
    pub fn apply_git(&mut self, git: &GitCommand) -> Result<()> {
        let protect = git.config_get_all(keys::PROTECT)?;
        if !protect.is_empty() {
            self.protected_patterns = split_patterns(&protect);
        }

        if let Some(value) = git.config_get(keys::DRY_RUN)? {
            self.dry_run_by_default = parse_bool(&value, self.dry_run_by_default);
        }

        if let Some(value) = git.config_get(keys::INTERACTIVE)? {
            self.interactive = parse_bool(&value, self.interactive);
        }

        if let Some(value) = git.config_get(keys::SKIP_GC)? {
            self.skip_gc = parse_bool(&value, self.skip_gc);
        }

        if let Some(value) = git.config_get(keys::TARGET)? {
            if !value.is_empty() {
                self.target_branch = value;
            }
        }

        if let Some(value) = git.config_get(keys::REMOTE)? {
            if !value.is_empty() {
                self.remote = value;
            }
        }

        if let Some(value) = git.config_get(keys::REFLOG_EXPIRY)? {
            if !value.is_empty() {
                self.reflog_expiry = value;
            }
        }

        Ok(())
    }

    /// Add patterns from `--protect` values, keeping the configured ones.
    pub fn extend_protected(&mut self, values: &[String]) {
        for pattern in split_patterns(values) {
            if !self.protected_patterns.contains(&pattern) {
                self.protected_patterns.push(pattern);
            }
        }
    }
}

/// Location of the config file: `ARBORIST_CONFIG`, else the user config dir.
pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        if !path.is_empty() {
            return Some(PathBuf::from(path));
        }
    }
    dirs::config_dir().map(|dir| dir.join("arborist").join("config.toml"))
}

/// Split comma-separated values into trimmed, non-empty patterns.
pub fn split_patterns<S: AsRef<str>>(values: &[S]) -> Vec<String> {
    values
        .iter()
        .flat_map(|v| v.as_ref().split(','))
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse a git config boolean value.
///
/// Git accepts various boolean representations:
/// - true: `true`, `yes`, `on`, `1`
/// - false: `false`, `no`, `off`, `0`
///
/// Returns the default value if parsing fails.
fn parse_bool(value: &str, default: bool) -> bool {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => true,
        "false" | "no" | "off" | "0" => false,
        _ => default,
    }
}
