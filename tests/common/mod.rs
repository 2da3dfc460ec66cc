//! Shared fixtures for integration tests.
//!
//! Every repository lives in its own temp dir and every git invocation runs
//! with an explicit `current_dir` and hook-inherited variables stripped, so
//! tests never touch the host repository or the user's git config.

#![allow(dead_code)]

use assert_cmd::Command as AssertCommand;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// Git environment variables that must be stripped from test subprocesses.
const GIT_ENV_VARS: &[&str] = &[
    "GIT_DIR",
    "GIT_WORK_TREE",
    "GIT_INDEX_FILE",
    "GIT_OBJECT_DIRECTORY",
    "GIT_ALTERNATE_OBJECT_DIRECTORIES",
    "GIT_COMMON_DIR",
    "GIT_CEILING_DIRECTORIES",
];

fn isolate(cmd: &mut Command, home: &Path) {
    for var in GIT_ENV_VARS {
        cmd.env_remove(var);
    }
    cmd.env("GIT_CONFIG_GLOBAL", home.join("gitconfig"))
        .env("GIT_CONFIG_NOSYSTEM", "1")
        .env("GIT_TERMINAL_PROMPT", "0")
        .env("ARBORIST_CONFIG", home.join("arborist.toml"))
        .env("NO_COLOR", "1");
}

/// A scratch repository on `main` with one commit.
pub struct TestRepo {
    _dir: TempDir,
    root: PathBuf,
    path: PathBuf,
}

impl TestRepo {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let root = dir.path().canonicalize().unwrap();
        let path = root.join("repo");
        std::fs::create_dir(&path).unwrap();
        std::fs::write(root.join("gitconfig"), "").unwrap();

        let repo = Self {
            _dir: dir,
            root,
            path,
        };
        repo.git(&["init", "-q", "-b", "main"]);
        repo.git(&["config", "user.email", "test@test.com"]);
        repo.git(&["config", "user.name", "Test"]);
        repo.commit("initial");
        repo
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory next to the repository, for worktrees and bare remotes.
    pub fn sibling(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Run git in the repository and return its trimmed stdout.
    pub fn git(&self, args: &[&str]) -> String {
        self.git_in(&self.path, args)
    }

    pub fn git_in(&self, dir: &Path, args: &[&str]) -> String {
        let mut cmd = Command::new("git");
        isolate(&mut cmd, &self.root);
        let output = cmd.args(args).current_dir(dir).output().unwrap();
        assert!(
            output.status.success(),
            "git {} failed: {}",
            args.join(" "),
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    }

    /// Commit a new file on the current branch.
    pub fn commit(&self, message: &str) {
        let file = format!("{}.txt", message.replace(['/', ' '], "-"));
        std::fs::write(self.path.join(&file), message).unwrap();
        self.git(&["add", &file]);
        self.git(&["commit", "-q", "-m", message]);
    }

    /// Create `name` from `main` with one extra commit, then return to `main`.
    pub fn unmerged_branch(&self, name: &str) {
        self.git(&["checkout", "-q", "-b", name]);
        self.commit(&format!("work on {name}"));
        self.git(&["checkout", "-q", "main"]);
    }

    /// Create `name` at the current `main` tip.
    pub fn merged_branch(&self, name: &str) {
        self.git(&["branch", name]);
    }

    /// Add a bare repository as `origin`.
    pub fn add_origin(&self) -> PathBuf {
        let bare = self.sibling("origin.git");
        std::fs::create_dir(&bare).unwrap();
        self.git_in(&bare, &["init", "-q", "--bare", "-b", "main"]);
        self.git(&["remote", "add", "origin", bare.to_str().unwrap()]);
        self.git(&["push", "-q", "origin", "main"]);
        bare
    }

    pub fn branches(&self) -> Vec<String> {
        self.git(&["for-each-ref", "--format=%(refname:short)", "refs/heads/"])
            .lines()
            .map(str::to_string)
            .collect()
    }

    pub fn current_branch(&self) -> String {
        self.git(&["symbolic-ref", "--short", "HEAD"])
    }

    /// The `arborist` binary, run inside the repository.
    pub fn arborist(&self) -> AssertCommand {
        let mut cmd = Command::new(assert_cmd::cargo::cargo_bin("arborist"));
        isolate(&mut cmd, &self.root);
        cmd.current_dir(&self.path);
        AssertCommand::from_std(cmd)
    }
}
