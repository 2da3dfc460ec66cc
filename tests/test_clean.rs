mod common;

use common::TestRepo;
use predicates::prelude::*;

#[test]
fn test_clean_deletes_merged_keeps_unmerged() {
    let repo = TestRepo::new();
    repo.merged_branch("feature/a");
    repo.unmerged_branch("feature/b");

    repo.arborist()
        .args(["clean", "--no-interactive", "--no-gc"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted feature/a"));

    assert_eq!(repo.branches(), vec!["feature/b", "main"]);
    assert_eq!(repo.current_branch(), "main");
}

#[test]
fn test_tag_named_like_target_is_ignored() {
    let repo = TestRepo::new();
    repo.unmerged_branch("feature/b");
    repo.git(&["tag", "main", "feature/b"]);

    repo.arborist()
        .args(["clean", "--no-interactive", "--no-gc"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to clean up"));

    assert_eq!(repo.branches(), vec!["feature/b", "main"]);
}

#[test]
fn test_gone_branch_is_reported_and_deleted() {
    let repo = TestRepo::new();
    repo.add_origin();
    repo.unmerged_branch("feature/c");
    repo.git(&["push", "-q", "-u", "origin", "feature/c"]);
    repo.git(&["push", "-q", "origin", "--delete", "feature/c"]);

    let output = repo
        .arborist()
        .args(["status", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let rows: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let row = rows
        .as_array()
        .unwrap()
        .iter()
        .find(|r| r["name"] == "feature/c")
        .unwrap();
    assert_eq!(row["status"], "GONE");
    assert_eq!(row["upstream"], "origin/feature/c");

    repo.arborist()
        .args(["clean", "--no-interactive", "--no-gc"])
        .assert()
        .success();
    assert_eq!(repo.branches(), vec!["main"]);
}

#[test]
fn test_protect_patterns_keep_release_branches() {
    let repo = TestRepo::new();
    repo.merged_branch("release/1.0");
    repo.merged_branch("release/2.0");

    repo.arborist()
        .args(["clean", "--protect", "release/*", "--no-interactive", "--no-gc"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to clean up"));

    assert_eq!(repo.branches(), vec!["main", "release/1.0", "release/2.0"]);
}

#[test]
fn test_force_removes_worktree_before_branch() {
    let repo = TestRepo::new();
    repo.merged_branch("feature/y");
    let worktree = repo.sibling("feature-y");
    repo.git(&["worktree", "add", "-q", worktree.to_str().unwrap(), "feature/y"]);

    repo.arborist()
        .args(["clean", "--force", "--no-interactive", "--no-gc"])
        .assert()
        .success();

    assert_eq!(repo.branches(), vec!["main"]);
    assert!(!worktree.exists());
    let worktrees = repo.git(&["worktree", "list", "--porcelain"]);
    assert!(!worktrees.contains("feature/y"));
}

#[test]
fn test_dry_run_changes_nothing_and_repeats() {
    let repo = TestRepo::new();
    repo.merged_branch("feature/a");
    repo.unmerged_branch("feature/b");

    let run = || {
        let output = repo
            .arborist()
            .args(["clean", "--dry-run", "--no-interactive"])
            .output()
            .unwrap();
        assert!(output.status.success());
        String::from_utf8(output.stdout).unwrap()
    };

    let first = run();
    let second = run();
    assert_eq!(first, second);
    assert!(first.contains("would delete feature/a (MERGED)"));
    assert!(!first.contains("feature/b"));
    assert_eq!(repo.branches(), vec!["feature/a", "feature/b", "main"]);
}

#[test]
fn test_clean_with_optimization() {
    let repo = TestRepo::new();
    repo.merged_branch("feature/a");

    repo.arborist()
        .args(["clean", "--no-interactive"])
        .assert()
        .success();
    assert_eq!(repo.branches(), vec!["main"]);
}

#[test]
fn test_skip_gc_from_git_config() {
    let repo = TestRepo::new();
    repo.merged_branch("feature/a");
    repo.git(&["config", "arborist.skipGc", "true"]);

    repo.arborist()
        .args(["-v", "clean", "--no-interactive"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Skipping repository optimization"));
}

#[test]
fn test_protect_from_git_config() {
    let repo = TestRepo::new();
    repo.merged_branch("keep/me");
    repo.merged_branch("feature/a");
    repo.git(&["config", "--add", "arborist.protect", "main,keep/*"]);

    repo.arborist()
        .args(["clean", "--no-interactive", "--no-gc"])
        .assert()
        .success();
    assert_eq!(repo.branches(), vec!["keep/me", "main"]);
}

#[test]
fn test_missing_target_fails() {
    let repo = TestRepo::new();

    repo.arborist()
        .args(["clean", "--no-interactive", "--target", "trunk"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("branch 'trunk' not found"));
}
