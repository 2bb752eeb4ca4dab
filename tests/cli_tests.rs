//! CLI surface tests: argument parsing and startup validation.
//!
//! The binary runs an unbounded loop once configured, so these only cover
//! paths that exit.

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_missing_args_prints_usage() {
    Command::cargo_bin("mirra")
        .expect("binary built")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_help_lists_positional_args() {
    Command::cargo_bin("mirra")
        .expect("binary built")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("SOURCE"))
        .stdout(predicate::str::contains("REPLICA_PARENT"))
        .stdout(predicate::str::contains("INTERVAL"));
}

#[test]
fn test_zero_interval_rejected() {
    let dir = tempfile::tempdir().expect("create tempdir");

    Command::cargo_bin("mirra")
        .expect("binary built")
        .args([
            dir.path().join("src").to_str().unwrap(),
            dir.path().join("backup").to_str().unwrap(),
            "0",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("interval must be at least 1 second"));
}

#[test]
fn test_non_numeric_interval_rejected() {
    Command::cargo_bin("mirra")
        .expect("binary built")
        .args(["/tmp/a", "/tmp/b", "soon"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}
