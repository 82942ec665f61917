//! # procap CLI Config Integration Tests
//!
//! File: cli/tests/config.rs
//! Author: Christi Mahu
//! Repository: https://github.com/christimahu/procap
//!
//! Integration tests for `procap config`.
//!

mod common;
use common::*;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_config_prints_defaults() {
    let dir = tempdir().unwrap();
    procap_cmd_in(dir.path())
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("[capture]"))
        .stdout(predicate::str::contains("exit_grace_ms = 1000"))
        .stdout(predicate::str::contains("header = false"));
}

#[test]
fn test_config_merges_project_file() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join(".procap.toml"),
        "[capture]\ntimeout_secs = 4.5\nforward_stderr = false\n",
    )
    .unwrap();

    procap_cmd_in(dir.path())
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("timeout_secs = 4.5"))
        .stdout(predicate::str::contains("forward_stderr = false"));
}

#[test]
fn test_config_paths() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join(".procap.toml"), "").unwrap();

    procap_cmd_in(dir.path())
        .args(["config", "--paths"])
        .assert()
        .success()
        .stdout(predicate::str::contains("user:"))
        .stdout(predicate::str::contains(".procap.toml"));
}

#[test]
fn test_config_rejects_unknown_keys() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join(".procap.toml"), "[capture]\nshell = true\n").unwrap();

    procap_cmd_in(dir.path())
        .arg("config")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse TOML"));
}
