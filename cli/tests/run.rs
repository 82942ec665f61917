//! # procap CLI Run Integration Tests
//!
//! File: cli/tests/run.rs
//! Author: Christi Mahu
//! Repository: https://github.com/christimahu/procap
//!
//! ## Overview
//!
//! Integration tests for `procap run`: captured output on stdout, input files,
//! configuration, and the exit code reported for each kind of failure.
//!
//! **Note:** The programs driven here (`echo`, `head`, `sh`, `sleep`, `touch`)
//! are standard Unix tools, so the whole file is Unix-only.
//!
#![cfg(unix)]

mod common;
use common::*;
use predicates::prelude::*;
use std::fs;
use std::time::{Duration, Instant};
use tempfile::tempdir;

#[test]
fn test_run_echo_prints_output_verbatim() {
    let dir = tempdir().unwrap();
    procap_cmd_in(dir.path())
        .args(["run", "echo", "Hello, World!"])
        .assert()
        .success()
        .stdout("Hello, World!\n");
}

#[test]
fn test_run_with_header() {
    let dir = tempdir().unwrap();
    procap_cmd_in(dir.path())
        .args(["run", "--header", "echo", "hi"])
        .assert()
        .success()
        .stdout("Output:\nhi\n");
}

/// The input file becomes one line on the program's stdin.
#[test]
fn test_run_with_input_file() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("request.txt");
    fs::write(&input, "{\"method\": \"initialize\"}").unwrap();

    procap_cmd_in(dir.path())
        .args(["run", "--input"])
        .arg(&input)
        .args(["--", "head", "-n", "1"])
        .assert()
        .success()
        .stdout("{\"method\": \"initialize\"}\n");
}

/// A large input file echoed back by `cat` comes through intact.
#[test]
fn test_run_large_input_echoed_by_cat() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("large.txt");
    let line = "procap-".repeat(40_000);
    fs::write(&input, &line).unwrap();

    procap_cmd_in(dir.path())
        .args(["run", "--timeout", "10", "--input"])
        .arg(&input)
        .arg("cat")
        .assert()
        .success()
        .stdout(format!("{}\n", line));
}

/// An unreadable input file fails before the program is started.
#[test]
fn test_run_missing_input_file_spawns_nothing() {
    let dir = tempdir().unwrap();
    let marker = dir.path().join("marker");

    procap_cmd_in(dir.path())
        .args(["run", "--input", "does-not-exist.txt", "touch"])
        .arg(&marker)
        .assert()
        .failure()
        .code(74)
        .stderr(predicate::str::contains("does-not-exist.txt"));

    assert!(!marker.exists(), "program must not run when input is unreadable");
}

#[test]
fn test_run_missing_program_exit_code() {
    let dir = tempdir().unwrap();
    procap_cmd_in(dir.path())
        .args(["run", "definitely-not-a-real-executable-xyz"])
        .assert()
        .failure()
        .code(127)
        .stderr(predicate::str::contains("Failed to start"));
}

#[test]
fn test_run_timeout_exit_code() {
    let dir = tempdir().unwrap();
    let started = Instant::now();
    procap_cmd_in(dir.path())
        .args(["run", "--timeout", "1", "sleep", "30"])
        .assert()
        .failure()
        .code(124)
        .stdout("")
        .stderr(predicate::str::contains("did not close its output"));
    assert!(started.elapsed() < Duration::from_secs(10));
}

#[test]
fn test_run_timeout_from_environment() {
    let dir = tempdir().unwrap();
    procap_cmd_in(dir.path())
        .env("PROCAP_TIMEOUT", "1")
        .args(["run", "sleep", "30"])
        .assert()
        .code(124);
}

#[test]
fn test_run_rejects_non_positive_timeout() {
    let dir = tempdir().unwrap();
    procap_cmd_in(dir.path())
        .args(["run", "--timeout", "0", "echo", "never"])
        .assert()
        .failure()
        .code(2)
        .stdout("");
}

/// The program's own exit status does not fail the capture.
#[test]
fn test_run_non_zero_exit_still_succeeds() {
    let dir = tempdir().unwrap();
    procap_cmd_in(dir.path())
        .args(["run", "sh", "-c", "echo partial; exit 3"])
        .assert()
        .success()
        .stdout("partial\n");
}

#[test]
fn test_run_cwd_flag() {
    let dir = tempdir().unwrap();
    let work = dir.path().join("work");
    fs::create_dir(&work).unwrap();
    fs::write(work.join("here.txt"), "").unwrap();

    procap_cmd_in(dir.path())
        .args(["run", "--cwd"])
        .arg(&work)
        .args(["ls"])
        .assert()
        .success()
        .stdout("here.txt\n");
}

/// Settings from a project `.procap.toml` apply to `run`.
#[test]
fn test_run_uses_project_config() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join(".procap.toml"),
        "[output]\nheader = true\n\n[capture]\ntimeout_secs = 1.0\n",
    )
    .unwrap();

    procap_cmd_in(dir.path())
        .args(["run", "echo", "configured"])
        .assert()
        .success()
        .stdout("Output:\nconfigured\n");

    procap_cmd_in(dir.path())
        .args(["run", "sleep", "30"])
        .assert()
        .code(124);

    procap_cmd_in(dir.path())
        .args(["run", "--no-timeout", "sh", "-c", "sleep 1.5; echo late"])
        .assert()
        .success()
        .stdout("Output:\nlate\n");
}

#[test]
fn test_run_invalid_config_fails() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join(".procap.toml"), "[capture]\ntimeout_secs = -2.0\n").unwrap();

    procap_cmd_in(dir.path())
        .args(["run", "echo", "hi"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("timeout_secs"));
}
