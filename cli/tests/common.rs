//! # procap CLI Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//! Author: Christi Mahu
//! Repository: https://github.com/christimahu/procap
//!
//! ## Overview
//!
//! Shared helpers for the integration tests in `cli/tests/`. Each test file
//! declares `mod common;` and builds its commands through these functions so
//! that every run is isolated from the developer's own configuration.
//!

// Different test files use different helpers.
#![allow(dead_code)]

pub use assert_cmd::Command;
use std::path::Path;

/// # Get procap Command (`procap_cmd`)
///
/// Creates an `assert_cmd::Command` for the compiled `procap` binary.
///
/// ## Panics
/// Panics if the `procap` binary cannot be found via `Command::cargo_bin`.
pub fn procap_cmd() -> Command {
    Command::cargo_bin("procap").expect("Failed to find procap binary for testing")
}

/// # Get Isolated procap Command (`procap_cmd_in`)
///
/// Like `procap_cmd`, but runs inside `dir` with the user configuration
/// directory pointed at `dir/xdg` and `PROCAP_TIMEOUT` cleared, so only
/// configuration the test writes itself is picked up.
pub fn procap_cmd_in(dir: &Path) -> Command {
    let mut cmd = procap_cmd();
    cmd.current_dir(dir)
        .env("XDG_CONFIG_HOME", dir.join("xdg"))
        .env_remove("PROCAP_TIMEOUT")
        .env_remove("RUST_LOG");
    cmd
}
