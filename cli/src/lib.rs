//! # procap Library
//!
//! File: cli/src/lib.rs
//! Author: Christi Mahu
//! Repository: https://github.com/christimahu/procap
//!
//! The capture engine and its supporting infrastructure, usable without the
//! command-line wrapper in `main.rs`.
//!
//! - `common::process`: spawn a program, feed it a line, capture its stdout
//! - `common::fs`: read input files
//! - `core::config` / `core::error`: configuration and the error taxonomy
//!

pub mod common; // Shared utilities (process capture, filesystem)
pub mod core; // Core infrastructure (errors, config)
