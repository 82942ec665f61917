//! # procap Command Modules
//!
//! File: cli/src/commands/mod.rs
//! Author: Christi Mahu
//! Repository: https://github.com/christimahu/procap
//!
//! ## Overview
//!
//! This module aggregates the top-level commands of the procap CLI and makes
//! them accessible to the main application entry point (`main.rs`).
//!
//! - `run`: Run a program and print everything it writes to stdout
//! - `config`: Show the effective configuration
//!
//! Each command defines its own arguments structure and handler function.
//!

/// Command for inspecting the merged configuration.
pub mod config;
/// Command for running and capturing a program.
pub mod run;
