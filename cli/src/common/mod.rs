//! # procap Common Utilities (`common`)
//!
//! File: cli/src/common/mod.rs
//! Author: Christi Mahu
//! Repository: https://github.com/christimahu/procap
//!
//! ## Overview
//!
//! This module is the organizational entry point for the shared utilities used
//! by the command handlers. It keeps the reusable machinery separate from the
//! command-specific logic (`commands::`) and the core infrastructure (`core::`).
//!
//! - **`fs`**: Reading input files before a capture starts.
//! - **`process`**: Spawning a child process, feeding it input, and capturing its output.
//!
//! ```rust,ignore
//! use crate::common::{fs, process};
//!
//! let input = fs::io::read_input_file(Path::new("request.txt"))?;
//! let text = process::capture(&process::CommandSpec::new("cat"), Some(&input), None).await?;
//! ```
//!

/// Utilities for filesystem operations (input files).
pub mod fs;
/// Spawning and capturing external processes.
pub mod process;
