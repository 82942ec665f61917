//! # procap Error Types
//!
//! File: cli/src/core/error.rs
//! Author: Christi Mahu
//! Repository: https://github.com/christimahu/procap
//!
//! ## Overview
//!
//! This module defines the error types used throughout procap. Every failure a
//! capture can end in is a distinct, identifiable variant so that the CLI can
//! print an actionable message and exit with a code specific to the failure kind.
//!
//! ## Architecture
//!
//! The error system consists of two main components:
//! - `ProcapError`: A custom error enum using `thiserror` for specific error types
//! - `Result<T>`: A type alias for `anyhow::Result<T>` for flexible error handling
//!
//! The variants fall into a few families:
//! - Spawn failures (the executable could not be started)
//! - Timeouts (end-of-stream not observed in time)
//! - I/O failures (input file, child stdin, child stdout)
//! - Configuration and argument errors
//!
//! ## Examples
//!
//! ```rust,ignore
//! // Classify a failed capture
//! match capture(&spec, None, None).await {
//!     Ok(text) => print!("{}", text),
//!     Err(e) if matches!(e.downcast_ref::<ProcapError>(), Some(ProcapError::Timeout { .. })) => {
//!         eprintln!("gave up waiting");
//!     }
//!     Err(e) => return Err(e),
//! }
//!
//! // Map any error to the process exit code
//! std::process::exit(exit_code_for(&err));
//! ```
//!
use std::io;
use thiserror::Error;

/// Exit code for failures that have no more specific code (e.g. bad configuration).
pub const EXIT_FAILURE: i32 = 1;
/// Exit code for invalid arguments. Matches the code clap uses for usage errors.
pub const EXIT_USAGE: i32 = 2;
/// Exit code for I/O failures (`EX_IOERR` from sysexits.h).
pub const EXIT_IO: i32 = 74;
/// Exit code for a capture that timed out, as used by coreutils `timeout`.
pub const EXIT_TIMEOUT: i32 = 124;
/// Exit code for a program that could not be started, as used by POSIX shells.
pub const EXIT_SPAWN: i32 = 127;

/// Custom error type for procap.
#[derive(Error, Debug)]
pub enum ProcapError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Argument parsing error: {0}")]
    ArgumentParsing(String),

    #[error("Failed to start '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("'{command}' did not close its output within {seconds} second(s)")]
    Timeout { command: String, seconds: f64 },

    #[error("Failed to read input file '{path}': {source}")]
    InputFile {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write input to '{command}': {source}")]
    InputWrite {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read output of '{command}': {source}")]
    OutputRead {
        command: String,
        #[source]
        source: io::Error,
    },
}

impl ProcapError {
    /// The process exit code the CLI reports for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            ProcapError::Config(_) => EXIT_FAILURE,
            ProcapError::ArgumentParsing(_) => EXIT_USAGE,
            ProcapError::Spawn { .. } => EXIT_SPAWN,
            ProcapError::Timeout { .. } => EXIT_TIMEOUT,
            ProcapError::InputFile { .. }
            | ProcapError::InputWrite { .. }
            | ProcapError::OutputRead { .. } => EXIT_IO,
        }
    }
}

/// Finds the first `ProcapError` in the error chain and returns its exit code,
/// or `EXIT_FAILURE` when the chain carries none.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<ProcapError>())
        .map_or(EXIT_FAILURE, ProcapError::exit_code)
}

/// Type alias for Result using anyhow::Error for broad compatibility.
pub type Result<T> = anyhow::Result<T>;
