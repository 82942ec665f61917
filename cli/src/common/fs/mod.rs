//! # procap Filesystem Utilities (`common::fs`)
//!
//! File: cli/src/common/fs/mod.rs
//! Author: Christi Mahu
//! Repository: https://github.com/christimahu/procap
//!
//! Filesystem helpers used by the commands. Currently only `io`, which reads
//! input files for `procap run --input`.
//!

/// Reading input files.
pub mod io;
