//! # procap Run Handler
//!
//! File: cli/src/commands/run.rs
//! Author: Christi Mahu
//! Repository: https://github.com/christimahu/procap
//!
//! ## Overview
//!
//! This module implements the `procap run` command. It starts a program,
//! optionally feeds it the contents of a file as a single input line, waits until
//! the program closes its standard output, and prints everything it wrote.
//!
//! ## Architecture
//!
//! The command flow is as follows:
//! 1. Parse command-line arguments (`RunArgs`) using `clap`.
//! 2. Load the procap configuration (`core::config`).
//! 3. Read the `--input` file in full. This happens before anything is spawned,
//!    so an unreadable file fails the command without starting the program.
//! 4. Resolve the timeout (`--no-timeout` > `--timeout`/`PROCAP_TIMEOUT` > config)
//!    and the working directory (`--cwd` > config).
//! 5. Run the capture via `common::process::capture_with`.
//! 6. Log the exit status and write the captured text to stdout, verbatim.
//!
//! Failures keep their `ProcapError` kind so that `main` can map them to an exit code.
//!
//! ## Usage
//!
//! ```bash
//! # Capture the output of a simple command
//! procap run echo Hello, World!
//!
//! # Send a request file to a language server, giving up after 10 seconds
//! procap run --input requests/initialize.txt --timeout 10 rust-analyzer
//!
//! # Use `--` when the program's own flags could be mistaken for ours
//! procap run --header -- ls --timeout
//! ```
//!
use anyhow::{anyhow, Context};
use clap::Parser;
use procap::{
    common::{
        fs::io,
        process::{self, CaptureOptions, CommandSpec},
    },
    core::{
        config::{self, CaptureConfig},
        error::{ProcapError, Result},
    },
};
use std::{
    io::Write,
    path::{Path, PathBuf},
    time::Duration,
};
use tracing::{debug, info, warn};

/// # Run Arguments (`RunArgs`)
///
/// Defines the command-line arguments accepted by `procap run`.
#[derive(Parser, Debug)]
#[command(
    about = "Run a program and print everything it writes to stdout",
    long_about = "Starts PROGRAM directly (no shell), optionally writes the contents of --input\n\
                  followed by a newline to its stdin, and prints its stdout once it closes."
)]
pub struct RunArgs {
    /// File whose contents are sent to the program as one input line.
    /// Read in full before the program is started.
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Give up if the program has not closed its output after SECS seconds.
    /// Overrides `capture.timeout_secs` from the configuration.
    #[arg(short, long, value_name = "SECS", env = "PROCAP_TIMEOUT")]
    timeout: Option<f64>,

    /// Wait indefinitely, ignoring any configured or given timeout.
    #[arg(long)]
    no_timeout: bool,

    /// Directory to start the program in.
    #[arg(long, value_name = "DIR")]
    cwd: Option<PathBuf>,

    /// Print an `Output:` line before the captured text.
    #[arg(long)]
    header: bool,

    /// The program to run, followed by its arguments.
    #[arg(
        required = true,
        trailing_var_arg = true,
        allow_hyphen_values = true,
        value_name = "PROGRAM"
    )]
    command: Vec<String>,
}

/// # Handle Run Command (`handle_run`)
///
/// Runs the requested program and prints its captured output.
///
/// ## Returns
///
/// * `Ok(())` once the output has been captured and printed, whatever the program's exit status.
/// * `Err` carrying a `ProcapError` for spawn failures, timeouts, I/O failures and
///   invalid arguments; other errors for configuration problems.
pub async fn handle_run(args: RunArgs) -> Result<()> {
    info!("Handling run command...");
    debug!("Run args: {:?}", args);

    let cfg = config::load_config().context("Failed to load procap configuration")?;

    let input_line = match &args.input {
        Some(path) => Some(io::read_input_file(path)?),
        None => None,
    };

    let timeout = resolve_timeout(args.timeout, args.no_timeout, &cfg.capture)?;

    let mut spec = CommandSpec::from_argv(&args.command)?;
    if let Some(dir) = args
        .cwd
        .as_deref()
        .or_else(|| cfg.capture.working_dir.as_deref().map(Path::new))
    {
        spec = spec.current_dir(dir);
    }

    let options = CaptureOptions {
        input_line,
        timeout,
        exit_grace: cfg.capture.exit_grace(),
        forward_stderr: cfg.capture.forward_stderr,
    };
    info!("Running '{}' (timeout: {:?})", spec, timeout);
    let output = process::capture_with(spec, options).await?;

    match output.exit_status {
        Some(status) if status.success() => debug!("Program exited successfully."),
        Some(status) => info!("Program finished with {}.", status),
        None => warn!("Exit status of the program could not be collected."),
    }

    let header = args.header || cfg.output.header;
    write_output(&mut std::io::stdout().lock(), &output.text, header)
}

/// Picks the effective timeout. `--no-timeout` wins over everything, a value
/// on the command line (or in `PROCAP_TIMEOUT`) wins over the configuration.
fn resolve_timeout(
    requested: Option<f64>,
    no_timeout: bool,
    cfg: &CaptureConfig,
) -> Result<Option<Duration>> {
    if no_timeout {
        return Ok(None);
    }
    match requested {
        Some(secs) => config::timeout_from_secs(secs).map(Some).ok_or_else(|| {
            anyhow!(ProcapError::ArgumentParsing(format!(
                "--timeout must be a positive number of seconds, got {}",
                secs
            )))
        }),
        None => Ok(cfg.timeout()),
    }
}

fn write_output(out: &mut impl Write, text: &str, header: bool) -> Result<()> {
    if header {
        writeln!(out, "Output:").context("Failed to write to stdout")?;
    }
    out.write_all(text.as_bytes())
        .context("Failed to write captured output to stdout")?;
    out.flush().context("Failed to flush stdout")?;
    Ok(())
}
