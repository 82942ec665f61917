//! # procap Main Entry Point
//!
//! File: cli/src/main.rs
//! Author: Christi Mahu
//! Repository: https://github.com/christimahu/procap
//!
//! ## Overview
//!
//! This file serves as the main entry point for the procap CLI application.
//! It handles:
//! - Command-line argument parsing using Clap
//! - Setting up the logging system based on verbosity flags
//! - Routing execution to the command handlers
//! - Turning failures into a message on stderr and a distinct exit code
//!
//! ## Exit Codes
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0    | Output captured (whatever the program's own exit status) |
//! | 1    | Other failure, e.g. invalid configuration |
//! | 2    | Invalid arguments |
//! | 74   | I/O failure: input file, program stdin or stdout |
//! | 124  | The program did not close its output before the timeout |
//! | 127  | The program could not be started |
//!
//! ## Examples
//!
//! ```bash
//! # Capture what a program prints
//! procap run echo Hello, World!
//!
//! # Feed a file as one input line, with debug logging on stderr
//! procap -vv run --input request.txt --timeout 10 rust-analyzer
//! ```
//!
use clap::{Parser, Subcommand};
use procap::core::error::exit_code_for;
use tracing_subscriber::{fmt, EnvFilter};

mod commands; // Command handlers (run, config)

/// Defines the top-level command-line arguments structure using Clap's derive macros.
#[derive(Parser, Debug)]
#[command(
    name = "procap",
    about = "Run a program, optionally feed it one line of input, and capture everything it prints",
    long_about = "Starts a program without a shell, writes an optional input line to its stdin,\n\
                  waits until it closes stdout (or a timeout expires) and prints the captured text.",
    propagate_version = true,
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). Logs go to stderr.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

/// Enum defining all available top-level commands.
#[derive(Subcommand, Debug)]
enum Commands {
    #[command(alias = "r")]
    Run(commands::run::RunArgs),
    Config(commands::config::ConfigArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    let command_result = match cli.command {
        Commands::Run(args) => commands::run::handle_run(args).await,
        Commands::Config(args) => commands::config::handle_config(args).await,
    };

    if let Err(e) = command_result {
        tracing::error!("Command execution failed: {:?}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(exit_code_for(&e));
    }
}
