//! # procap Config Handler
//!
//! File: cli/src/commands/config.rs
//! Author: Christi Mahu
//! Repository: https://github.com/christimahu/procap
//!
//! Implements `procap config`, which prints the configuration `procap run`
//! would use: user and project files merged over the built-in defaults, with
//! paths expanded. `--paths` prints where those files are looked for instead.
//!
//! ```bash
//! procap config
//! procap config --paths
//! ```
//!
use anyhow::Context;
use clap::Parser;
use procap::core::{config, error::Result};
use tracing::info;

/// # Config Arguments (`ConfigArgs`)
#[derive(Parser, Debug)]
#[command(about = "Show the effective procap configuration")]
pub struct ConfigArgs {
    /// Print the configuration file locations instead of their merged contents.
    #[arg(long)]
    paths: bool,
}

/// # Handle Config Command (`handle_config`)
///
/// Prints either the merged configuration as TOML or the file locations.
pub async fn handle_config(args: ConfigArgs) -> Result<()> {
    info!("Handling config command...");

    if args.paths {
        match config::user_config_path() {
            Some(path) => println!("user:    {}", path.display()),
            None => println!("user:    (no config directory on this platform)"),
        }
        match config::find_project_config_path()? {
            Some(path) => println!("project: {}", path.display()),
            None => println!("project: (none found)"),
        }
        return Ok(());
    }

    let cfg = config::load_config().context("Failed to load procap configuration")?;
    let rendered = toml::to_string_pretty(&cfg).context("Failed to render configuration")?;
    print!("{}", rendered);
    Ok(())
}
