//! # procap Configuration System
//!
//! File: cli/src/core/config.rs
//! Author: Christi Mahu
//! Repository: https://github.com/christimahu/procap
//!
//! ## Overview
//!
//! This module implements the configuration system for procap, handling loading,
//! merging, validation, and access to configuration data. Every setting has a
//! built-in default, so running without any configuration file is the normal case.
//!
//! ## Architecture
//!
//! Configuration sources (in order of precedence):
//! 1. Project-specific `.procap.toml` in current directory or ancestors
//! 2. User-specific `<config dir>/procap/config.toml`
//! 3. Default values defined in the code
//!
//! Command-line flags of `procap run` override whatever the merged configuration says.
//!
//! ## Examples
//!
//! ```toml
//! [capture]
//! timeout_secs = 10.0
//! exit_grace_ms = 500
//! working_dir = "~/code/my-project"
//! forward_stderr = false
//!
//! [output]
//! header = true
//! ```
//!
//! ```rust,ignore
//! let cfg = config::load_config()?;
//! let grace = cfg.capture.exit_grace();
//! ```
//!
use crate::core::error::{ProcapError, Result};
use anyhow::{anyhow, Context};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};
use tracing::{debug, info, warn};

/// Represents the main configuration structure, loaded from TOML files.
#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)] // Error if unknown fields are in TOML
pub struct Config {
    #[serde(default)]
    pub capture: CaptureConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Settings that shape how a child process is run and captured.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CaptureConfig {
    /// Seconds to wait for end-of-stream. Absent means wait indefinitely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<f64>,
    /// Milliseconds to wait for the child to exit after it closed its output.
    #[serde(default = "default_exit_grace_ms")]
    pub exit_grace_ms: u64,
    /// Directory the child is started in (can use ~). Will be expanded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<String>,
    /// Let the child write its stderr to ours instead of discarding it.
    #[serde(default = "default_forward_stderr")]
    pub forward_stderr: bool,
}

/// Presentation of the captured text.
#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Print an `Output:` line before the captured text.
    #[serde(default)]
    pub header: bool,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            timeout_secs: None,
            exit_grace_ms: default_exit_grace_ms(),
            working_dir: None,
            forward_stderr: default_forward_stderr(),
        }
    }
}

impl CaptureConfig {
    pub fn exit_grace(&self) -> Duration {
        Duration::from_millis(self.exit_grace_ms)
    }

    /// The configured timeout, if one is set and valid.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.and_then(timeout_from_secs)
    }
}

/// Converts a number of seconds to a timeout. Only positive, finite values
/// that fit in a `Duration` are accepted.
pub fn timeout_from_secs(secs: f64) -> Option<Duration> {
    if secs > 0.0 {
        Duration::try_from_secs_f64(secs).ok()
    } else {
        None
    }
}

fn default_exit_grace_ms() -> u64 {
    1000
}
fn default_forward_stderr() -> bool {
    true
}

const PROJECT_CONFIG_FILENAME: &str = ".procap.toml";
const USER_CONFIG_FILENAME: &str = "config.toml";

pub fn load_config() -> Result<Config> {
    let user_config = load_user_config()?;
    let project_config = load_project_config()?;
    let mut merged_config = merge_configs(user_config.unwrap_or_default(), project_config);
    expand_config_paths(&mut merged_config).context("Failed to expand paths in configuration")?;
    validate_config(&merged_config).context("Configuration validation failed")?;
    debug!("Final loaded configuration: {:?}", merged_config);
    Ok(merged_config)
}

/// Location of the per-user configuration file, whether or not it exists.
pub fn user_config_path() -> Option<PathBuf> {
    ProjectDirs::from("com", "Procap", "procap")
        .map(|dirs| dirs.config_dir().join(USER_CONFIG_FILENAME))
}

fn load_user_config() -> Result<Option<Config>> {
    match user_config_path() {
        Some(config_path) if config_path.exists() => {
            info!("Loading user configuration from: {}", config_path.display());
            load_config_from_path(&config_path).map(Some)
        }
        Some(config_path) => {
            debug!(
                "User configuration file not found at {}",
                config_path.display()
            );
            Ok(None)
        }
        None => {
            warn!("Could not determine user config directory.");
            Ok(None)
        }
    }
}

fn load_project_config() -> Result<Option<Config>> {
    if let Some(project_config_path) = find_project_config_path()? {
        info!(
            "Loading project configuration from: {}",
            project_config_path.display()
        );
        load_config_from_path(&project_config_path).map(Some)
    } else {
        debug!(
            "No project configuration file (.procap.toml) found in current directory or ancestors."
        );
        Ok(None)
    }
}

/// Searches the current directory and its ancestors for `.procap.toml`,
/// stopping at the first directory that contains `.git`.
pub fn find_project_config_path() -> Result<Option<PathBuf>> {
    let current_dir = std::env::current_dir().context("Failed to get current directory")?;
    Ok(find_project_config_from(&current_dir))
}

fn find_project_config_from(start: &Path) -> Option<PathBuf> {
    let mut path = start;
    loop {
        let project_config = path.join(PROJECT_CONFIG_FILENAME);
        if project_config.is_file() {
            return Some(project_config);
        }
        if path.join(".git").is_dir() {
            debug!(
                "Found .git directory at {}, stopping project config search.",
                path.display()
            );
            return None;
        }
        path = path.parent()?;
    }
}

fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))
}

fn merge_configs(user: Config, project: Option<Config>) -> Config {
    let project_cfg = match project {
        Some(p) => p,
        None => return user,
    };
    let mut merged = Config::default();
    merged.capture.timeout_secs = project_cfg
        .capture
        .timeout_secs
        .or(user.capture.timeout_secs);
    merged.capture.exit_grace_ms = if project_cfg.capture.exit_grace_ms != default_exit_grace_ms()
    {
        project_cfg.capture.exit_grace_ms
    } else {
        user.capture.exit_grace_ms
    };
    merged.capture.working_dir = project_cfg
        .capture
        .working_dir
        .or(user.capture.working_dir);
    merged.capture.forward_stderr =
        if project_cfg.capture.forward_stderr != default_forward_stderr() {
            project_cfg.capture.forward_stderr
        } else {
            user.capture.forward_stderr
        };
    merged.output.header = project_cfg.output.header || user.output.header;
    merged
}

fn expand_config_paths(config: &mut Config) -> Result<()> {
    if let Some(dir) = config.capture.working_dir.as_mut() {
        *dir = shellexpand::tilde(dir.as_str()).into_owned();
        debug!("Expanded working directory: {}", dir);
    }
    Ok(())
}

fn validate_config(config: &Config) -> Result<()> {
    debug!("Validating final configuration...");
    if let Some(secs) = config.capture.timeout_secs {
        if timeout_from_secs(secs).is_none() {
            return Err(anyhow!(ProcapError::Config(format!(
                "capture.timeout_secs must be a positive number of seconds, got {}.",
                secs
            ))));
        }
    }
    if let Some(dir) = &config.capture.working_dir {
        let dir = PathBuf::from(dir);
        if !dir.exists() {
            warn!(
                "Configured working directory '{}' does not exist.",
                dir.display()
            );
        } else if !dir.is_dir() {
            return Err(anyhow!(ProcapError::Config(format!(
                "Configured working directory '{}' exists but is not a directory.",
                dir.display()
            ))));
        }
    }
    debug!("Configuration validation successful.");
    Ok(())
}
