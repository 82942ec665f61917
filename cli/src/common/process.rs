//! # procap Process Capture (`common::process`)
//!
//! File: cli/src/common/process.rs
//! Author: Christi Mahu
//! Repository: https://github.com/christimahu/procap
//!
//! ## Overview
//!
//! This module runs one external program to completion and hands back everything
//! it wrote to standard output. The program is started directly (no shell), may be
//! fed a single line of input, and is read until it closes its output stream.
//!
//! ## Architecture
//!
//! - **`CommandSpec`**: Program, arguments and optional working directory.
//! - **`CaptureOptions`**: Input line, timeout, exit grace period, stderr handling.
//! - **`CapturedSession`**: One child process and its lifecycle:
//!   `NotStarted → Spawned → (InputSent | InputSkipped) → Collecting → Finished`.
//!   Any failure moves straight to `Finished`. A session is consumed by `finish`.
//! - **`CapturedOutput`**: The captured text plus the exit status, when one was observed.
//! - **`capture` / `capture_with`**: One-call entry points built on `CapturedSession`.
//!
//! The child is always released before a capture returns:
//! - after end-of-stream it is reaped, or killed and reaped once the exit grace runs out
//! - on timeout or I/O failure it is killed and reaped
//! - `kill_on_drop` covers any path that drops the handle early
//!
//! Partial output is discarded when a capture fails. A non-zero exit status is
//! not a failure; it is reported through `CapturedOutput::exit_status`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use crate::common::process::{capture, CommandSpec};
//! use std::time::Duration;
//!
//! let greeting = capture(&CommandSpec::new("echo").arg("Hello, World!"), None, None).await?;
//! assert_eq!(greeting, "Hello, World!\n");
//!
//! let reply = capture(
//!     &CommandSpec::new("rust-analyzer"),
//!     Some(&request),
//!     Some(Duration::from_secs(10)),
//! )
//! .await?;
//! ```
//!
use crate::core::error::{ProcapError, Result};
use anyhow::{anyhow, bail};
use std::{
    fmt,
    path::{Path, PathBuf},
    process::{ExitStatus, Stdio},
    time::Duration,
};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    process::{Child, ChildStdin, ChildStdout, Command},
};
use tracing::{debug, info, warn};

/// Terminator appended to the input line.
#[cfg(windows)]
pub const LINE_SEPARATOR: &str = "\r\n";
/// Terminator appended to the input line.
#[cfg(not(windows))]
pub const LINE_SEPARATOR: &str = "\n";

/// How long a child may keep running after closing its output before it is killed.
pub const DEFAULT_EXIT_GRACE: Duration = Duration::from_secs(1);

/// A single program invocation. Arguments are passed to the program as-is;
/// nothing is interpreted by a shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    program: String,
    args: Vec<String>,
    working_dir: Option<PathBuf>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            working_dir: None,
        }
    }

    /// Builds a spec from an argv-style list: the first element is the program.
    pub fn from_argv(argv: &[String]) -> Result<Self> {
        match argv.split_first() {
            Some((program, args)) if !program.is_empty() => {
                Ok(Self::new(program.as_str()).args(args.iter().cloned()))
            }
            _ => Err(anyhow!(ProcapError::ArgumentParsing(
                "No program given to run.".to_string()
            ))),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn working_dir(&self) -> Option<&Path> {
        self.working_dir.as_deref()
    }

    fn to_command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }
        command
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Knobs for a single capture.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureOptions {
    /// Written to the child's stdin, followed by `LINE_SEPARATOR`. When `None`
    /// the child's stdin is the null device and nothing is written.
    pub input_line: Option<String>,
    /// Upper bound for input delivery plus output collection. `None` waits forever.
    pub timeout: Option<Duration>,
    /// Time allowed for the child to exit after it closed its output.
    pub exit_grace: Duration,
    /// Inherit the child's stderr (`true`) or discard it (`false`).
    pub forward_stderr: bool,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            input_line: None,
            timeout: None,
            exit_grace: DEFAULT_EXIT_GRACE,
            forward_stderr: true,
        }
    }
}

/// Lifecycle of a `CapturedSession`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    NotStarted,
    Spawned,
    InputSent,
    InputSkipped,
    Collecting,
    Finished,
}

/// Result of a successful capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedOutput {
    /// Everything the child wrote to stdout, decoded as UTF-8 (invalid
    /// sequences replaced), untrimmed.
    pub text: String,
    /// Exit status of the child, if it could be collected.
    pub exit_status: Option<ExitStatus>,
}

/// One spawned child process and its accumulated output.
///
/// Most callers want [`capture`] or [`capture_with`]. The session type is for
/// callers that need the child's pid before the capture completes.
#[derive(Debug)]
pub struct CapturedSession {
    command: CommandSpec,
    label: String,
    input_line: Option<String>,
    timeout: Option<Duration>,
    exit_grace: Duration,
    forward_stderr: bool,
    state: SessionState,
    child: Option<Child>,
    pid: Option<u32>,
}

impl CapturedSession {
    pub fn new(command: CommandSpec, options: CaptureOptions) -> Self {
        let label = command.to_string();
        Self {
            command,
            label,
            input_line: options.input_line,
            timeout: options.timeout,
            exit_grace: options.exit_grace,
            forward_stderr: options.forward_stderr,
            state: SessionState::NotStarted,
            child: None,
            pid: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// OS process id of the child, once spawned.
    pub fn id(&self) -> Option<u32> {
        self.pid
    }

    /// Starts the child process.
    ///
    /// # Errors
    ///
    /// `ProcapError::Spawn` if the program cannot be located or started. The
    /// session is `Finished` afterwards.
    pub fn spawn(&mut self) -> Result<()> {
        if self.state != SessionState::NotStarted {
            bail!(
                "Session for '{}' cannot be spawned from state {:?}",
                self.label,
                self.state
            );
        }

        let mut command = self.command.to_command();
        command
            .stdin(if self.input_line.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(if self.forward_stderr {
                Stdio::inherit()
            } else {
                Stdio::null()
            })
            .kill_on_drop(true);

        debug!("Spawning '{}' (cwd: {:?})", self.label, self.command.working_dir());
        let child = match command.spawn() {
            Ok(child) => child,
            Err(source) => {
                advance(&mut self.state, SessionState::Finished, &self.label);
                return Err(anyhow!(ProcapError::Spawn {
                    command: self.label.clone(),
                    source,
                }));
            }
        };

        self.pid = child.id();
        info!("Spawned '{}' with pid {:?}", self.label, self.pid);
        self.child = Some(child);
        advance(&mut self.state, SessionState::Spawned, &self.label);
        Ok(())
    }

    /// Sends the input line (if any), reads stdout to end-of-stream, and
    /// releases the child. Spawns first if that has not happened yet.
    ///
    /// # Errors
    ///
    /// - `ProcapError::Spawn` if the program cannot be started.
    /// - `ProcapError::Timeout` if end-of-stream is not seen within the timeout.
    /// - `ProcapError::InputWrite` / `ProcapError::OutputRead` on pipe failures.
    pub async fn finish(mut self) -> Result<CapturedOutput> {
        if self.state == SessionState::NotStarted {
            self.spawn()?;
        }
        let mut child = match self.child.take() {
            Some(child) => child,
            None => bail!("Session for '{}' has no child to collect from", self.label),
        };
        let stdin = child.stdin.take();
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| anyhow!("Stdout of '{}' was not captured", self.label))?;
        let input_line = self.input_line.take();

        let work = exchange(
            &self.label,
            &mut self.state,
            stdin,
            stdout,
            input_line.as_deref(),
        );
        let outcome = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, work)
                .await
                .map_err(|_elapsed| limit),
            None => Ok(work.await),
        };

        let result = match outcome {
            Ok(Ok(bytes)) => {
                let exit_status = reap(&mut child, self.exit_grace, &self.label).await;
                info!(
                    "Captured {} bytes from '{}' (exit status: {:?})",
                    bytes.len(),
                    self.label,
                    exit_status
                );
                Ok(CapturedOutput {
                    text: String::from_utf8_lossy(&bytes).into_owned(),
                    exit_status,
                })
            }
            Ok(Err(err)) => {
                release(&mut child, &self.label).await;
                Err(err)
            }
            Err(limit) => {
                warn!(
                    "'{}' did not close its output within {:?}; terminating it",
                    self.label, limit
                );
                release(&mut child, &self.label).await;
                Err(anyhow!(ProcapError::Timeout {
                    command: self.label.clone(),
                    seconds: limit.as_secs_f64(),
                }))
            }
        };
        advance(&mut self.state, SessionState::Finished, &self.label);
        result
    }
}

/// Runs `command` to end-of-stream and returns its captured stdout.
///
/// `input_line`, when given, is written to the child's stdin followed by
/// `LINE_SEPARATOR`. `timeout` bounds the wait for end-of-stream.
pub async fn capture(
    command: &CommandSpec,
    input_line: Option<&str>,
    timeout: Option<Duration>,
) -> Result<String> {
    let options = CaptureOptions {
        input_line: input_line.map(str::to_owned),
        timeout,
        ..CaptureOptions::default()
    };
    Ok(capture_with(command.clone(), options).await?.text)
}

/// Like [`capture`], with every option available and the exit status reported.
pub async fn capture_with(command: CommandSpec, options: CaptureOptions) -> Result<CapturedOutput> {
    CapturedSession::new(command, options).finish().await
}

fn advance(state: &mut SessionState, next: SessionState, label: &str) {
    debug!("Session '{}': {:?} -> {:?}", label, state, next);
    *state = next;
}

/// Writes the input line (then closes stdin) while reading stdout to
/// end-of-stream. The write and the read make progress concurrently.
async fn exchange(
    label: &str,
    state: &mut SessionState,
    stdin: Option<ChildStdin>,
    mut stdout: ChildStdout,
    input_line: Option<&str>,
) -> Result<Vec<u8>> {
    let feed = async {
        match (stdin, input_line) {
            (Some(mut stdin), Some(line)) => {
                let payload = format!("{}{}", line, LINE_SEPARATOR);
                let write_failed = |source| {
                    anyhow!(ProcapError::InputWrite {
                        command: label.to_string(),
                        source,
                    })
                };
                stdin
                    .write_all(payload.as_bytes())
                    .await
                    .map_err(write_failed)?;
                stdin.flush().await.map_err(write_failed)?;
                // Dropping the handle closes the pipe; the child sees EOF after the line.
                drop(stdin);
                debug!("Sent {} bytes of input to '{}'", payload.len(), label);
                advance(state, SessionState::InputSent, label);
            }
            _ => advance(state, SessionState::InputSkipped, label),
        }
        advance(state, SessionState::Collecting, label);
        Ok::<_, anyhow::Error>(())
    };

    let collect = async {
        let mut buffer = Vec::new();
        stdout.read_to_end(&mut buffer).await.map_err(|source| {
            anyhow!(ProcapError::OutputRead {
                command: label.to_string(),
                source,
            })
        })?;
        Ok::<_, anyhow::Error>(buffer)
    };

    let ((), buffer) = tokio::try_join!(feed, collect)?;
    debug!("End-of-stream from '{}' after {} bytes", label, buffer.len());
    Ok(buffer)
}

/// Waits up to `grace` for a child that already closed its output, then kills it.
async fn reap(child: &mut Child, grace: Duration, label: &str) -> Option<ExitStatus> {
    match tokio::time::timeout(grace, child.wait()).await {
        Ok(Ok(status)) => Some(status),
        Ok(Err(e)) => {
            warn!("Failed to collect exit status of '{}': {}", label, e);
            None
        }
        Err(_) => {
            warn!(
                "'{}' still running {:?} after closing its output; terminating it",
                label, grace
            );
            release(child, label).await
        }
    }
}

/// Kills the child (if still running) and reaps it.
async fn release(child: &mut Child, label: &str) -> Option<ExitStatus> {
    if let Err(e) = child.start_kill() {
        // Already exited; waiting below still reaps it.
        debug!("Kill not delivered to '{}': {}", label, e);
    }
    match child.wait().await {
        Ok(status) => {
            debug!("Released '{}' ({})", label, status);
            Some(status)
        }
        Err(e) => {
            warn!("Failed to reap '{}': {}", label, e);
            None
        }
    }
}
