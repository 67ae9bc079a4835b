//! External command execution.
//!
//! Runs a process to completion in a fixed working directory, optionally
//! capturing stdout/stderr as lines. A non-zero exit status is reported, not
//! treated as an error; interpreting it is up to the caller.

use crate::error::{BootstrapError, Result};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

/// Which output streams to capture. Uncaptured streams go to the console.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capture {
    pub stdout: bool,
    pub stderr: bool,
}

impl Capture {
    /// Capture nothing, the child writes straight to the console.
    pub const NONE: Capture = Capture {
        stdout: false,
        stderr: false,
    };

    pub const fn new(stdout: bool, stderr: bool) -> Self {
        Self { stdout, stderr }
    }
}

/// Result of a finished process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` when terminated by a signal
    pub code: Option<i32>,
    /// Captured stdout lines (`None` if not captured)
    pub stdout: Option<Vec<String>>,
    /// Captured stderr lines (`None` if not captured)
    pub stderr: Option<Vec<String>>,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Captured stdout lines, empty if stdout was not captured.
    pub fn stdout_lines(&self) -> &[String] {
        self.stdout.as_deref().unwrap_or_default()
    }

    /// Captured stderr lines, empty if stderr was not captured.
    pub fn stderr_lines(&self) -> &[String] {
        self.stderr.as_deref().unwrap_or_default()
    }
}

/// Runs external commands inside one working directory.
#[derive(Debug, Clone)]
pub struct CommandRunner {
    workdir: PathBuf,
}

impl CommandRunner {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
        }
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Runs `program` with `args` and waits for it to exit.
    pub async fn run<S: AsRef<OsStr>>(
        &self,
        program: impl AsRef<OsStr>,
        args: &[S],
        capture: Capture,
    ) -> Result<CommandOutput> {
        self.run_with_env(program, args, capture, &[]).await
    }

    /// Like [`run`](Self::run), with extra environment variables for the child.
    pub async fn run_with_env<S: AsRef<OsStr>>(
        &self,
        program: impl AsRef<OsStr>,
        args: &[S],
        capture: Capture,
        envs: &[(&str, &OsStr)],
    ) -> Result<CommandOutput> {
        let program = program.as_ref();
        let command_line = display_command(program, args);
        log::debug!("Running command: '{}'", command_line);

        // `output()` would force both pipes, so spawn with explicit stdio instead
        let child = Command::new(program)
            .args(args)
            .envs(envs.iter().copied())
            .current_dir(&self.workdir)
            .stdin(Stdio::null())
            .stdout(stdio_for(capture.stdout))
            .stderr(stdio_for(capture.stderr))
            .spawn();

        let output = match child {
            Ok(child) => child.wait_with_output().await,
            Err(e) => Err(e),
        }
        .map_err(|source| BootstrapError::Spawn {
            command: command_line,
            source,
        })?;

        Ok(CommandOutput {
            code: output.status.code(),
            stdout: capture.stdout.then(|| split_lines(&output.stdout)),
            stderr: capture.stderr.then(|| split_lines(&output.stderr)),
        })
    }
}

fn stdio_for(captured: bool) -> Stdio {
    if captured {
        Stdio::piped()
    } else {
        Stdio::inherit()
    }
}

fn split_lines(bytes: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(bytes)
        .lines()
        .map(str::to_string)
        .collect()
}

/// Space-joined command line for log and error messages.
pub fn display_command<S: AsRef<OsStr>>(program: &OsStr, args: &[S]) -> String {
    std::iter::once(program)
        .chain(args.iter().map(AsRef::as_ref))
        .map(|s| s.to_string_lossy())
        .collect::<Vec<_>>()
        .join(" ")
}
