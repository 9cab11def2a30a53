//! External process execution
//!
//! Every tool the pipeline invokes goes through [`CommandRunner`]. Calls
//! block until the process exits; there is no timeout and no retry.

use std::fmt;
use std::path::Path;
use std::process::Command;

/// What a command is invoked for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Build-time tooling (compilers, build tool)
    Build,
    /// Running a produced binary
    Run,
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Build => f.write_str("build"),
            Self::Run => f.write_str("run"),
        }
    }
}

/// Exit status of a finished command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitStatus {
    /// Exit code; `None` when the process was terminated by a signal
    pub code: Option<i32>,
}

impl ExitStatus {
    pub const SUCCESS: Self = Self { code: Some(0) };

    pub fn from_code(code: i32) -> Self {
        Self { code: Some(code) }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

impl From<std::process::ExitStatus> for ExitStatus {
    fn from(status: std::process::ExitStatus) -> Self {
        Self {
            code: status.code(),
        }
    }
}

/// Runs a shell command in a working directory
pub trait CommandRunner {
    /// Run `command` to completion.
    ///
    /// `Err` means the command could not be started at all.
    fn run(&mut self, command: &str, working_dir: &Path, scope: Scope)
        -> std::io::Result<ExitStatus>;
}

/// Runs commands through the platform shell (`sh -c` / `cmd /C`).
///
/// Tool output is forwarded to our stderr so stdout stays reserved for
/// the orchestrator's own report (and stays valid JSON under `--json`).
#[derive(Debug, Default)]
pub struct ShellRunner;

impl ShellRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for ShellRunner {
    fn run(
        &mut self,
        command: &str,
        working_dir: &Path,
        scope: Scope,
    ) -> std::io::Result<ExitStatus> {
        tracing::debug!("[{scope}] {} $ {command}", working_dir.display());

        let mut cmd = shell_command(command);
        cmd.current_dir(working_dir).stdout(std::io::stderr());
        let status = cmd.status()?;

        Ok(status.into())
    }
}

#[cfg(windows)]
fn shell_command(command: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").arg(command);
    cmd
}

#[cfg(not(windows))]
fn shell_command(command: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command);
    cmd
}
