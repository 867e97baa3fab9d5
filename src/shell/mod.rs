//! Shell command execution used for git and build steps.
//!
//! Configured build and plugin commands are passed to `sh -c` so they can use
//! shell syntax such as `&&`. Commands assembled from paths, URLs, and
//! revisions are spawned directly from an argument vector and never reach a
//! shell. The trait lets tests record the exact command sequence without
//! spawning processes.

use std::process::Stdio;

use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;
use tokio::process::Command;

/// Errors raised while running a shell command.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ShellError {
    /// The shell process could not be started.
    #[error("failed to launch '{command}': {message}")]
    Spawn {
        /// Command line that was attempted.
        command: String,
        /// Error detail from the operating system.
        message: String,
    },

    /// The command ran but exited unsuccessfully.
    #[error("'{command}' exited with {status}: {stderr}")]
    NonZeroExit {
        /// Command line that failed.
        command: String,
        /// Exit status description (code or signal).
        status: String,
        /// Captured standard output.
        stdout: String,
        /// Captured standard error.
        stderr: String,
    },
}

/// A command line plus the context it runs in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellCommand {
    line: String,
    argv: Option<Vec<String>>,
    cwd: Option<Utf8PathBuf>,
    env: Vec<(String, String)>,
}

impl ShellCommand {
    /// Creates a command that runs in the current working directory.
    #[must_use]
    pub fn new(line: impl Into<String>) -> Self {
        Self {
            line: line.into(),
            argv: None,
            cwd: None,
            env: Vec::new(),
        }
    }

    /// Creates a command that spawns `program` with `args` and no shell.
    ///
    /// Each argument reaches the program unchanged, whitespace included.
    /// [`ShellCommand::line`] renders the arguments space-separated for
    /// logging.
    #[must_use]
    pub fn program<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let argv: Vec<String> = std::iter::once(program.into())
            .chain(args.into_iter().map(Into::into))
            .collect();
        Self {
            line: argv.join(" "),
            argv: Some(argv),
            cwd: None,
            env: Vec::new(),
        }
    }

    /// Runs the command inside `dir`.
    #[must_use]
    pub fn in_dir(mut self, dir: impl Into<Utf8PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Exports an extra environment variable to the command.
    #[must_use]
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// The command line passed to the shell, or the rendered argument
    /// vector for [`ShellCommand::program`] commands.
    #[must_use]
    pub const fn line(&self) -> &str {
        self.line.as_str()
    }

    /// Program and arguments when the command bypasses the shell.
    #[must_use]
    pub fn argv(&self) -> Option<&[String]> {
        self.argv.as_deref()
    }

    /// Working directory, if one was set.
    #[must_use]
    pub fn cwd(&self) -> Option<&Utf8Path> {
        self.cwd.as_deref()
    }

    /// Extra environment variables.
    #[must_use]
    pub fn env(&self) -> &[(String, String)] {
        &self.env
    }
}

/// Output captured from a successful command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Standard output, lossily decoded.
    pub stdout: String,
    /// Standard error, lossily decoded.
    pub stderr: String,
}

/// Runs shell commands on behalf of the bot.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ShellExecutor: Send + Sync {
    /// Runs `command` to completion.
    ///
    /// # Errors
    ///
    /// Returns [`ShellError::Spawn`] when the shell cannot be started and
    /// [`ShellError::NonZeroExit`] when the command exits unsuccessfully.
    async fn exec(&self, command: &ShellCommand) -> Result<CommandOutput, ShellError>;
}

/// Executes commands using Tokio's process support.
///
/// Plain command lines go through `sh -c`; [`ShellCommand::program`]
/// commands are spawned directly.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemShell;

fn base_process(command: &ShellCommand) -> Command {
    match command.argv() {
        Some([program, args @ ..]) => {
            let mut process = Command::new(program);
            process.args(args);
            process
        }
        _ => {
            let mut process = Command::new("sh");
            process.arg("-c").arg(command.line());
            process
        }
    }
}

#[async_trait]
impl ShellExecutor for SystemShell {
    async fn exec(&self, command: &ShellCommand) -> Result<CommandOutput, ShellError> {
        let mut process = base_process(command);
        process
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = command.cwd() {
            process.current_dir(dir);
        }
        for (key, value) in command.env() {
            process.env(key, value);
        }

        tracing::debug!("running '{}'", command.line());
        let output = process.output().await.map_err(|error| ShellError::Spawn {
            command: command.line().to_owned(),
            message: error.to_string(),
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if output.status.success() {
            Ok(CommandOutput { stdout, stderr })
        } else {
            Err(ShellError::NonZeroExit {
                command: command.line().to_owned(),
                status: output.status.to_string(),
                stdout,
                stderr: stderr.trim_end().to_owned(),
            })
        }
    }
}
