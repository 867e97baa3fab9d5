//! Top-level error type for a pr-bot run.
//!
//! Every stage of a run reports failures as a [`BotError`]. Errors propagate
//! unchanged to the binary, which prints them and exits with a failure status.

use camino::Utf8PathBuf;
use thiserror::Error;

use crate::github::GitHubError;
use crate::shell::ShellError;

/// Errors that abort a pr-bot run.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BotError {
    /// The run configuration file could not be accessed.
    #[error("Unable to find the config file: '{path}'.")]
    ConfigNotFound {
        /// Path that was looked up.
        path: Utf8PathBuf,
    },

    /// The run configuration file exists but could not be evaluated.
    #[error("A problem occurred running the config file. {message}")]
    ConfigLoad {
        /// Parser or schema detail.
        message: String,
    },

    /// Neither the CI environment nor the configuration names the repository.
    #[error(
        "Unable to get the Github 'repoDetails' from CI environment variable or the \
         configuration file."
    )]
    MissingRepoDetails,

    /// A configured plugin did not declare a name.
    #[error(
        "One of the plugins has failed to define a name property. This is required for \
         reporting."
    )]
    PluginNameMissing,

    /// A plugin reported a failure while running.
    #[error("The '{name}' threw an error while running: '{message}'")]
    PluginExecution {
        /// Declared plugin name.
        name: String,
        /// Message of the underlying plugin error.
        message: String,
    },

    /// The build command failed in the pull request snapshot.
    #[error("Unable to run '{command}' in the \"after\" version: {message}")]
    AfterBuildFailed {
        /// Build command that was run.
        command: String,
        /// Failure detail from the shell.
        message: String,
    },

    /// The `--ci` value does not name a supported provider.
    #[error("unsupported CI service '{name}' (expected 'travis' or 'circleci')")]
    UnknownCiProvider {
        /// Value supplied on the command line or in the environment.
        name: String,
    },

    /// Reporting to a pull request needs a value the CI environment lacks.
    #[error("the CI environment does not provide the pull request {field}")]
    MissingPullRequestContext {
        /// Name of the missing field.
        field: &'static str,
    },

    /// The pull request number is not a positive integer.
    #[error("pull request number must be a positive integer, got '{value}'")]
    InvalidPullRequestNumber {
        /// Raw value from the CI environment.
        value: String,
    },

    /// Command-line or environment configuration could not be loaded.
    #[error("configuration error: {message}")]
    Configuration {
        /// Details about the configuration failure.
        message: String,
    },

    /// Local I/O operation failed.
    #[error("I/O error: {message}")]
    Io {
        /// Error detail from the underlying I/O operation.
        message: String,
    },

    /// A shell command (clone, checkout) failed.
    #[error(transparent)]
    Shell(#[from] ShellError),

    /// The GitHub API rejected a request.
    #[error(transparent)]
    GitHub(#[from] GitHubError),
}

impl BotError {
    pub(crate) fn io(context: &str, error: &std::io::Error) -> Self {
        Self::Io {
            message: format!("{context}: {error}"),
        }
    }
}
