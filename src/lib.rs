//! pr-bot compares a pull request against its base branch and reports the
//! results.
//!
//! A run clones the repository twice, builds the base branch ("before") and
//! the pull request head ("after"), and hands both directories to an ordered
//! list of plugins. Outside a pull request build the plugin output is
//! rendered as a console log. Inside one, the bot posts a markdown comment on
//! the pull request and a commit status on its head.
//!
//! The run is driven by [`Bot`], which receives every collaborator as a
//! trait object: [`config::ConfigSource`], [`ci::CiEnvironment`],
//! [`github::SourceHostConnector`], and [`shell::ShellExecutor`].

pub mod bot;
pub mod ci;
pub mod config;
pub mod error;
pub mod github;
pub mod plugin;
pub mod report;
pub mod shell;
pub mod snapshot;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use bot::Bot;
pub use ci::{CiEnvironment, CiProvider, CiState, EnvSnapshot, ProcessEnv, ProviderEnvironment};
pub use config::{BotCliConfig, ConfigLoader, RunConfiguration};
pub use error::BotError;
pub use github::{OctocrabConnector, RepoDetails};
pub use plugin::{Plugin, PluginError, PluginResult};
pub use report::RunOutcome;
pub use shell::SystemShell;
pub use snapshot::SnapshotPair;
