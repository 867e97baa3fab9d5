//! The end-to-end run.
//!
//! [`Bot::run`] loads the configuration, reads the CI environment, builds the
//! snapshots, runs the plugins, and reports. Every step is awaited in turn
//! and the first error ends the run.

use camino::Utf8PathBuf;

use crate::ci::{CiEnvironment, CiState};
use crate::config::ConfigSource;
use crate::error::BotError;
use crate::github::{RepoDetails, SourceHostConnector};
use crate::plugin::PluginPipeline;
use crate::report::{ResultReporter, RunOutcome};
use crate::shell::ShellExecutor;
use crate::snapshot::SnapshotBuilder;

/// Runs the bot once against injected collaborators.
pub struct Bot<'deps> {
    config: &'deps dyn ConfigSource,
    ci: &'deps dyn CiEnvironment,
    connector: &'deps dyn SourceHostConnector,
    shell: &'deps dyn ShellExecutor,
    temp_root: Option<Utf8PathBuf>,
}

impl<'deps> Bot<'deps> {
    /// Creates a bot from its collaborators.
    #[must_use]
    pub const fn new(
        config: &'deps dyn ConfigSource,
        ci: &'deps dyn CiEnvironment,
        connector: &'deps dyn SourceHostConnector,
        shell: &'deps dyn ShellExecutor,
    ) -> Self {
        Self {
            config,
            ci,
            connector,
            shell,
            temp_root: None,
        }
    }

    /// Places snapshots under `root` rather than `$TMPDIR/pr-bot`.
    #[must_use]
    pub fn with_temp_root(mut self, root: impl Into<Utf8PathBuf>) -> Self {
        self.temp_root = Some(root.into());
        self
    }

    /// Performs one run.
    ///
    /// # Errors
    ///
    /// Returns [`BotError::MissingRepoDetails`] when neither the CI
    /// environment nor the configuration names the repository, and otherwise
    /// propagates the first error raised by configuration loading, snapshot
    /// creation, a plugin, or reporting.
    pub async fn run(&self) -> Result<RunOutcome, BotError> {
        let config = self.config.load_configuration()?;
        let ci_state = CiState::capture(self.ci);
        let repo = resolve_repo_details(&ci_state, config.repo_details.as_ref())?;
        tracing::info!("Running pr-bot for {repo}.");

        let host = self.connector.connect(&repo)?;

        let mut builder = SnapshotBuilder::new(host.as_ref(), self.shell);
        if let Some(root) = &self.temp_root {
            builder = builder.with_temp_root(root.clone());
        }
        let snapshots = builder.build(&config, &ci_state).await?;

        let report = PluginPipeline::new(&config.plugins)
            .run(&snapshots)
            .await?;

        ResultReporter::new(host.as_ref())
            .report(&config, &ci_state, &report)
            .await
    }
}

/// Prefers the CI environment's repository over the configured one.
fn resolve_repo_details(
    ci_state: &CiState,
    configured: Option<&RepoDetails>,
) -> Result<RepoDetails, BotError> {
    ci_state
        .repo_details
        .clone()
        .or_else(|| configured.cloned())
        .ok_or(BotError::MissingRepoDetails)
}
