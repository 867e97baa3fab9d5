//! Checkouts of the base branch and the pull request head.
//!
//! The builder clones the repository into fresh directories under a shared
//! temporary root and runs the build command in each. A failing base-branch
//! build is logged and ignored; a failing pull request build aborts the run.
//! Directories are left in place after the run.

use std::env;
use std::fs;

use camino::{Utf8Path, Utf8PathBuf};

use crate::ci::CiState;
use crate::config::RunConfiguration;
use crate::error::BotError;
use crate::github::SourceHostClient;
use crate::shell::{ShellCommand, ShellExecutor};

/// Build command used when the configuration does not set one.
pub const DEFAULT_BUILD_COMMAND: &str = "npm install && npm run build";

/// Stand-in "after" path used when there is no pull request head to check out.
pub const CURRENT_DIR_MARKER: &str = ".";

const TEMP_DIR_NAME: &str = "pr-bot";
const SNAPSHOT_PREFIX: &str = "snapshot-";

/// Paths of the two builds compared by plugins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotPair {
    before: Utf8PathBuf,
    after: Utf8PathBuf,
}

impl SnapshotPair {
    /// Creates a pair from explicit paths.
    #[must_use]
    pub fn new(before: impl Into<Utf8PathBuf>, after: impl Into<Utf8PathBuf>) -> Self {
        Self {
            before: before.into(),
            after: after.into(),
        }
    }

    /// The base branch build.
    #[must_use]
    pub fn before_path(&self) -> &Utf8Path {
        &self.before
    }

    /// The pull request build, or `.` for local runs.
    #[must_use]
    pub fn after_path(&self) -> &Utf8Path {
        &self.after
    }

    /// Whether "after" is the caller's working directory.
    #[must_use]
    pub fn uses_current_dir(&self) -> bool {
        self.after.as_str() == CURRENT_DIR_MARKER
    }
}

/// The temporary root used when none is configured: `$TMPDIR/pr-bot`.
#[must_use]
pub fn default_temp_root() -> Utf8PathBuf {
    Utf8PathBuf::from_path_buf(env::temp_dir())
        .unwrap_or_else(|_| Utf8PathBuf::from("/tmp"))
        .join(TEMP_DIR_NAME)
}

/// Materialises the before/after snapshots for a run.
pub struct SnapshotBuilder<'deps> {
    host: &'deps dyn SourceHostClient,
    shell: &'deps dyn ShellExecutor,
    temp_root: Utf8PathBuf,
}

impl<'deps> SnapshotBuilder<'deps> {
    /// Creates a builder using the default temporary root.
    #[must_use]
    pub fn new(host: &'deps dyn SourceHostClient, shell: &'deps dyn ShellExecutor) -> Self {
        Self {
            host,
            shell,
            temp_root: default_temp_root(),
        }
    }

    /// Places snapshot directories under `root` instead.
    #[must_use]
    pub fn with_temp_root(mut self, root: impl Into<Utf8PathBuf>) -> Self {
        self.temp_root = root.into();
        self
    }

    /// Clones, checks out, and builds both snapshots.
    ///
    /// When the CI state has no pull request SHA, only the base branch is
    /// cloned and built and the current directory stands in for "after".
    ///
    /// # Errors
    ///
    /// Returns [`BotError::GitHub`] when repository metadata cannot be
    /// fetched, [`BotError::Shell`] when a clone or checkout fails,
    /// [`BotError::AfterBuildFailed`] when the pull request build fails, and
    /// [`BotError::Io`] when snapshot directories cannot be created.
    pub async fn build(
        &self,
        config: &RunConfiguration,
        ci_state: &CiState,
    ) -> Result<SnapshotPair, BotError> {
        fs::create_dir_all(&self.temp_root)
            .map_err(|error| BotError::io("create snapshot root", &error))?;

        let clone_url = self.host.repo_details().await?.clone_url;
        let build_command = config.build_command();

        let before = self.fresh_dir()?;
        tracing::info!("Cloning default branch into: '{before}'.");
        self.clone_into(&clone_url, &before).await?;

        if let Some(branch) = config.override_base_branch.as_deref() {
            self.checkout(branch, &before).await?;
        }

        let Some(sha) = ci_state.pull_request_sha.as_deref() else {
            tracing::warn!(
                "No SHA environment variable, so using the current directory for further testing."
            );
            tracing::info!("Building the before version with: '{build_command}'.");
            self.build_before(build_command, &before).await;
            return Ok(SnapshotPair::new(before, CURRENT_DIR_MARKER));
        };

        let after = self.fresh_dir()?;
        tracing::info!("Cloning pull request head into: '{after}'.");
        self.clone_into(&clone_url, &after).await?;
        self.checkout(sha, &after).await?;

        tracing::info!("Building before and after versions with: '{build_command}'.");
        self.build_before(build_command, &before).await;
        self.shell
            .exec(&ShellCommand::new(build_command).in_dir(after.as_path()))
            .await
            .map_err(|error| {
                tracing::error!("Unable to run '{build_command}' in the \"after\" version.");
                BotError::AfterBuildFailed {
                    command: build_command.to_owned(),
                    message: error.to_string(),
                }
            })?;

        Ok(SnapshotPair::new(before, after))
    }

    fn fresh_dir(&self) -> Result<Utf8PathBuf, BotError> {
        let dir = tempfile::Builder::new()
            .prefix(SNAPSHOT_PREFIX)
            .tempdir_in(&self.temp_root)
            .map_err(|error| BotError::io("create snapshot directory", &error))?;
        Utf8PathBuf::from_path_buf(dir.keep()).map_err(|path| BotError::Io {
            message: format!("snapshot path is not UTF-8: {}", path.display()),
        })
    }

    async fn clone_into(&self, clone_url: &str, dir: &Utf8Path) -> Result<(), BotError> {
        self.shell
            .exec(&ShellCommand::program(
                "git",
                ["clone", clone_url, dir.as_str()],
            ))
            .await?;
        Ok(())
    }

    async fn checkout(&self, revision: &str, dir: &Utf8Path) -> Result<(), BotError> {
        self.shell
            .exec(&ShellCommand::program("git", ["checkout", revision]).in_dir(dir))
            .await?;
        Ok(())
    }

    async fn build_before(&self, build_command: &str, before: &Utf8Path) {
        let command = ShellCommand::new(build_command).in_dir(before);
        if let Err(error) = self.shell.exec(&command).await {
            tracing::error!("Unable to run '{build_command}' in the \"before\" version: {error}");
        }
    }
}
