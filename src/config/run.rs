//! The run configuration file and its loader.

use std::fmt;
use std::fs;
use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;

use crate::error::BotError;
use crate::github::RepoDetails;
use crate::plugin::{Plugin, PluginCatalog, PluginSpec};
use crate::shell::ShellExecutor;
use crate::snapshot::DEFAULT_BUILD_COMMAND;

/// What a run does: repository, build, and ordered plugins.
#[derive(Clone, Default)]
pub struct RunConfiguration {
    /// Repository used when the CI environment does not name one.
    pub repo_details: Option<RepoDetails>,
    /// Command building a snapshot; see [`Self::build_command`].
    pub build_command: Option<String>,
    /// Branch checked out in the "before" snapshot instead of the default.
    pub override_base_branch: Option<String>,
    /// Login whose earlier comments are deleted before posting.
    pub bot_username: Option<String>,
    /// Plugins, run in this order.
    pub plugins: Vec<Arc<dyn Plugin>>,
}

impl RunConfiguration {
    /// The build command, or [`DEFAULT_BUILD_COMMAND`] when none is set.
    #[must_use]
    pub fn build_command(&self) -> &str {
        self.build_command
            .as_deref()
            .filter(|command| !command.trim().is_empty())
            .unwrap_or(DEFAULT_BUILD_COMMAND)
    }
}

impl fmt::Debug for RunConfiguration {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plugin_names: Vec<Option<&str>> =
            self.plugins.iter().map(|plugin| plugin.name()).collect();
        formatter
            .debug_struct("RunConfiguration")
            .field("repo_details", &self.repo_details)
            .field("build_command", &self.build_command)
            .field("override_base_branch", &self.override_base_branch)
            .field("bot_username", &self.bot_username)
            .field("plugins", &plugin_names)
            .finish()
    }
}

/// Schema of the TOML run configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// `[repo_details]` table.
    pub repo_details: Option<RepoDetails>,
    /// `build_command` key.
    pub build_command: Option<String>,
    /// `override_base_branch` key.
    pub override_base_branch: Option<String>,
    /// `bot_username` key.
    pub bot_username: Option<String>,
    /// `[[plugins]]` array.
    #[serde(default)]
    pub plugins: Vec<PluginSpec>,
}

impl ConfigFile {
    /// Parses TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`BotError::ConfigLoad`] on syntax errors, unknown keys, or
    /// unknown plugin kinds.
    pub fn parse(text: &str) -> Result<Self, BotError> {
        toml::from_str(text).map_err(|error| BotError::ConfigLoad {
            message: error.to_string(),
        })
    }

    /// Instantiates plugins through `catalog`.
    #[must_use]
    pub fn into_configuration(self, catalog: &PluginCatalog) -> RunConfiguration {
        RunConfiguration {
            repo_details: self.repo_details,
            build_command: self.build_command,
            override_base_branch: self.override_base_branch,
            bot_username: self.bot_username,
            plugins: catalog.instantiate_all(self.plugins),
        }
    }
}

/// Produces the run configuration at the start of a run.
pub trait ConfigSource: Send + Sync {
    /// Loads the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`BotError::ConfigNotFound`] or [`BotError::ConfigLoad`] when
    /// the configuration cannot be produced.
    fn load_configuration(&self) -> Result<RunConfiguration, BotError>;
}

impl ConfigSource for RunConfiguration {
    fn load_configuration(&self) -> Result<RunConfiguration, BotError> {
        Ok(self.clone())
    }
}

/// Reads a [`RunConfiguration`] from a TOML file.
pub struct ConfigLoader {
    path: Utf8PathBuf,
    catalog: PluginCatalog,
}

impl ConfigLoader {
    /// Creates a loader for `path` whose command plugins use `shell`.
    #[must_use]
    pub fn new(path: impl Into<Utf8PathBuf>, shell: Arc<dyn ShellExecutor>) -> Self {
        Self {
            path: path.into(),
            catalog: PluginCatalog::new(shell),
        }
    }

    /// The configuration file path.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Reads and parses the file.
    ///
    /// Plugin names and repository details are not validated here.
    ///
    /// # Errors
    ///
    /// Returns [`BotError::ConfigNotFound`] when the file cannot be accessed
    /// and [`BotError::ConfigLoad`] when it cannot be read or parsed.
    pub fn load(&self) -> Result<RunConfiguration, BotError> {
        if fs::metadata(&self.path).is_err() {
            return Err(BotError::ConfigNotFound {
                path: self.path.clone(),
            });
        }

        let text = fs::read_to_string(&self.path).map_err(|error| BotError::ConfigLoad {
            message: error.to_string(),
        })?;
        let file = ConfigFile::parse(&text)?;
        tracing::debug!(
            "loaded {} plugin entries from '{}'",
            file.plugins.len(),
            self.path
        );
        Ok(file.into_configuration(&self.catalog))
    }
}

impl ConfigSource for ConfigLoader {
    fn load_configuration(&self) -> Result<RunConfiguration, BotError> {
        self.load()
    }
}
