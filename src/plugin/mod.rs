//! Plugins compare the "before" and "after" snapshots of a pull request.
//!
//! A plugin receives both snapshot paths and returns a [`PluginResult`]
//! carrying optional console and markdown output plus a flag asking the bot
//! to fail the pull request. The [`PluginPipeline`] runs plugins strictly in
//! order and stops at the first failure.

mod command;
mod file_size;
mod pipeline;

use std::sync::Arc;

use async_trait::async_trait;
use camino::Utf8PathBuf;
use serde::Deserialize;
use thiserror::Error;

pub use command::CommandPlugin;
pub use file_size::FileSizePlugin;
pub use pipeline::{AggregatedReport, PluginPipeline};

use crate::shell::ShellExecutor;
use crate::snapshot::SnapshotPair;

/// Failure reported by a plugin.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct PluginError {
    message: String,
}

impl PluginError {
    /// Creates a plugin error with `message`.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The error message.
    #[must_use]
    pub const fn message(&self) -> &str {
        self.message.as_str()
    }
}

/// Output of a single plugin run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PluginResult {
    /// Console output shown for local runs.
    pub pretty_log: Option<String>,
    /// Markdown shown in the pull request comment.
    pub markdown_log: Option<String>,
    /// Whether this result should fail the pull request.
    pub fail_pr: bool,
    /// Plugin-specific data the bot does not inspect.
    pub details: serde_json::Value,
}

impl PluginResult {
    /// Sets the console output.
    #[must_use]
    pub fn with_pretty_log(mut self, log: impl Into<String>) -> Self {
        self.pretty_log = Some(log.into());
        self
    }

    /// Sets the markdown output.
    #[must_use]
    pub fn with_markdown_log(mut self, log: impl Into<String>) -> Self {
        self.markdown_log = Some(log.into());
        self
    }

    /// Sets the fail flag.
    #[must_use]
    pub const fn failing(mut self, fail_pr: bool) -> Self {
        self.fail_pr = fail_pr;
        self
    }
}

/// A named comparison run against the two snapshots.
#[async_trait]
pub trait Plugin: Send + Sync {
    /// Name used as the report heading. Plugins without a name abort the
    /// pipeline.
    fn name(&self) -> Option<&str>;

    /// Compares the snapshots.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError`] when the comparison cannot be completed.
    async fn run(&self, snapshots: &SnapshotPair) -> Result<PluginResult, PluginError>;
}

/// Declarative plugin entry in the run configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case", deny_unknown_fields)]
pub enum PluginSpec {
    /// Runs a shell command in the "after" snapshot.
    Command {
        /// Report heading.
        name: Option<String>,
        /// Command line passed to `sh -c`.
        command: String,
        /// Whether a non-zero exit fails the pull request.
        #[serde(default = "fail_pr_on_error_default")]
        fail_pr_on_error: bool,
    },
    /// Compares file sizes between the snapshots.
    FileSize {
        /// Report heading.
        name: Option<String>,
        /// Paths relative to each snapshot root.
        files: Vec<Utf8PathBuf>,
        /// Largest growth in bytes accepted for any file.
        max_increase_bytes: Option<u64>,
    },
}

const fn fail_pr_on_error_default() -> bool {
    true
}

/// Turns declarative [`PluginSpec`] entries into runnable plugins.
#[derive(Clone)]
pub struct PluginCatalog {
    shell: Arc<dyn ShellExecutor>,
}

impl PluginCatalog {
    /// Creates a catalog whose command plugins run through `shell`.
    #[must_use]
    pub const fn new(shell: Arc<dyn ShellExecutor>) -> Self {
        Self { shell }
    }

    /// Instantiates the plugin described by `spec`.
    #[must_use]
    pub fn instantiate(&self, spec: PluginSpec) -> Arc<dyn Plugin> {
        match spec {
            PluginSpec::Command {
                name,
                command,
                fail_pr_on_error,
            } => Arc::new(CommandPlugin::new(
                name,
                command,
                fail_pr_on_error,
                Arc::clone(&self.shell),
            )),
            PluginSpec::FileSize {
                name,
                files,
                max_increase_bytes,
            } => Arc::new(FileSizePlugin::new(name, files, max_increase_bytes)),
        }
    }

    /// Instantiates every entry, preserving order.
    #[must_use]
    pub fn instantiate_all(&self, specs: Vec<PluginSpec>) -> Vec<Arc<dyn Plugin>> {
        specs
            .into_iter()
            .map(|spec| self.instantiate(spec))
            .collect()
    }
}
