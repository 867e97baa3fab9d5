//! Sequential plugin execution and result aggregation.

use std::sync::Arc;

use super::{Plugin, PluginResult};
use crate::error::BotError;
use crate::snapshot::SnapshotPair;

/// Plugin results keyed by plugin name, in pipeline order.
///
/// Inserting a name that is already present replaces the earlier result but
/// keeps its position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregatedReport {
    entries: Vec<(String, PluginResult)>,
}

impl AggregatedReport {
    /// Stores `result` under `name`, returning the result it replaced.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        result: PluginResult,
    ) -> Option<PluginResult> {
        let key = name.into();
        if let Some(slot) = self
            .entries
            .iter_mut()
            .find(|(existing, _)| *existing == key)
        {
            return Some(std::mem::replace(&mut slot.1, result));
        }
        self.entries.push((key, result));
        None
    }

    /// Looks up the result stored for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&PluginResult> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, result)| result)
    }

    /// Iterates over `(name, result)` pairs in pipeline order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PluginResult)> {
        self.entries
            .iter()
            .map(|(name, result)| (name.as_str(), result))
    }

    /// Number of distinct plugin names.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no plugin produced a result.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether any result asks to fail the pull request.
    #[must_use]
    pub fn fail_pr(&self) -> bool {
        self.entries.iter().any(|(_, result)| result.fail_pr)
    }
}

/// Runs plugins one after another over a snapshot pair.
pub struct PluginPipeline<'plugins> {
    plugins: &'plugins [Arc<dyn Plugin>],
}

impl<'plugins> PluginPipeline<'plugins> {
    /// Creates a pipeline over `plugins`, which run in slice order.
    #[must_use]
    pub const fn new(plugins: &'plugins [Arc<dyn Plugin>]) -> Self {
        Self { plugins }
    }

    /// Runs every plugin against `snapshots`.
    ///
    /// # Errors
    ///
    /// Returns [`BotError::PluginNameMissing`] when a plugin has no name and
    /// [`BotError::PluginExecution`] when a plugin fails. Plugins after the
    /// failing one are not run and no partial report is returned.
    pub async fn run(&self, snapshots: &SnapshotPair) -> Result<AggregatedReport, BotError> {
        let mut report = AggregatedReport::default();
        tracing::info!("Running Plugins....");

        for plugin in self.plugins {
            let name = plugin.name().ok_or(BotError::PluginNameMissing)?;
            tracing::info!("  {name}");

            let result = plugin
                .run(snapshots)
                .await
                .map_err(|error| BotError::PluginExecution {
                    name: name.to_owned(),
                    message: error.message().to_owned(),
                })?;

            if report.insert(name, result).is_some() {
                tracing::warn!(
                    "plugin name '{name}' is used more than once; keeping the last result"
                );
            }
        }

        Ok(report)
    }
}
