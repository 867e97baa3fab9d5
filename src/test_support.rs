//! Recording fakes for exercising a run without processes or plugins.
//!
//! ```
//! use pr_bot::test_support::RecordingShell;
//!
//! let shell = RecordingShell::new().failing_when(|command| command.line() == "make");
//! assert!(shell.lines().is_empty());
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;

use crate::plugin::{Plugin, PluginError, PluginResult};
use crate::shell::{CommandOutput, ShellCommand, ShellError, ShellExecutor};
use crate::snapshot::SnapshotPair;

type CommandMatcher = Box<dyn Fn(&ShellCommand) -> bool + Send + Sync>;

/// A [`ShellExecutor`] that records commands instead of running them.
///
/// Every command succeeds with empty output unless a matcher registered with
/// [`RecordingShell::failing_when`] selects it.
#[derive(Default)]
pub struct RecordingShell {
    commands: Mutex<Vec<ShellCommand>>,
    failures: Vec<CommandMatcher>,
}

impl RecordingShell {
    /// Creates a shell where every command succeeds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes commands selected by `matcher` exit with status 1.
    #[must_use]
    pub fn failing_when(
        mut self,
        matcher: impl Fn(&ShellCommand) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.failures.push(Box::new(matcher));
        self
    }

    /// Commands received so far, in order.
    #[must_use]
    pub fn commands(&self) -> Vec<ShellCommand> {
        self.commands
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Command lines received so far, in order.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.commands()
            .iter()
            .map(|command| command.line().to_owned())
            .collect()
    }
}

#[async_trait]
impl ShellExecutor for RecordingShell {
    async fn exec(&self, command: &ShellCommand) -> Result<CommandOutput, ShellError> {
        self.commands
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(command.clone());

        if self.failures.iter().any(|matcher| matcher(command)) {
            return Err(ShellError::NonZeroExit {
                command: command.line().to_owned(),
                status: "exit status: 1".to_owned(),
                stdout: String::new(),
                stderr: "simulated failure".to_owned(),
            });
        }
        Ok(CommandOutput::default())
    }
}

/// Shared log of plugin names in the order they ran.
pub type RunLog = Arc<Mutex<Vec<String>>>;

/// A [`Plugin`] returning a fixed outcome.
pub struct StaticPlugin {
    name: Option<String>,
    outcome: Result<PluginResult, PluginError>,
    runs: Arc<AtomicUsize>,
    run_log: Option<RunLog>,
}

impl StaticPlugin {
    /// A named plugin that returns `result`.
    #[must_use]
    pub fn named(name: impl Into<String>, result: PluginResult) -> Self {
        Self::with_outcome(Some(name.into()), Ok(result))
    }

    /// A plugin without a name.
    #[must_use]
    pub fn unnamed(result: PluginResult) -> Self {
        Self::with_outcome(None, Ok(result))
    }

    /// A named plugin whose run fails with `message`.
    #[must_use]
    pub fn failing(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::with_outcome(Some(name.into()), Err(PluginError::new(message)))
    }

    fn with_outcome(name: Option<String>, outcome: Result<PluginResult, PluginError>) -> Self {
        Self {
            name,
            outcome,
            runs: Arc::new(AtomicUsize::new(0)),
            run_log: None,
        }
    }

    /// Appends the plugin's name to `log` each time it runs.
    #[must_use]
    pub fn logging_to(mut self, log: &RunLog) -> Self {
        self.run_log = Some(Arc::clone(log));
        self
    }

    /// Counter of completed `run` calls, shared with the plugin.
    #[must_use]
    pub fn run_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.runs)
    }

    /// Wraps the plugin for use in a configuration.
    #[must_use]
    pub fn shared(self) -> Arc<dyn Plugin> {
        Arc::new(self)
    }
}

#[async_trait]
impl Plugin for StaticPlugin {
    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    async fn run(&self, _snapshots: &SnapshotPair) -> Result<PluginResult, PluginError> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        if let Some(log) = &self.run_log {
            log.lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(self.name.clone().unwrap_or_default());
        }
        self.outcome.clone()
    }
}
