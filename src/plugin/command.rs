//! Plugin that runs a shell command against the snapshots.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use super::{Plugin, PluginError, PluginResult};
use crate::shell::{CommandOutput, ShellCommand, ShellError, ShellExecutor};
use crate::snapshot::SnapshotPair;

/// Environment variable holding the "before" snapshot path.
pub const BEFORE_PATH_VAR: &str = "PR_BOT_BEFORE_PATH";
/// Environment variable holding the "after" snapshot path.
pub const AFTER_PATH_VAR: &str = "PR_BOT_AFTER_PATH";

/// Runs a command inside the "after" snapshot and reports its output.
///
/// Both snapshot paths are exported to the command. A non-zero exit becomes
/// a result (optionally failing the pull request) rather than a plugin error,
/// so the output still reaches the report.
pub struct CommandPlugin {
    name: Option<String>,
    command: String,
    fail_pr_on_error: bool,
    shell: Arc<dyn ShellExecutor>,
}

impl CommandPlugin {
    /// Creates a command plugin.
    #[must_use]
    pub fn new(
        name: Option<String>,
        command: impl Into<String>,
        fail_pr_on_error: bool,
        shell: Arc<dyn ShellExecutor>,
    ) -> Self {
        Self {
            name,
            command: command.into(),
            fail_pr_on_error,
            shell,
        }
    }

    fn success_result(&self, output: &CommandOutput) -> PluginResult {
        let stdout = output.stdout.trim_end();
        let mut result = PluginResult {
            details: json!({ "command": self.command, "success": true }),
            ..PluginResult::default()
        };
        if !stdout.is_empty() {
            result = result
                .with_pretty_log(stdout)
                .with_markdown_log(fenced(stdout));
        }
        result
    }

    fn failure_result(&self, status: &str, stdout: &str, stderr: &str) -> PluginResult {
        let combined = [stdout.trim_end(), stderr.trim_end()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("\n");
        let summary = format!("`{}` exited with {status}.", self.command);
        let markdown = if combined.is_empty() {
            summary
        } else {
            format!("{summary}\n\n{}", fenced(&combined))
        };

        PluginResult {
            details: json!({ "command": self.command, "success": false, "status": status }),
            ..PluginResult::default()
        }
        .with_pretty_log(if combined.is_empty() {
            format!("exited with {status}")
        } else {
            combined
        })
        .with_markdown_log(markdown)
        .failing(self.fail_pr_on_error)
    }
}

fn fenced(text: &str) -> String {
    format!("```\n{text}\n```")
}

#[async_trait]
impl Plugin for CommandPlugin {
    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    async fn run(&self, snapshots: &SnapshotPair) -> Result<PluginResult, PluginError> {
        let command = ShellCommand::new(self.command.as_str())
            .in_dir(snapshots.after_path())
            .with_env(BEFORE_PATH_VAR, snapshots.before_path().as_str())
            .with_env(AFTER_PATH_VAR, snapshots.after_path().as_str());

        match self.shell.exec(&command).await {
            Ok(output) => Ok(self.success_result(&output)),
            Err(ShellError::NonZeroExit {
                status,
                stdout,
                stderr,
                ..
            }) => Ok(self.failure_result(&status, &stdout, &stderr)),
            Err(error @ ShellError::Spawn { .. }) => Err(PluginError::new(error.to_string())),
        }
    }
}
