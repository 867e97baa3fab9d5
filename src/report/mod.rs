//! Publishing plugin results.
//!
//! Outside a pull request build the results are rendered as a console log
//! and nothing is sent to GitHub. Inside one, earlier bot comments are
//! removed, a markdown comment is posted, and the head commit receives a
//! status.

use crate::ci::CiState;
use crate::config::RunConfiguration;
use crate::error::BotError;
use crate::github::{CommitState, PullRequestNumber, SourceHostClient};
use crate::plugin::AggregatedReport;

const NO_LOG_OUTPUT: &str = "This plugin provided no log output.";
const NO_MARKDOWN_OUTPUT: &str = "This plugin provided no markdown output.";

/// What the reporter did with the results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Not a pull request build; the rendered console log.
    LocalLog(String),
    /// A comment and commit status were posted.
    Published {
        /// Status posted for the head commit.
        state: CommitState,
    },
}

/// Renders the console log shown for local runs.
#[must_use]
pub fn render_local_log(report: &AggregatedReport) -> String {
    let mut log = String::from("Results from plugins\n");
    for (name, result) in report.iter() {
        push_line(&mut log, &format!("  {name}"));
        match result.pretty_log.as_deref() {
            Some(pretty) => {
                log.push('\n');
                push_line(&mut log, pretty);
                log.push('\n');
            }
            None => push_line(&mut log, &format!("    {NO_LOG_OUTPUT}")),
        }
    }
    log
}

fn push_line(buffer: &mut String, line: &str) {
    buffer.push_str(line);
    buffer.push('\n');
}

/// Renders the pull request comment body.
#[must_use]
pub fn render_comment(report: &AggregatedReport) -> String {
    report
        .iter()
        .fold(String::new(), |mut comment, (name, result)| {
            let markdown = result.markdown_log.as_deref().unwrap_or(NO_MARKDOWN_OUTPUT);
            comment.push_str(&format!("### {name}\n\n{markdown}\n\n"));
            comment
        })
}

/// Sends results to the console or the pull request.
pub struct ResultReporter<'deps> {
    host: &'deps dyn SourceHostClient,
}

impl<'deps> ResultReporter<'deps> {
    /// Creates a reporter publishing through `host`.
    #[must_use]
    pub const fn new(host: &'deps dyn SourceHostClient) -> Self {
        Self { host }
    }

    /// Reports `report` for the current build.
    ///
    /// Pull request builds delete earlier comments by the configured bot
    /// user (when one is set), post the comment, then post the status, in
    /// that order. The first failing call aborts the rest.
    ///
    /// # Errors
    ///
    /// Returns [`BotError::MissingPullRequestContext`] or
    /// [`BotError::InvalidPullRequestNumber`] when the CI state cannot
    /// identify the pull request, and [`BotError::GitHub`] when a GitHub call
    /// fails.
    pub async fn report(
        &self,
        config: &RunConfiguration,
        ci_state: &CiState,
        report: &AggregatedReport,
    ) -> Result<RunOutcome, BotError> {
        if !ci_state.is_pull_request_build() {
            return Ok(RunOutcome::LocalLog(render_local_log(report)));
        }

        let number = ci_state
            .pull_request_number
            .as_deref()
            .ok_or(BotError::MissingPullRequestContext { field: "number" })
            .and_then(PullRequestNumber::parse)?;
        let sha = ci_state
            .pull_request_sha
            .as_deref()
            .ok_or(BotError::MissingPullRequestContext { field: "SHA" })?;

        if let Some(bot_username) = config.bot_username.as_deref() {
            tracing::info!("Removing earlier comments by '{bot_username}'.");
            self.host
                .delete_previous_issue_comments(number, bot_username)
                .await?;
        }

        tracing::info!("Posting results to pull request #{number}.");
        self.host
            .post_issue_comment(number, &render_comment(report))
            .await?;

        let state = CommitState::from_fail_flag(report.fail_pr());
        self.host.post_state(sha, state).await?;
        Ok(RunOutcome::Published { state })
    }
}
