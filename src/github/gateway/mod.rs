//! Gateways for talking to GitHub through Octocrab.
//!
//! The run controller only sees the [`SourceHostClient`] and
//! [`SourceHostConnector`] traits; the Octocrab implementations handle real
//! HTTP requests.

mod client;
mod error_mapping;
mod source_host;

pub use client::{DEFAULT_API_BASE, OctocrabConnector};
pub use source_host::OctocrabSourceHost;

use async_trait::async_trait;

use crate::github::error::GitHubError;
use crate::github::models::{CommitState, PullRequestNumber, RepoDetails, RepositoryMetadata};

/// Operations the bot performs against the hosted repository.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SourceHostClient: Send + Sync {
    /// Fetch repository metadata, including the clone URL.
    async fn repo_details(&self) -> Result<RepositoryMetadata, GitHubError>;

    /// Delete every issue comment on the pull request authored by `bot_name`.
    async fn delete_previous_issue_comments(
        &self,
        number: PullRequestNumber,
        bot_name: &str,
    ) -> Result<(), GitHubError>;

    /// Post a new issue comment on the pull request.
    async fn post_issue_comment(
        &self,
        number: PullRequestNumber,
        comment: &str,
    ) -> Result<(), GitHubError>;

    /// Post a commit status for `sha`.
    async fn post_state(&self, sha: &str, state: CommitState) -> Result<(), GitHubError>;
}

/// Creates a [`SourceHostClient`] once the repository identity is known.
#[cfg_attr(test, mockall::automock)]
pub trait SourceHostConnector: Send + Sync {
    /// Connect to the repository described by `repo`.
    ///
    /// # Errors
    ///
    /// Returns [`GitHubError`] when the client cannot be constructed.
    fn connect(&self, repo: &RepoDetails) -> Result<Box<dyn SourceHostClient>, GitHubError>;
}
