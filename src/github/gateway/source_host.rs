//! Octocrab implementation of the source host client.

use async_trait::async_trait;
use octocrab::models::CommentId;
use octocrab::{Octocrab, Page};
use serde_json::json;

use crate::github::error::GitHubError;
use crate::github::models::{
    ApiComment, ApiRepository, CommitState, PullRequestNumber, RepoDetails, RepositoryMetadata,
};

use super::SourceHostClient;
use super::error_mapping::map_octocrab_error;

/// Status context shown next to the check on the pull request.
const STATUS_CONTEXT: &str = "pr-bot";

/// Octocrab-backed client bound to one repository.
pub struct OctocrabSourceHost {
    client: Octocrab,
    repo: RepoDetails,
}

impl OctocrabSourceHost {
    /// Creates a client for `repo` from an Octocrab client.
    #[must_use]
    pub const fn new(client: Octocrab, repo: RepoDetails) -> Self {
        Self { client, repo }
    }

    fn repository_path(&self) -> String {
        format!("/repos/{}/{}", self.repo.owner, self.repo.repo)
    }

    fn comments_path(&self, number: PullRequestNumber) -> String {
        format!("{}/issues/{number}/comments", self.repository_path())
    }

    fn status_path(&self, sha: &str) -> String {
        format!("{}/statuses/{sha}", self.repository_path())
    }

    async fn issue_comments(
        &self,
        number: PullRequestNumber,
    ) -> Result<Vec<ApiComment>, GitHubError> {
        let page = self
            .client
            .get::<Page<ApiComment>, _, _>(self.comments_path(number), None::<&()>)
            .await
            .map_err(|error| map_octocrab_error("issue comments", &error))?;

        self.client
            .all_pages(page)
            .await
            .map_err(|error| map_octocrab_error("issue comments", &error))
    }
}

#[async_trait]
impl SourceHostClient for OctocrabSourceHost {
    async fn repo_details(&self) -> Result<RepositoryMetadata, GitHubError> {
        self.client
            .get::<ApiRepository, _, _>(self.repository_path(), None::<&()>)
            .await
            .map(ApiRepository::into)
            .map_err(|error| map_octocrab_error("repository", &error))
    }

    async fn delete_previous_issue_comments(
        &self,
        number: PullRequestNumber,
        bot_name: &str,
    ) -> Result<(), GitHubError> {
        let comments = self.issue_comments(number).await?;
        let issues = self.client.issues(&self.repo.owner, &self.repo.repo);

        for comment in comments.iter().filter(|comment| comment.is_authored_by(bot_name)) {
            tracing::debug!("deleting previous comment {} by '{bot_name}'", comment.id);
            issues
                .delete_comment(CommentId(comment.id))
                .await
                .map_err(|error| map_octocrab_error("delete issue comment", &error))?;
        }
        Ok(())
    }

    async fn post_issue_comment(
        &self,
        number: PullRequestNumber,
        comment: &str,
    ) -> Result<(), GitHubError> {
        self.client
            .post::<_, serde_json::Value>(
                self.comments_path(number),
                Some(&json!({ "body": comment })),
            )
            .await
            .map(|_| ())
            .map_err(|error| map_octocrab_error("post issue comment", &error))
    }

    async fn post_state(&self, sha: &str, state: CommitState) -> Result<(), GitHubError> {
        let description = match state {
            CommitState::Success => "All plugins passed.",
            CommitState::Failure => "One or more plugins failed this pull request.",
        };
        let body = json!({
            "state": state,
            "context": STATUS_CONTEXT,
            "description": description,
        });

        self.client
            .post::<_, serde_json::Value>(self.status_path(sha), Some(&body))
            .await
            .map(|_| ())
            .map_err(|error| map_octocrab_error("post commit status", &error))
    }
}
