//! Identity and payload types shared by the GitHub layer.
//!
//! Types prefixed with `Api` are internal deserialisation targets for GitHub
//! responses.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::BotError;

/// Repository owner and name.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RepoDetails {
    /// Account or organisation owning the repository.
    pub owner: String,
    /// Repository name.
    pub repo: String,
}

impl RepoDetails {
    /// Creates repository details from owner and name.
    #[must_use]
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    /// Parses an `owner/repo` slug. Anything other than exactly two
    /// non-empty segments yields `None`.
    #[must_use]
    pub fn from_slug(slug: &str) -> Option<Self> {
        let mut segments = slug.split('/');
        let owner = segments.next().filter(|value| !value.is_empty())?;
        let repo = segments.next().filter(|value| !value.is_empty())?;
        if segments.next().is_some() {
            return None;
        }
        Some(Self::new(owner, repo))
    }
}

impl fmt::Display for RepoDetails {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}/{}", self.owner, self.repo)
    }
}

/// Repository metadata needed to create snapshots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryMetadata {
    /// HTTPS clone URL.
    pub clone_url: String,
}

/// Pull request number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PullRequestNumber(u64);

impl PullRequestNumber {
    /// Parses the textual number exposed by CI providers.
    ///
    /// # Errors
    ///
    /// Returns [`BotError::InvalidPullRequestNumber`] when the value is not a
    /// positive integer.
    pub fn parse(value: &str) -> Result<Self, BotError> {
        value
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|number| *number > 0)
            .map(Self)
            .ok_or_else(|| BotError::InvalidPullRequestNumber {
                value: value.to_owned(),
            })
    }

    /// Returns the numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PullRequestNumber {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Commit status posted for the pull request head.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitState {
    /// Every plugin accepted the change.
    Success,
    /// At least one plugin asked to fail the pull request.
    Failure,
}

impl CommitState {
    /// Chooses the state from the aggregated fail flag.
    #[must_use]
    pub const fn from_fail_flag(fail_pr: bool) -> Self {
        if fail_pr { Self::Failure } else { Self::Success }
    }

    /// GitHub's wire name for the state.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failure => "failure",
        }
    }
}

impl fmt::Display for CommitState {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Personal access token wrapper enforcing presence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonalAccessToken(String);

impl PersonalAccessToken {
    /// Validates that the token is non-empty and trims whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`super::GitHubError::MissingToken`] when the supplied string
    /// is blank.
    pub fn new(token: impl AsRef<str>) -> Result<Self, super::GitHubError> {
        let trimmed = token.as_ref().trim();
        if trimmed.is_empty() {
            return Err(super::GitHubError::MissingToken);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for PersonalAccessToken {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiRepository {
    pub(super) clone_url: String,
}

impl From<ApiRepository> for RepositoryMetadata {
    fn from(value: ApiRepository) -> Self {
        Self {
            clone_url: value.clone_url,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiComment {
    pub(super) id: u64,
    pub(super) user: Option<ApiUser>,
}

impl ApiComment {
    pub(super) fn is_authored_by(&self, login: &str) -> bool {
        self.user
            .as_ref()
            .and_then(|user| user.login.as_deref())
            .is_some_and(|author| author == login)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiUser {
    pub(super) login: Option<String>,
}
