//! Octocrab client construction and the production connector.

use http::Uri;
use octocrab::Octocrab;
use url::Url;

use crate::github::error::GitHubError;
use crate::github::models::{PersonalAccessToken, RepoDetails};

use super::error_mapping::map_octocrab_error;
use super::source_host::OctocrabSourceHost;
use super::{SourceHostClient, SourceHostConnector};

/// Public GitHub API endpoint used when no override is configured.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Builds an Octocrab client for the given API base URL, authenticating
/// with `token` when one is available.
///
/// # Errors
///
/// Returns `GitHubError::InvalidUrl` when the base URI cannot be parsed or
/// `GitHubError::Api` when Octocrab fails to construct a client.
pub(super) fn build_octocrab_client(
    token: Option<&PersonalAccessToken>,
    api_base: &str,
) -> Result<Octocrab, GitHubError> {
    let base_uri: Uri = api_base
        .parse::<Uri>()
        .map_err(|error| GitHubError::InvalidUrl(error.to_string()))?;

    let mut builder = Octocrab::builder()
        .base_uri(base_uri)
        .map_err(|error| GitHubError::Api {
            message: format!("build client failed: {error}"),
        })?;
    if let Some(value) = token {
        builder = builder.personal_token(value.as_ref());
    }

    builder
        .build()
        .map_err(|error| map_octocrab_error("build client", &error))
}

/// Connects to GitHub (or GitHub Enterprise) through Octocrab.
#[derive(Debug, Clone)]
pub struct OctocrabConnector {
    token: Option<PersonalAccessToken>,
    api_base: Url,
}

impl OctocrabConnector {
    /// Creates a connector for `api_base`.
    ///
    /// # Errors
    ///
    /// Returns `GitHubError::InvalidUrl` when `api_base` is not a URL.
    pub fn new(token: Option<PersonalAccessToken>, api_base: &str) -> Result<Self, GitHubError> {
        let parsed =
            Url::parse(api_base).map_err(|error| GitHubError::InvalidUrl(error.to_string()))?;
        Ok(Self {
            token,
            api_base: parsed,
        })
    }

    /// API base URL requests are sent to.
    #[must_use]
    pub const fn api_base(&self) -> &Url {
        &self.api_base
    }
}

impl SourceHostConnector for OctocrabConnector {
    fn connect(&self, repo: &RepoDetails) -> Result<Box<dyn SourceHostClient>, GitHubError> {
        let client = build_octocrab_client(self.token.as_ref(), self.api_base.as_str())?;
        Ok(Box::new(OctocrabSourceHost::new(client, repo.clone())))
    }
}
