//! GitHub access for repository metadata, pull request comments, and commit
//! statuses.
//!
//! This module wraps Octocrab behind the [`SourceHostClient`] trait so that
//! the run controller can be exercised against mocks. Octocrab errors are
//! mapped into [`GitHubError`] variants without exposing Octocrab internals.

pub mod error;
pub mod gateway;
pub mod models;

pub use error::GitHubError;
pub use gateway::{OctocrabConnector, OctocrabSourceHost, SourceHostClient, SourceHostConnector};
pub use models::{
    CommitState, PersonalAccessToken, PullRequestNumber, RepoDetails, RepositoryMetadata,
};

#[cfg(test)]
pub use gateway::{MockSourceHostClient, MockSourceHostConnector};
