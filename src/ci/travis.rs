//! Travis CI environment adapter.

use super::{CiEnvironment, EnvSource, ProcessEnv};
use crate::github::RepoDetails;

/// Reads Travis CI's `TRAVIS_*` variables.
#[derive(Debug, Clone, Default)]
pub struct TravisEnvironment<E: EnvSource = ProcessEnv> {
    env: E,
}

impl<E: EnvSource> TravisEnvironment<E> {
    /// Creates an adapter reading from `env`.
    #[must_use]
    pub const fn new(env: E) -> Self {
        Self { env }
    }
}

impl<E: EnvSource> CiEnvironment for TravisEnvironment<E> {
    fn is_ci(&self) -> bool {
        self.env.var("TRAVIS").as_deref() == Some("true")
    }

    fn is_pull_request(&self) -> bool {
        self.env.var("TRAVIS_EVENT_TYPE").as_deref() == Some("pull_request")
    }

    fn repo_details(&self) -> Option<RepoDetails> {
        self.env
            .non_empty("TRAVIS_REPO_SLUG")
            .and_then(|slug| RepoDetails::from_slug(&slug))
    }

    fn git_branch(&self) -> Option<String> {
        self.env.non_empty("TRAVIS_BRANCH")
    }

    fn pull_request_sha(&self) -> Option<String> {
        self.env.non_empty("TRAVIS_PULL_REQUEST_SHA")
    }

    // Travis sets TRAVIS_PULL_REQUEST to "false" for push builds.
    fn pull_request_number(&self) -> Option<String> {
        self.env
            .non_empty("TRAVIS_PULL_REQUEST")
            .filter(|value| value != "false")
    }
}
