//! CircleCI environment adapter.

use super::{CiEnvironment, EnvSource, ProcessEnv};
use crate::github::RepoDetails;

/// Reads CircleCI's `CIRCLE_*` variables.
#[derive(Debug, Clone, Default)]
pub struct CircleCiEnvironment<E: EnvSource = ProcessEnv> {
    env: E,
}

impl<E: EnvSource> CircleCiEnvironment<E> {
    /// Creates an adapter reading from `env`.
    #[must_use]
    pub const fn new(env: E) -> Self {
        Self { env }
    }
}

impl<E: EnvSource> CiEnvironment for CircleCiEnvironment<E> {
    fn is_ci(&self) -> bool {
        self.env.var("CIRCLECI").as_deref() == Some("true")
    }

    fn is_pull_request(&self) -> bool {
        self.env.non_empty("CIRCLE_PULL_REQUEST").is_some()
    }

    fn repo_details(&self) -> Option<RepoDetails> {
        let repo = self.env.non_empty("CIRCLE_PROJECT_REPONAME")?;
        let owner = self.env.non_empty("CIRCLE_PROJECT_USERNAME")?;
        Some(RepoDetails::new(owner, repo))
    }

    fn git_branch(&self) -> Option<String> {
        self.env.non_empty("CIRCLE_BRANCH")
    }

    fn pull_request_sha(&self) -> Option<String> {
        self.env.non_empty("CIRCLE_SHA1")
    }

    // CIRCLE_PULL_REQUEST holds the pull request URL; the number is its
    // last path segment.
    fn pull_request_number(&self) -> Option<String> {
        let url = self.env.non_empty("CIRCLE_PULL_REQUEST")?;
        url.rsplit('/')
            .next()
            .filter(|segment| !segment.is_empty())
            .map(str::to_owned)
    }
}
