//! Continuous integration environment detection.
//!
//! Each supported CI service exposes pull request details through its own
//! environment variables. The adapters in this module translate them into
//! the provider-neutral [`CiEnvironment`] view, and [`CiState`] captures that
//! view once at the start of a run.
//!
//! Variables are read through an [`EnvSource`], so tests can supply an
//! [`EnvSnapshot`] instead of mutating the process environment.

mod circleci;
mod travis;

use std::collections::BTreeMap;
use std::env;
use std::fmt;
use std::str::FromStr;

pub use circleci::CircleCiEnvironment;
pub use travis::TravisEnvironment;

use crate::error::BotError;
use crate::github::RepoDetails;

/// Source of environment variables.
pub trait EnvSource: Send + Sync {
    /// Returns the value of `key`, or `None` when unset.
    fn var(&self, key: &str) -> Option<String>;

    /// Returns the value of `key` when it is set to a non-empty string.
    fn non_empty(&self, key: &str) -> Option<String> {
        self.var(key).filter(|value| !value.is_empty())
    }
}

/// Reads the live process environment on every call.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        env::var(key).ok()
    }
}

/// An immutable set of environment variables.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EnvSnapshot {
    vars: BTreeMap<String, String>,
}

impl EnvSnapshot {
    /// Captures the current process environment.
    #[must_use]
    pub fn capture() -> Self {
        Self::from_pairs(env::vars())
    }

    /// Builds a snapshot from explicit key/value pairs.
    #[must_use]
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

impl EnvSource for EnvSnapshot {
    fn var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

/// Provider-neutral view of the CI environment.
pub trait CiEnvironment: Send + Sync {
    /// Whether the process runs under this CI service.
    fn is_ci(&self) -> bool;

    /// Whether the triggering event is a pull request.
    fn is_pull_request(&self) -> bool;

    /// Repository owner and name, when the service exposes both.
    fn repo_details(&self) -> Option<RepoDetails>;

    /// Target branch of the pull request, or the branch being built.
    fn git_branch(&self) -> Option<String>;

    /// Head commit of the pull request.
    fn pull_request_sha(&self) -> Option<String>;

    /// Pull request number as exposed by the service.
    fn pull_request_number(&self) -> Option<String>;
}

/// Supported CI services.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CiProvider {
    /// Travis CI (`--ci travis`).
    Travis,
    /// CircleCI (`--ci circleci`).
    #[default]
    CircleCi,
}

impl CiProvider {
    /// Identifier accepted on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Travis => "travis",
            Self::CircleCi => "circleci",
        }
    }
}

impl fmt::Display for CiProvider {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for CiProvider {
    type Err = BotError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "travis" => Ok(Self::Travis),
            "circleci" => Ok(Self::CircleCi),
            _ => Err(BotError::UnknownCiProvider {
                name: value.to_owned(),
            }),
        }
    }
}

/// A CI adapter selected by [`CiProvider`].
#[derive(Debug, Clone)]
pub enum ProviderEnvironment<E: EnvSource = ProcessEnv> {
    /// Travis CI variables.
    Travis(TravisEnvironment<E>),
    /// CircleCI variables.
    CircleCi(CircleCiEnvironment<E>),
}

impl<E: EnvSource> ProviderEnvironment<E> {
    /// Creates the adapter for `provider` reading from `env`.
    #[must_use]
    pub const fn new(provider: CiProvider, env: E) -> Self {
        match provider {
            CiProvider::Travis => Self::Travis(TravisEnvironment::new(env)),
            CiProvider::CircleCi => Self::CircleCi(CircleCiEnvironment::new(env)),
        }
    }

    fn inner(&self) -> &dyn CiEnvironment {
        match self {
            Self::Travis(adapter) => adapter,
            Self::CircleCi(adapter) => adapter,
        }
    }
}

impl<E: EnvSource> CiEnvironment for ProviderEnvironment<E> {
    fn is_ci(&self) -> bool {
        self.inner().is_ci()
    }

    fn is_pull_request(&self) -> bool {
        self.inner().is_pull_request()
    }

    fn repo_details(&self) -> Option<RepoDetails> {
        self.inner().repo_details()
    }

    fn git_branch(&self) -> Option<String> {
        self.inner().git_branch()
    }

    fn pull_request_sha(&self) -> Option<String> {
        self.inner().pull_request_sha()
    }

    fn pull_request_number(&self) -> Option<String> {
        self.inner().pull_request_number()
    }
}

/// CI values captured once at the start of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CiState {
    /// Whether the process runs under CI.
    pub is_ci: bool,
    /// Whether the triggering event is a pull request.
    pub is_pull_request: bool,
    /// Head commit of the pull request.
    pub pull_request_sha: Option<String>,
    /// Pull request number.
    pub pull_request_number: Option<String>,
    /// Target or current branch.
    pub git_branch: Option<String>,
    /// Repository identity exposed by the CI service.
    pub repo_details: Option<RepoDetails>,
}

impl CiState {
    /// Reads every field from `env`.
    #[must_use]
    pub fn capture(env: &dyn CiEnvironment) -> Self {
        Self {
            is_ci: env.is_ci(),
            is_pull_request: env.is_pull_request(),
            pull_request_sha: env.pull_request_sha(),
            pull_request_number: env.pull_request_number(),
            git_branch: env.git_branch(),
            repo_details: env.repo_details(),
        }
    }

    /// Whether results should be published to the pull request.
    #[must_use]
    pub const fn is_pull_request_build(&self) -> bool {
        self.is_ci && self.is_pull_request
    }
}

#[cfg(test)]
mod tests;
