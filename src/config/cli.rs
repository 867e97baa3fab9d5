//! Invocation settings merged from CLI, environment, and dotfile.

use std::env;

use camino::Utf8PathBuf;
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

use crate::ci::CiProvider;
use crate::error::BotError;
use crate::github::PersonalAccessToken;
use crate::github::gateway::DEFAULT_API_BASE;

/// Run configuration file read when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "pr-bot.config.toml";

const LEGACY_TOKEN_VAR: &str = "GITHUB_TOKEN";

/// Settings controlling how the bot is invoked.
///
/// # Environment Variables
///
/// - `PR_BOT_CONFIG` or `--config`: run configuration file
/// - `PR_BOT_CI` or `--ci`: CI service (`travis` or `circleci`)
/// - `PR_BOT_TOKEN`, `GITHUB_TOKEN`, or `--token`: GitHub token
/// - `PR_BOT_API_BASE` or `--api-base`: GitHub API base URL
#[derive(Debug, Clone, Default, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "PR_BOT",
    discovery(
        dotfile_name = ".pr-bot.toml",
        config_file_name = "pr-bot.toml",
        app_name = "pr-bot"
    )
)]
pub struct BotCliConfig {
    /// Path of the run configuration file.
    ///
    /// Can be provided via:
    /// - CLI: `--config <PATH>` or `-c <PATH>`
    /// - Environment: `PR_BOT_CONFIG`
    #[ortho_config(cli_short = 'c')]
    pub config: Option<String>,

    /// CI service whose environment variables describe the build.
    ///
    /// Can be provided via:
    /// - CLI: `--ci <travis|circleci>`
    /// - Environment: `PR_BOT_CI`
    ///
    /// Defaults to `circleci`.
    pub ci: Option<String>,

    /// Personal access token for the GitHub API.
    ///
    /// Can be provided via:
    /// - CLI: `--token <TOKEN>` or `-t <TOKEN>`
    /// - Environment: `PR_BOT_TOKEN` or `GITHUB_TOKEN`
    #[ortho_config(cli_short = 't')]
    pub token: Option<String>,

    /// GitHub API base URL, for GitHub Enterprise or test servers.
    pub api_base: Option<String>,
}

impl BotCliConfig {
    /// The run configuration file to load.
    #[must_use]
    pub fn config_path(&self) -> Utf8PathBuf {
        Utf8PathBuf::from(self.config.as_deref().unwrap_or(DEFAULT_CONFIG_FILE))
    }

    /// The selected CI provider.
    ///
    /// # Errors
    ///
    /// Returns [`BotError::UnknownCiProvider`] for unsupported names.
    pub fn ci_provider(&self) -> Result<CiProvider, BotError> {
        self.ci
            .as_deref()
            .map_or_else(|| Ok(CiProvider::default()), str::parse)
    }

    /// Resolves the token, falling back to `GITHUB_TOKEN`.
    ///
    /// Blank values count as absent. `None` means the bot talks to GitHub
    /// anonymously.
    #[must_use]
    pub fn resolve_token(&self) -> Option<PersonalAccessToken> {
        self.token
            .clone()
            .or_else(|| env::var(LEGACY_TOKEN_VAR).ok())
            .and_then(|value| PersonalAccessToken::new(value).ok())
    }

    /// The GitHub API base URL.
    #[must_use]
    pub fn api_base(&self) -> &str {
        self.api_base.as_deref().unwrap_or(DEFAULT_API_BASE)
    }
}
