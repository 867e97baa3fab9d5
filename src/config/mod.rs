//! Configuration for a pr-bot run.
//!
//! Two layers are involved:
//!
//! 1. [`BotCliConfig`] holds the invocation settings (run configuration path,
//!    CI provider, GitHub token, API base). It is merged by ortho-config from
//!    defaults, an optional `.pr-bot.toml` dotfile, `PR_BOT_*` environment
//!    variables, and command-line flags, in that order of precedence.
//! 2. [`RunConfiguration`] describes what the bot does: the repository, the
//!    build command, and the ordered plugin list. It is read from the TOML file
//!    named by the first layer (`pr-bot.config.toml` by default):
//!
//! ```toml
//! build_command = "cargo build --release"
//! override_base_branch = "main"
//! bot_username = "pr-bot[bot]"
//!
//! [repo_details]
//! owner = "octo"
//! repo = "widgets"
//!
//! [[plugins]]
//! kind = "file-size"
//! name = "Binary size"
//! files = ["target/release/widgets"]
//! max_increase_bytes = 10240
//! ```

mod cli;
mod run;

pub use cli::{BotCliConfig, DEFAULT_CONFIG_FILE};
pub use run::{ConfigFile, ConfigLoader, ConfigSource, RunConfiguration};

#[cfg(test)]
mod tests;
