//! Tests loading [`BotCliConfig`] from real command-line arguments.

use std::ffi::OsString;

use ortho_config::OrthoConfig;
use rstest::rstest;

use crate::ci::CiProvider;
use crate::config::BotCliConfig;
use crate::error::BotError;

/// Loads the configuration from `cli_args` with an empty home directory and
/// no `PR_BOT_*` variables set.
fn load_with_args(cli_args: &[&str]) -> BotCliConfig {
    let temp_dir = tempfile::TempDir::new().expect("temp dir should be created");
    let home = temp_dir.path().to_string_lossy().to_string();

    let _guard = env_lock::lock_env([
        ("HOME", Some(home.as_str())),
        ("XDG_CONFIG_HOME", Some(home.as_str())),
        ("PR_BOT_CONFIG", None),
        ("PR_BOT_CI", None),
        ("PR_BOT_TOKEN", None),
        ("PR_BOT_API_BASE", None),
    ]);

    let mut args = vec![OsString::from("pr-bot")];
    args.extend(cli_args.iter().map(OsString::from));

    BotCliConfig::load_from_iter(args).expect("config should load")
}

#[rstest]
#[case::short_flag(&["-c", "ci/bot.toml", "--ci", "travis"])]
#[case::long_flag(&["--config", "ci/bot.toml", "--ci", "travis"])]
fn flags_select_config_file_and_provider(#[case] args: &[&str]) {
    let config = load_with_args(args);

    assert_eq!(config.config_path().as_str(), "ci/bot.toml");
    assert_eq!(
        config.ci_provider().expect("travis should be supported"),
        CiProvider::Travis
    );
}

#[rstest]
fn token_and_api_base_flags_are_read() {
    let config = load_with_args(&["-t", "cli-token", "--api-base", "http://127.0.0.1:9"]);

    assert_eq!(config.token.as_deref(), Some("cli-token"));
    assert_eq!(config.api_base(), "http://127.0.0.1:9");
}

#[rstest]
fn unknown_ci_flag_value_is_rejected_when_resolved() {
    let config = load_with_args(&["--ci", "jenkins"]);

    assert_eq!(config.ci.as_deref(), Some("jenkins"));
    assert!(
        matches!(
            config.ci_provider(),
            Err(BotError::UnknownCiProvider { name }) if name == "jenkins"
        ),
        "unexpected provider result: {:?}",
        config.ci_provider()
    );
}
