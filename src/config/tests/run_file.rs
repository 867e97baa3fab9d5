//! Tests for the TOML run configuration file.

use camino::{Utf8Path, Utf8PathBuf};
use rstest::rstest;

use super::helpers::{unused_shell, write_config};
use crate::config::{ConfigFile, ConfigLoader, ConfigSource, RunConfiguration};
use crate::error::BotError;
use crate::github::RepoDetails;
use crate::plugin::PluginSpec;
use crate::snapshot::DEFAULT_BUILD_COMMAND;

const FULL_CONFIG: &str = r#"
build_command = "cargo build --release"
override_base_branch = "main"
bot_username = "pr-bot[bot]"

[repo_details]
owner = "octo"
repo = "widgets"

[[plugins]]
kind = "command"
name = "Lint"
command = "cargo clippy"

[[plugins]]
kind = "file-size"
name = "Binary size"
files = ["target/release/widgets"]
max_increase_bytes = 10240
"#;

#[rstest]
fn parses_every_field() {
    let file = ConfigFile::parse(FULL_CONFIG).expect("config should parse");

    assert_eq!(file.repo_details, Some(RepoDetails::new("octo", "widgets")));
    assert_eq!(file.build_command.as_deref(), Some("cargo build --release"));
    assert_eq!(file.override_base_branch.as_deref(), Some("main"));
    assert_eq!(file.bot_username.as_deref(), Some("pr-bot[bot]"));
    assert_eq!(
        file.plugins,
        vec![
            PluginSpec::Command {
                name: Some("Lint".to_owned()),
                command: "cargo clippy".to_owned(),
                fail_pr_on_error: true,
            },
            PluginSpec::FileSize {
                name: Some("Binary size".to_owned()),
                files: vec![Utf8PathBuf::from("target/release/widgets")],
                max_increase_bytes: Some(10_240),
            },
        ]
    );
}

#[rstest]
fn empty_file_is_a_valid_configuration() {
    let file = ConfigFile::parse("").expect("empty config should parse");

    assert_eq!(file, ConfigFile::default());
}

#[rstest]
#[case::syntax_error("build_command = ")]
#[case::unknown_key("colour = \"blue\"")]
#[case::unknown_plugin_kind("[[plugins]]\nkind = \"lighthouse\"\nname = \"x\"")]
#[case::command_without_command("[[plugins]]\nkind = \"command\"\nname = \"x\"")]
#[case::repo_details_missing_repo("[repo_details]\nowner = \"octo\"")]
#[case::misspelt_file_size_key(
    "[[plugins]]\nkind = \"file-size\"\nfiles = [\"dist/app.js\"]\nmax_increase = 10240"
)]
#[case::unknown_command_key(
    "[[plugins]]\nkind = \"command\"\ncommand = \"make lint\"\nfail_on_error = false"
)]
fn rejects_invalid_files(#[case] text: &str) {
    let error = ConfigFile::parse(text).expect_err("config should be rejected");

    assert!(
        matches!(error, BotError::ConfigLoad { .. }),
        "expected ConfigLoad, got {error:?}"
    );
    assert!(
        error
            .to_string()
            .starts_with("A problem occurred running the config file."),
        "unexpected message: {error}"
    );
}

#[rstest]
fn loader_reports_missing_file() {
    let loader = ConfigLoader::new("/definitely/not/here/pr-bot.config.toml", unused_shell());

    let error = loader.load().expect_err("missing file should fail");

    assert_eq!(
        error.to_string(),
        "Unable to find the config file: '/definitely/not/here/pr-bot.config.toml'."
    );
}

#[rstest]
fn loader_instantiates_plugins_in_order() {
    let (_dir, path) = write_config(FULL_CONFIG);
    let loader = ConfigLoader::new(path.clone(), unused_shell());

    let config = loader.load_configuration().expect("config should load");

    assert_eq!(loader.path(), path.as_path());
    let names: Vec<_> = config.plugins.iter().map(|plugin| plugin.name()).collect();
    assert_eq!(names, vec![Some("Lint"), Some("Binary size")]);
    assert_eq!(config.build_command(), "cargo build --release");
}

#[rstest]
fn loader_keeps_nameless_plugins_for_later_validation() {
    let (_dir, path) = write_config("[[plugins]]\nkind = \"command\"\ncommand = \"true\"");
    let loader = ConfigLoader::new(path, unused_shell());

    let config = loader.load().expect("nameless plugin should still load");

    assert_eq!(config.plugins.len(), 1);
    assert!(config.plugins.iter().all(|plugin| plugin.name().is_none()));
}

#[rstest]
fn loader_reports_parse_errors() {
    let (_dir, path) = write_config("plugins = 3");
    let loader = ConfigLoader::new(Utf8Path::new(path.as_str()), unused_shell());

    let error = loader.load().expect_err("invalid file should fail");

    assert!(matches!(error, BotError::ConfigLoad { .. }), "got {error:?}");
}

#[rstest]
#[case::unset(None)]
#[case::blank(Some("  "))]
fn build_command_defaults_when_unset(#[case] command: Option<&str>) {
    let config = RunConfiguration {
        build_command: command.map(str::to_owned),
        ..RunConfiguration::default()
    };

    assert_eq!(config.build_command(), DEFAULT_BUILD_COMMAND);
}
