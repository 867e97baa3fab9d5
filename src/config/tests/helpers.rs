//! Shared test helpers for configuration tests.

use std::sync::Arc;

use camino::Utf8PathBuf;
use ortho_config::MergeComposer;
use serde_json::Value;
use tempfile::TempDir;

use crate::config::BotCliConfig;
use crate::shell::{MockShellExecutor, ShellExecutor};

/// Applies a configuration layer to the composer based on the layer type.
pub fn apply_layer(composer: &mut MergeComposer, layer_type: &str, value: Value) {
    match layer_type {
        "defaults" => composer.push_defaults(value),
        "file" => composer.push_file(value, None),
        "environment" => composer.push_environment(value),
        "cli" => composer.push_cli(value),
        _ => panic!("unknown layer type: {layer_type}"),
    }
}

/// Composes a [`BotCliConfig`] from a sequence of `(layer_type, value)` pairs.
pub fn build_config_from_layers(layers: &[(&str, Value)]) -> BotCliConfig {
    let mut composer = MergeComposer::new();

    for (layer_type, value) in layers {
        apply_layer(&mut composer, layer_type, value.clone());
    }

    BotCliConfig::merge_from_layers(composer.layers()).expect("merge should succeed")
}

/// Writes `contents` to a config file inside a fresh temporary directory.
pub fn write_config(contents: &str) -> (TempDir, Utf8PathBuf) {
    let dir = TempDir::new().expect("create temp dir");
    let path = Utf8PathBuf::from_path_buf(dir.path().join("pr-bot.config.toml"))
        .expect("temp path should be UTF-8");
    std::fs::write(&path, contents).expect("write config file");
    (dir, path)
}

/// A shell that must never be called.
pub fn unused_shell() -> Arc<dyn ShellExecutor> {
    let mut shell = MockShellExecutor::new();
    shell.expect_exec().never();
    Arc::new(shell)
}
