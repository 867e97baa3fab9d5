//! Unit tests for configuration loading.
//!
//! - `argv`: loading [`super::BotCliConfig`] from command-line flags
//! - `helpers`: shared test utilities
//! - `invocation`: ortho-config layering and field resolution for
//!   [`super::BotCliConfig`]
//! - `run_file`: TOML parsing and [`super::ConfigLoader`] behaviour

mod argv;
mod helpers;
mod run_file;
