//! pr-bot CLI entrypoint.

use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;

use ortho_config::OrthoConfig;
use pr_bot::shell::ShellExecutor;
use pr_bot::{
    Bot, BotCliConfig, BotError, ConfigLoader, EnvSnapshot, OctocrabConnector, ProviderEnvironment,
    RunOutcome, SystemShell,
};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            if writeln!(io::stderr().lock(), "{error}").is_err() {
                return ExitCode::FAILURE;
            }
            ExitCode::FAILURE
        }
    }
}

/// Installs a stderr subscriber filtered by `RUST_LOG`, defaulting to `info`.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(io::stderr))
        .try_init()
        .is_err()
    {
        tracing::debug!("a global tracing subscriber is already installed");
    }
}

async fn run() -> Result<(), BotError> {
    let cli = load_config()?;
    let provider = cli.ci_provider()?;
    let connector = OctocrabConnector::new(cli.resolve_token(), cli.api_base())?;

    let shell: Arc<dyn ShellExecutor> = Arc::new(SystemShell);
    let loader = ConfigLoader::new(cli.config_path(), Arc::clone(&shell));
    let ci = ProviderEnvironment::new(provider, EnvSnapshot::capture());
    tracing::info!(
        "Using {provider} environment, '{}', and GitHub at {}.",
        loader.path(),
        connector.api_base()
    );

    let outcome = Bot::new(&loader, &ci, &connector, shell.as_ref())
        .run()
        .await?;

    match outcome {
        RunOutcome::LocalLog(log) => write_local_log(&log),
        RunOutcome::Published { state } => {
            tracing::info!("Posted results with status '{state}'.");
            Ok(())
        }
    }
}

/// Loads invocation settings from CLI, environment, and files.
///
/// # Errors
///
/// Returns [`BotError::Configuration`] when ortho-config fails to parse
/// arguments or load configuration files.
fn load_config() -> Result<BotCliConfig, BotError> {
    BotCliConfig::load().map_err(|error| BotError::Configuration {
        message: error.to_string(),
    })
}

fn write_local_log(log: &str) -> Result<(), BotError> {
    io::stdout()
        .lock()
        .write_all(log.as_bytes())
        .map_err(|error| BotError::Io {
            message: error.to_string(),
        })
}
