use anyhow::Result;
use clap::ArgMatches;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// Apply CLI flags on top of the loaded config
///
/// # Errors
/// Returns an error if the resulting config is invalid
pub fn apply_flags(mut config: Config, matches: &ArgMatches) -> Result<Config> {
    if let Some(path) = matches.get_one::<String>("snapshot") {
        config.snapshot_path.clone_from(path);
    }
    if let Some(path) = matches.get_one::<String>("outbox") {
        config.outbox_path.clone_from(path);
    }
    if let Some(level) = matches.get_one::<String>("log-level") {
        config.log_level.clone_from(level);
    }
    if matches.get_flag("json") {
        config.json_output = true;
    }
    config.validate()?;
    Ok(config)
}

/// Initialize tracing subscriber for logging
///
/// `RUST_LOG` wins over the configured level. Output goes to stderr so it
/// never mixes with command output.
///
/// # Errors
/// Returns an error if the filter is invalid or a subscriber is already set
pub fn init_tracing(config: &Config) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .map_err(|e| anyhow::anyhow!("Invalid log filter: {e}"))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing subscriber: {e}"))
}
