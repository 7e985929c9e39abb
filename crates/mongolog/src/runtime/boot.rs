//! Boot: logging init and config resolution.

use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::Cli;
use crate::conf::ParserConfig;

/// Initialise the tracing / logging subsystem.
///
/// Logs go to stderr; stdout carries the JSON records.
pub fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mongolog=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Load config (explicit file, default file or env), apply command line
/// overrides and validate the result.
pub fn boot(cli: &Cli) -> Result<ParserConfig, Box<dyn std::error::Error>> {
    info!("Starting mongolog v{}", env!("CARGO_PKG_VERSION"));

    let mut config = match &cli.config {
        Some(path) => ParserConfig::load_from(path)?,
        None => ParserConfig::load()?,
    };
    cli.apply(&mut config);

    config.validate().map_err(|e| {
        error!("Configuration rejected: {}", e);
        e
    })?;
    info!(
        "Limits: max_line_size={} bytes, max_depth={}, skip_failures={}",
        config.max_line_size, config.max_depth, config.skip_failures
    );

    Ok(config)
}
