//! Structured logging setup
//!
//! Every crate logs through `tracing`; the host application calls [`init`]
//! once at start-up. `RUST_LOG` takes precedence over the configured level.

use crate::config::{LogFormat, LoggingConfig};
use crate::error::{Error, ErrorCode, Result};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the global `tracing` subscriber.
///
/// Fails if a global subscriber is already installed.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let filter = build_filter(config)?;

    let result = match config.format {
        LogFormat::Compact => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(config.show_target).compact())
            .try_init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(config.show_target).json())
            .try_init(),
    };

    result.map_err(|e| {
        Error::new(ErrorCode::Internal, format!("Failed to set tracing subscriber: {e}"))
    })?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        format = ?config.format,
        "Logging initialized"
    );

    Ok(())
}

fn build_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&config.level).map_err(|e| {
            Error::invalid_config_value("logging.level", e.to_string())
        }),
    }
}
