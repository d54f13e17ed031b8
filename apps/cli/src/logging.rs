//! Tracing subscriber setup.
//!
//! The filter comes from `FORMCHECK_LOG`, then `RUST_LOG`, then the
//! configured level. Events go to stderr so reports on stdout stay clean.

use std::io::IsTerminal;

use anyhow::{Result, anyhow};
use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, LoggingSettings};

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "FORMCHECK_LOG";

/// Installs the global subscriber.
pub fn init_logging(settings: &LoggingSettings) -> Result<()> {
    let filter = create_env_filter(settings);
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr);

    let installed = match settings.format {
        LogFormat::Pretty => tracing::subscriber::set_global_default(builder.pretty().finish()),
        LogFormat::Compact => tracing::subscriber::set_global_default(builder.compact().finish()),
        LogFormat::Json => {
            tracing::subscriber::set_global_default(builder.with_ansi(false).json().finish())
        }
    };
    installed.map_err(|e| anyhow!("failed to initialize logging: {e}"))?;

    tracing::debug!(format = ?settings.format, "logging initialized");
    Ok(())
}

fn create_env_filter(settings: &LoggingSettings) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(&settings.level))
}
