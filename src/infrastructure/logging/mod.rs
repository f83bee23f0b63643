//! Logging setup using tracing
//!
//! Stderr gets a fmt layer (pretty or JSON per config) filtered by
//! `RUST_LOG` with the configured level as the default. When the config
//! names a log directory, a daily-rolling JSON file layer is added.

use anyhow::Result;
use std::io;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::domain::models::{LogFormat, LoggingConfig};

/// Initialize the global tracing subscriber.
///
/// Returns a guard that must stay alive for the duration of the process;
/// dropping it stops the background file writer.
pub fn init(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.clone()));

    if let Some(ref log_dir) = config.log_dir {
        let file_appender = rolling::daily(log_dir, "sqlstash.log");
        let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

        // File output is always JSON for structured logging.
        let file_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_writer(non_blocking_file)
            .with_ansi(false)
            .with_target(true);

        match config.format {
            LogFormat::Json => tracing_subscriber::registry()
                .with(env_filter)
                .with(file_layer)
                .with(tracing_subscriber::fmt::layer().json().with_writer(io::stderr))
                .init(),
            LogFormat::Pretty => tracing_subscriber::registry()
                .with(env_filter)
                .with(file_layer)
                .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
                .init(),
        }

        Ok(Some(guard))
    } else {
        match config.format {
            LogFormat::Json => tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(io::stderr))
                .init(),
            LogFormat::Pretty => tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
                .init(),
        }

        Ok(None)
    }
}
