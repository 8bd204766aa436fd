use anyhow::{Context, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

use crate::config::{Config, LogFormat, LoggingConfig};

/// Build the level filter: `RUST_LOG` wins, otherwise the configured level
pub fn build_env_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .context("Invalid log level configuration")
}

/// Initialize the tracing subscriber for logging and telemetry
pub fn init_telemetry(config: &LoggingConfig) -> Result<()> {
    let registry = Registry::default().with(build_env_filter(config)?);

    match config.format {
        LogFormat::Pretty => {
            let fmt_layer = fmt::layer()
                .pretty()
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true);

            registry.with(fmt_layer).try_init()
        }
        LogFormat::Json => {
            let fmt_layer = fmt::layer()
                .json()
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .with_span_list(true)
                .flatten_event(true);

            registry.with(fmt_layer).try_init()
        }
        LogFormat::Compact => {
            let fmt_layer = fmt::layer()
                .compact()
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false);

            registry.with(fmt_layer).try_init()
        }
    }
    .context("Failed to install tracing subscriber")?;

    tracing::info!(
        log_level = %config.level,
        log_format = ?config.format,
        "Telemetry initialized"
    );

    Ok(())
}

/// Log server startup information
pub fn log_startup_info(config: &Config) {
    tracing::info!(
        server_address = %config.server_address(),
        database_url = %config.database_url(),
        max_connections = config.database.max_connections,
        seed_enabled = config.seed.enabled,
        version = env!("CARGO_PKG_VERSION"),
        "Priority Tasks starting up"
    );
}

/// Log server shutdown information
pub fn log_shutdown_info() {
    tracing::info!("Priority Tasks shutting down gracefully");
}

/// Log configuration validation
pub fn log_config_validation(config: &Config) {
    match config.validate() {
        Ok(()) => {
            tracing::info!("Configuration validation passed");
        }
        Err(e) => {
            tracing::error!(error = %e, "Configuration validation failed");
        }
    }
}

/// Log an error together with its cause chain
pub fn report_error(error: &anyhow::Error, context: &str) {
    tracing::error!(
        error = %error,
        context = context,
        "Operation failed"
    );

    for (depth, cause) in error.chain().skip(1).enumerate() {
        tracing::error!(
            error = %cause,
            depth = depth + 1,
            "Error cause"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_filter_accepts_configured_levels() {
        for level in ["trace", "debug", "info", "warn", "error"] {
            let config = LoggingConfig {
                level: level.to_string(),
                format: LogFormat::Compact,
            };
            assert!(build_env_filter(&config).is_ok(), "{level}");
        }
    }

    #[test]
    fn test_log_format_parses_lowercase() {
        #[derive(serde::Deserialize)]
        struct Wrapper {
            format: LogFormat,
        }

        for (raw, expected) in [
            ("pretty", LogFormat::Pretty),
            ("json", LogFormat::Json),
            ("compact", LogFormat::Compact),
        ] {
            let parsed: Wrapper = ::config::Config::builder()
                .set_override("format", raw)
                .unwrap()
                .build()
                .unwrap()
                .try_deserialize()
                .unwrap();
            assert_eq!(parsed.format, expected);
        }
    }
}
