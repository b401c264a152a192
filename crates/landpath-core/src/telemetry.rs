//! Tracing subscriber setup for binaries
//!
//! The library only emits `tracing` events. Binaries call [`init_tracing`]
//! once at startup to decide where they go.

use crate::config::{LogFormat, LoggingConfig};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

/// Subscriber installation errors
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// Filter directive did not parse
    #[error("invalid log filter '{filter}': {message}")]
    Filter {
        /// Directive as configured
        filter: String,
        /// Parser message
        message: String,
    },

    /// A global subscriber is already installed
    #[error("tracing subscriber already installed: {0}")]
    AlreadyInstalled(String),
}

/// Build the filter: `RUST_LOG` when set, else the configured directive
///
/// # Errors
/// `TelemetryError::Filter` if the configured directive is malformed.
pub fn env_filter(config: &LoggingConfig) -> Result<EnvFilter, TelemetryError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&config.filter).map_err(|e| TelemetryError::Filter {
        filter: config.filter.clone(),
        message: e.to_string(),
    })
}

/// Install the global subscriber, writing to stderr
///
/// # Errors
/// `TelemetryError::Filter` on a malformed directive,
/// `TelemetryError::AlreadyInstalled` if called twice.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), TelemetryError> {
    let filter = env_filter(config)?;
    let registry = Registry::default().with(filter);

    let result = match config.format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Pretty => registry
            .with(fmt::layer().pretty().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Compact => registry
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .try_init(),
    };
    result.map_err(|e| TelemetryError::AlreadyInstalled(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_filter_is_reported() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let config = LoggingConfig {
            filter: "landpath_core=loud".to_string(),
            format: LogFormat::Compact,
        };
        assert!(matches!(
            env_filter(&config),
            Err(TelemetryError::Filter { .. })
        ));
    }

    #[test]
    fn second_install_fails() {
        let config = LoggingConfig::default();
        let first = init_tracing(&config);
        let second = init_tracing(&config);
        assert!(first.is_ok() || matches!(first, Err(TelemetryError::AlreadyInstalled(_))));
        assert!(matches!(second, Err(TelemetryError::AlreadyInstalled(_))));
    }
}
