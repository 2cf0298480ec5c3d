//! Structured logging setup
//!
//! Installs a global `tracing` subscriber for applications that do not
//! configure their own. `RUST_LOG` takes precedence over the configured
//! level, and repeated initialization is a no-op.

use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

use crate::errors::{ValidationError, ValidationResult};

static LOGGING_INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default level filter when `RUST_LOG` is unset
    pub level: String,
    /// Emit JSON lines instead of human-readable text
    pub json_format: bool,
    /// Whether to attach a console output layer; when false only the
    /// level filter is installed and events are discarded
    pub console_output: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: true,
            console_output: true,
        }
    }
}

/// Install the global tracing subscriber.
///
/// Passing `None` uses [`LoggingConfig::default`]. Returns `Ok` without
/// side effects if logging was already initialized.
pub fn init_logging(config: Option<LoggingConfig>) -> ValidationResult<()> {
    if LOGGING_INITIALIZED.load(Ordering::Relaxed) {
        return Ok(());
    }

    let config = config.unwrap_or_default();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.level));
    let subscriber = Registry::default().with(filter);

    if !config.console_output {
        tracing::subscriber::set_global_default(subscriber).map_err(|e| {
            ValidationError::Initialization(format!("Failed to set global subscriber: {}", e))
        })?;
    } else if config.json_format {
        let layer = fmt::layer()
            .json()
            .flatten_event(true)
            .with_current_span(true)
            .with_target(true);
        tracing::subscriber::set_global_default(subscriber.with(layer)).map_err(|e| {
            ValidationError::Initialization(format!("Failed to set global subscriber: {}", e))
        })?;
    } else {
        let layer = fmt::layer()
            .with_target(true)
            .with_thread_ids(true)
            .with_thread_names(true);
        tracing::subscriber::set_global_default(subscriber.with(layer)).map_err(|e| {
            ValidationError::Initialization(format!("Failed to set global subscriber: {}", e))
        })?;
    }

    LOGGING_INITIALIZED.store(true, Ordering::Relaxed);
    tracing::info!(
        level = %config.level,
        json = config.json_format,
        "Validation logging initialized"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "info");
        assert!(config.json_format);
        assert!(config.console_output);
    }

    #[test]
    fn test_init_is_idempotent() {
        assert!(init_logging(None).is_ok());
        assert!(init_logging(Some(LoggingConfig {
            level: "debug".to_string(),
            json_format: false,
            console_output: true,
        }))
        .is_ok());
    }

    #[test]
    fn test_config_round_trips_through_json() {
        let config = LoggingConfig {
            level: "warn".to_string(),
            json_format: false,
            console_output: false,
        };
        let encoded = serde_json::to_string(&config).unwrap();
        let decoded: LoggingConfig = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded.level, "warn");
        assert!(!decoded.json_format);
        assert!(!decoded.console_output);
    }
}
