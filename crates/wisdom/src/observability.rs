use std::env;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

/// Logging setup for the wisdom binary.
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    /// Log filter directives (e.g., "info", "debug"), `RUST_LOG` by default
    pub log_level: String,
    /// Enable JSON-formatted logs for structured logging
    pub json_logs: bool,
}

impl ObservabilityConfig {
    /// Create a configuration from `RUST_LOG`, falling back to `info`.
    pub fn new() -> Self {
        Self {
            log_level: env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            json_logs: false,
        }
    }

    /// Set the log level.
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Enable JSON-formatted logs.
    pub fn with_json_logs(mut self, enabled: bool) -> Self {
        self.json_logs = enabled;
        self
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Filter built from the configured level, which already defaults to `RUST_LOG`.
fn env_filter(config: &ObservabilityConfig) -> Result<EnvFilter, ParseError> {
    EnvFilter::try_new(&config.log_level)
}

/// Install the global subscriber: an env filter and a text or JSON fmt layer.
pub fn init_observability(config: &ObservabilityConfig) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = env_filter(config)?;

    let fmt_layer = if config.json_logs {
        tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_level(true)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_level(true)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
