//! Observability setup for structured logging
//!
//! This module initializes the `tracing` subscriber from configuration and
//! provides span helpers used by the error layer.

use crate::config::{LogFormat, LoggingConfig};
use tracing::Span;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, util::TryInitError, EnvFilter, Registry,
};

/// Initialize tracing with environment-based configuration
///
/// `RUST_LOG` takes precedence over the configured level.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), TryInitError> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(&config.level)));

    let registry = Registry::default().with(env_filter);
    match config.format {
        LogFormat::Pretty => registry
            .with(
                fmt::layer()
                    .pretty()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .try_init(),
        LogFormat::Compact => registry
            .with(fmt::layer().compact().with_target(true))
            .try_init(),
    }
}

/// Default filter directives for a log level
pub fn default_directives(level: &str) -> String {
    format!("realty_core={},reqwest=warn,hyper=warn", level)
}

/// Create a span for one attempt of a retried operation
#[inline]
pub fn retry_span(operation: &str, attempt: u32) -> Span {
    tracing::debug_span!(
        "retry",
        operation = %operation,
        attempt = attempt,
        delay_ms = tracing::field::Empty,
    )
}
