//! Retry driver for operations that fail with retryable errors
//!
//! The error handler only decides whether and when to retry; this module is
//! an optional loop on top of that decision for callers that do not want to
//! write their own. Dropping the returned future cancels it.

use crate::config::RetryPolicyConfig;
use crate::error::{AppResult, Failure};
use crate::error_handler::ErrorHandler;
use crate::observability::retry_span;
use std::future::Future;
use tokio::time::sleep;
use tracing::{debug, warn, Instrument};

/// Configuration for the retry driver
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the initial attempt)
    pub max_attempts: u32,
    /// Per-operation identifier for better observability
    pub operation_name: Option<String>,
    /// Enable detailed retry logging
    pub enable_logging: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            operation_name: None,
            enable_logging: true,
        }
    }
}

impl RetryConfig {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..Default::default()
        }
    }

    pub fn from_policy_config(config: &RetryPolicyConfig) -> Self {
        Self::new(config.max_attempts)
    }

    /// Set operation name for better observability
    pub fn with_operation_name(mut self, name: impl Into<String>) -> Self {
        self.operation_name = Some(name.into());
        self
    }

    /// Enable or disable logging
    pub fn with_logging(mut self, enable: bool) -> Self {
        self.enable_logging = enable;
        self
    }
}

/// Run `operation` until it succeeds, fails with a non-retryable error, or
/// runs out of attempts
///
/// Every failure is classified by `handler`; the wait before retry `n`
/// (zero-indexed) is `handler.retry_delay(&error, n)`. The last classified
/// error is returned when the loop gives up.
pub async fn retry<F, Fut, T, E>(
    handler: &ErrorHandler,
    config: &RetryConfig,
    mut operation: F,
) -> AppResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Into<Failure>,
{
    let operation_name = config.operation_name.as_deref().unwrap_or("operation");
    let max_attempts = config.max_attempts.max(1);
    let mut attempt: u32 = 0;

    loop {
        let span = retry_span(operation_name, attempt);
        let outcome = operation().instrument(span.clone()).await;

        let error = match outcome {
            Ok(value) => {
                if attempt > 0 && config.enable_logging {
                    debug!("{} succeeded after {} attempts", operation_name, attempt + 1);
                }
                return Ok(value);
            }
            Err(failure) => handler.handle(failure),
        };

        if !ErrorHandler::is_retryable(&error) {
            if config.enable_logging {
                debug!("{} failed with non-retryable error: {}", operation_name, error);
            }
            return Err(error);
        }

        if attempt + 1 >= max_attempts {
            if config.enable_logging {
                warn!(
                    "{} failed after {} attempts: {}",
                    operation_name, max_attempts, error
                );
            }
            return Err(error);
        }

        let delay = handler.retry_delay(&error, attempt);
        span.record("delay_ms", delay.as_millis() as u64);
        if config.enable_logging {
            warn!(
                code = error.code(),
                "Retry attempt {}/{} for {} after error: {} (waiting {:?})",
                attempt + 1,
                max_attempts,
                operation_name,
                error,
                delay
            );
        }

        sleep(delay).await;
        attempt += 1;
    }
}
