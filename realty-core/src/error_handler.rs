//! Error classification, user-facing messages and retry policy
//!
//! The handler turns any caught [`Failure`] into an [`AppError`] and answers
//! the two questions a caller asks next: should this be retried, and after
//! how long. Nothing here blocks or fails; the retry loop itself belongs to
//! the caller (see [`patterns::retry`](crate::patterns::retry) for an
//! optional driver).

use crate::config::Config;
use crate::error::{AppError, ErrorKind, Failure, ORIGINAL_ERROR_KEY, STACK_KEY};
use rand::Rng;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error};

/// Message used when the failure carries no usable message
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred";

const DEFAULT_FRIENDLY_MESSAGE: &str = "Something went wrong. Please try again later.";

/// Backoff constants for retryable errors
///
/// Delay for attempt `n` (zero-indexed) is
/// `min(base_delay * multiplier^n, max_delay)` plus a uniform jitter in
/// `[0, max_jitter)`.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub multiplier: f64,
    pub max_jitter: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            multiplier: 2.0,
            max_jitter: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Exponential delay for an attempt, capped and without jitter
    pub fn backoff(&self, attempt: u32) -> Duration {
        if self.base_delay.is_zero() {
            return Duration::ZERO;
        }

        // Nanosecond resolution keeps sub-millisecond bases non-zero
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let scaled_ns = self.base_delay.as_nanos() as f64 * self.multiplier.powi(exponent);
        let max_ns = self.max_delay.as_nanos() as f64;
        let capped_ns = if scaled_ns.is_finite() {
            scaled_ns.clamp(0.0, max_ns)
        } else {
            max_ns
        };
        Duration::from_nanos(capped_ns as u64)
    }

    /// Random jitter in `[0, max_jitter)`
    pub fn jitter(&self) -> Duration {
        let max_ms = self.max_jitter.as_millis() as u64;
        if max_ms == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rand::thread_rng().gen_range(0..max_ms))
    }
}

/// Classifies failures and computes retry decisions
#[derive(Debug, Clone, Default)]
pub struct ErrorHandler {
    policy: RetryPolicy,
}

impl ErrorHandler {
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.retry.policy())
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Normalize a caught failure into an `AppError`
    ///
    /// Classified errors pass through unchanged. Generic errors become
    /// Database errors keeping the original message and stack in the details;
    /// any other value becomes a Database error with a fixed message and the
    /// value stored under `originalError`.
    pub fn handle(&self, failure: impl Into<Failure>) -> AppError {
        match failure.into() {
            Failure::App(err) => err,
            Failure::Error { message, stack } => {
                debug!("Classifying generic failure as database error: {}", message);
                let mut err = AppError::database(message.clone())
                    .with_detail(ORIGINAL_ERROR_KEY, message);
                if let Some(stack) = stack {
                    err = err.with_detail(STACK_KEY, stack.clone()).with_stack(stack);
                }
                err
            }
            Failure::Value(value) => {
                debug!("Classifying non-error value as database error: {}", value);
                AppError::database(UNEXPECTED_ERROR_MESSAGE).with_detail(ORIGINAL_ERROR_KEY, value)
            }
        }
    }

    /// Raw message of a failure, without classifying it
    pub fn error_message(failure: &Failure) -> String {
        match failure {
            Failure::App(err) => err.message().to_string(),
            Failure::Error { message, .. } => message.clone(),
            Failure::Value(_) => UNEXPECTED_ERROR_MESSAGE.to_string(),
        }
    }

    /// Sentence suitable for showing to an end user
    pub fn user_friendly_message(error: &AppError) -> &'static str {
        friendly_message_for_code(error.code())
    }

    /// Network errors and anything with a 5xx status are worth retrying
    pub fn is_retryable(error: &AppError) -> bool {
        error.kind() == ErrorKind::Network || error.status_code() >= 500
    }

    /// Delay before retry `attempt` (zero-indexed)
    ///
    /// Returns `Duration::ZERO` when the error is not retryable, which callers
    /// treat as "do not retry".
    pub fn retry_delay(&self, error: &AppError, attempt: u32) -> Duration {
        if !Self::is_retryable(error) {
            return Duration::ZERO;
        }
        self.policy.backoff(attempt) + self.policy.jitter()
    }

    /// Emit a structured log event for an error
    pub fn log(error: &AppError, context: Option<&str>) {
        let details = Value::Object(error.details().clone());
        error!(
            code = error.code(),
            status_code = error.status_code(),
            details = %details,
            timestamp = %error.timestamp().to_rfc3339(),
            context = context.unwrap_or(""),
            stack = error.stack().unwrap_or(""),
            "Error logged: {}",
            error.message()
        );
    }
}

/// Map an error code to its user-facing sentence
///
/// Unknown codes get the generic fallback.
pub fn friendly_message_for_code(code: &str) -> &'static str {
    match ErrorKind::from_code(code) {
        Some(ErrorKind::Validation) => "Please check your input and try again.",
        Some(ErrorKind::Authentication) => "Please log in to continue.",
        Some(ErrorKind::Authorization) => "You do not have permission to perform this action.",
        Some(ErrorKind::NotFound) => "The requested resource was not found.",
        Some(ErrorKind::Network) => "Please check your internet connection and try again.",
        Some(ErrorKind::Database) | None => DEFAULT_FRIENDLY_MESSAGE,
    }
}
