//! Unclassified failures awaiting normalization
//!
//! A `Failure` is whatever a caller caught before it has been turned into an
//! [`AppError`]. The variant is chosen where the failure is caught, which is
//! what lets [`ErrorHandler::handle`](crate::error_handler::ErrorHandler::handle)
//! be a plain match instead of runtime type inspection.

use super::types::{format_error_chain, AppError};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum Failure {
    /// Already classified, passed through untouched
    App(AppError),
    /// A generic error object with a message
    Error {
        message: String,
        stack: Option<String>,
    },
    /// Any other value that was raised as a failure
    Value(Value),
}

impl Failure {
    /// Capture a Rust error, keeping its source chain as the stack
    pub fn from_error(err: &dyn std::error::Error) -> Self {
        let stack = err.source().map(|_| format_error_chain(err));
        Failure::Error {
            message: err.to_string(),
            stack,
        }
    }

    /// Whether this failure has already been classified
    pub fn is_classified(&self) -> bool {
        matches!(self, Failure::App(_))
    }
}

impl From<AppError> for Failure {
    fn from(err: AppError) -> Self {
        Failure::App(err)
    }
}

impl From<Box<dyn std::error::Error + Send + Sync>> for Failure {
    fn from(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        Failure::from_error(&*err)
    }
}

impl From<Value> for Failure {
    fn from(value: Value) -> Self {
        Failure::Value(value)
    }
}

impl From<String> for Failure {
    fn from(value: String) -> Self {
        Failure::Value(Value::String(value))
    }
}

impl From<&str> for Failure {
    fn from(value: &str) -> Self {
        Failure::Value(Value::String(value.to_string()))
    }
}
