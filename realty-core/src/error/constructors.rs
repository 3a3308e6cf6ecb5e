//! Constructor methods and convenience functions for AppError
//!
//! Every `AppError` is built through these functions, so the kind is fixed
//! at the point of construction and the code/status pair follows from it.

use super::types::{format_error_chain, AppError, ErrorDetails, ErrorKind};
use chrono::Utc;
use serde_json::Value;

pub const AUTHENTICATION_REQUIRED: &str = "Authentication required";
pub const INSUFFICIENT_PERMISSIONS: &str = "Insufficient permissions";
pub const RESOURCE_NOT_FOUND: &str = "Resource not found";
pub const NETWORK_CONNECTION_FAILED: &str = "Network connection failed";

/// Details key holding the message (or raw value) of the wrapped failure
pub const ORIGINAL_ERROR_KEY: &str = "originalError";

/// Details key holding the wrapped failure's diagnostic trace
pub const STACK_KEY: &str = "stack";

impl AppError {
    /// Create an error of the given kind
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: ErrorDetails::new(),
            timestamp: Utc::now(),
            stack: None,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a validation error carrying structured details
    ///
    /// # Examples
    /// ```rust
    /// use realty_core::error::AppError;
    /// use serde_json::json;
    ///
    /// let details = json!({ "field": "price" }).as_object().cloned().unwrap_or_default();
    /// let err = AppError::validation_with_details("Price must be positive", details);
    /// assert_eq!(err.code(), "VALIDATION_ERROR");
    /// ```
    pub fn validation_with_details(message: impl Into<String>, details: ErrorDetails) -> Self {
        Self::new(ErrorKind::Validation, message).with_details(details)
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Database, message)
    }

    /// Create a database error wrapping an underlying failure
    ///
    /// The underlying message is recorded under `details.originalError` and
    /// its source chain becomes the stack.
    pub fn database_from(message: impl Into<String>, source: &dyn std::error::Error) -> Self {
        let mut err = Self::database(message).with_detail(ORIGINAL_ERROR_KEY, source.to_string());
        if source.source().is_some() {
            err.stack = Some(format_error_chain(source));
        }
        err
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Authentication, message)
    }

    pub fn authentication_required() -> Self {
        Self::authentication(AUTHENTICATION_REQUIRED)
    }

    pub fn authorization(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Authorization, message)
    }

    pub fn insufficient_permissions() -> Self {
        Self::authorization(INSUFFICIENT_PERMISSIONS)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn resource_not_found() -> Self {
        Self::not_found(RESOURCE_NOT_FOUND)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Network, message)
    }

    pub fn connection_failed() -> Self {
        Self::network(NETWORK_CONNECTION_FAILED)
    }

    /// Attach a single detail, replacing any previous value under `key`
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    /// Merge a map of details into this error
    pub fn with_details(mut self, details: ErrorDetails) -> Self {
        self.details.extend(details);
        self
    }

    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }
}
