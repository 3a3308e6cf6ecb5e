//! Core error types for the listings data layer
//!
//! This module contains the `AppError` model every failure is normalized into
//! before it reaches retry decisions, user-facing messages or the tracker.

use chrono::{DateTime, Utc};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

/// Free-form structured details attached to an error
pub type ErrorDetails = Map<String, Value>;

/// Failure classes an [`AppError`] can belong to
///
/// The kind fully determines the error's machine-readable code and its
/// HTTP-like status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Rejected user input
    #[serde(rename = "VALIDATION_ERROR")]
    Validation,
    /// Backend or otherwise unclassified failure
    #[serde(rename = "DATABASE_ERROR")]
    Database,
    /// Missing or invalid credentials
    #[serde(rename = "AUTHENTICATION_ERROR")]
    Authentication,
    /// Authenticated but not permitted
    #[serde(rename = "AUTHORIZATION_ERROR")]
    Authorization,
    /// Requested resource does not exist
    #[serde(rename = "NOT_FOUND_ERROR")]
    NotFound,
    /// Connectivity failure, no response received
    #[serde(rename = "NETWORK_ERROR")]
    Network,
}

impl ErrorKind {
    pub const ALL: [ErrorKind; 6] = [
        ErrorKind::Validation,
        ErrorKind::Database,
        ErrorKind::Authentication,
        ErrorKind::Authorization,
        ErrorKind::NotFound,
        ErrorKind::Network,
    ];

    /// Stable machine-readable code for this kind
    pub const fn code(self) -> &'static str {
        match self {
            ErrorKind::Validation => "VALIDATION_ERROR",
            ErrorKind::Database => "DATABASE_ERROR",
            ErrorKind::Authentication => "AUTHENTICATION_ERROR",
            ErrorKind::Authorization => "AUTHORIZATION_ERROR",
            ErrorKind::NotFound => "NOT_FOUND_ERROR",
            ErrorKind::Network => "NETWORK_ERROR",
        }
    }

    /// HTTP-like status code for this kind (0 when no response was received)
    pub const fn status_code(self) -> u16 {
        match self {
            ErrorKind::Validation => 400,
            ErrorKind::Database => 500,
            ErrorKind::Authentication => 401,
            ErrorKind::Authorization => 403,
            ErrorKind::NotFound => 404,
            ErrorKind::Network => 0,
        }
    }

    /// Look up a kind by its code
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.code() == code)
    }

    /// Classify an HTTP response status
    ///
    /// 408 and 429 are treated as transient connectivity problems so that
    /// they stay retryable; every other status outside 4xx maps to Database.
    pub fn from_http_status(status: u16) -> Self {
        match status {
            0 | 408 | 429 => ErrorKind::Network,
            401 => ErrorKind::Authentication,
            403 => ErrorKind::Authorization,
            404 => ErrorKind::NotFound,
            400..=499 => ErrorKind::Validation,
            _ => ErrorKind::Database,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Normalized, classified representation of a failure
///
/// `code` and `status_code` are derived from the kind and cannot be set
/// independently. All fields are private: once built, an `AppError` is
/// never mutated, only cloned or consumed by the builder methods in
/// [`constructors`](super::constructors).
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct AppError {
    pub(crate) kind: ErrorKind,
    pub(crate) message: String,
    pub(crate) details: ErrorDetails,
    pub(crate) timestamp: DateTime<Utc>,
    pub(crate) stack: Option<String>,
}

pub type AppResult<T> = std::result::Result<T, AppError>;

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn status_code(&self) -> u16 {
        self.kind.status_code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn details(&self) -> &ErrorDetails {
        &self.details
    }

    /// Get a single detail value by key
    pub fn detail(&self, key: &str) -> Option<&Value> {
        self.details.get(key)
    }

    /// When this error was constructed
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Diagnostic trace captured at classification time, if any
    pub fn stack(&self) -> Option<&str> {
        self.stack.as_deref()
    }
}

impl Serialize for AppError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("AppError", 6)?;
        state.serialize_field("code", self.code())?;
        state.serialize_field("statusCode", &self.status_code())?;
        state.serialize_field("message", &self.message)?;
        state.serialize_field("details", &self.details)?;
        state.serialize_field("timestamp", &self.timestamp)?;
        state.serialize_field("stack", &self.stack)?;
        state.end()
    }
}

/// Render an error and its `source()` chain, one cause per line
pub fn format_error_chain(err: &dyn std::error::Error) -> String {
    let mut rendered = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        rendered.push_str("\n  caused by: ");
        rendered.push_str(&cause.to_string());
        source = cause.source();
    }
    rendered
}
