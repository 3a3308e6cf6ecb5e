//! Error conversion implementations for AppError
//!
//! These classify third-party failures when they are constructed, so the
//! kind never has to be recovered later by inspecting an opaque value.

use super::constructors::ORIGINAL_ERROR_KEY;
use super::types::{format_error_chain, AppError, ErrorKind};
use serde_json::error::Category;
use std::io::ErrorKind as IoErrorKind;

// HTTP client error conversions
impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        let kind = match err.status() {
            Some(status) => ErrorKind::from_http_status(status.as_u16()),
            None if err.is_timeout() || err.is_connect() || err.is_request() => ErrorKind::Network,
            None => ErrorKind::Database,
        };

        let mut app_error = AppError::new(kind, err.to_string())
            .with_detail(ORIGINAL_ERROR_KEY, err.to_string())
            .with_stack(format_error_chain(&err));
        if let Some(status) = err.status() {
            app_error = app_error.with_detail("httpStatus", status.as_u16());
        }
        if let Some(url) = err.url() {
            app_error = app_error.with_detail("url", url.as_str());
        }
        app_error
    }
}

// Serialization error conversions
impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        let kind = match err.classify() {
            Category::Syntax | Category::Data | Category::Eof => ErrorKind::Validation,
            Category::Io => ErrorKind::Database,
        };
        AppError::new(kind, format!("Invalid JSON payload: {}", err))
            .with_detail(ORIGINAL_ERROR_KEY, err.to_string())
            .with_detail("line", err.line())
            .with_detail("column", err.column())
    }
}

// System error conversions
impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        let kind = match err.kind() {
            IoErrorKind::ConnectionRefused
            | IoErrorKind::ConnectionReset
            | IoErrorKind::ConnectionAborted
            | IoErrorKind::NotConnected
            | IoErrorKind::AddrNotAvailable
            | IoErrorKind::BrokenPipe
            | IoErrorKind::TimedOut => ErrorKind::Network,
            IoErrorKind::NotFound => ErrorKind::NotFound,
            IoErrorKind::PermissionDenied => ErrorKind::Authorization,
            IoErrorKind::InvalidInput | IoErrorKind::InvalidData => ErrorKind::Validation,
            _ => ErrorKind::Database,
        };
        AppError::new(kind, err.to_string()).with_detail(ORIGINAL_ERROR_KEY, err.to_string())
    }
}
