//! Destinations tracked errors are forwarded to
//!
//! Forwarding is best-effort: a sink returns a [`SinkError`] on failure, the
//! tracker logs it and moves on. Nothing a sink does can reach the caller
//! of [`ErrorTracker::track_error`](super::ErrorTracker::track_error).

use super::context::ErrorContext;
use crate::error::{AppError, ErrorDetails};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Path the ingestion API accepts error reports on
pub const INGESTION_PATH: &str = "/api/errors";

#[derive(Error, Debug)]
pub enum SinkError {
    #[error("Request to {endpoint} failed: {source}")]
    Http {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Ingestion endpoint {endpoint} rejected report with status {status}")]
    Rejected { endpoint: String, status: u16 },

    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Failed to serialize report: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Error half of a forwarded report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    pub code: String,
    pub message: String,
    pub status_code: u16,
    pub details: ErrorDetails,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

impl From<&AppError> for ErrorPayload {
    fn from(error: &AppError) -> Self {
        Self {
            code: error.code().to_string(),
            message: error.message().to_string(),
            status_code: error.status_code(),
            details: error.details().clone(),
            stack: error.stack().map(str::to_string),
        }
    }
}

/// Body sent to every sink: `{ error: {...}, context: {...} }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorReport {
    pub error: ErrorPayload,
    pub context: ErrorContext,
}

impl ErrorReport {
    pub fn new(error: &AppError, context: ErrorContext) -> Self {
        Self {
            error: ErrorPayload::from(error),
            context,
        }
    }
}

/// A best-effort destination for error reports
#[async_trait]
pub trait ErrorSink: Send + Sync {
    /// Short name used in diagnostics
    fn name(&self) -> &str;

    async fn forward(&self, report: &ErrorReport) -> Result<(), SinkError>;
}

/// Emits reports as structured `tracing` events for a telemetry collector
#[derive(Debug, Clone, Default)]
pub struct TracingTelemetrySink;

#[async_trait]
impl ErrorSink for TracingTelemetrySink {
    fn name(&self) -> &str {
        "telemetry"
    }

    async fn forward(&self, report: &ErrorReport) -> Result<(), SinkError> {
        let details = serde_json::to_string(&report.error.details)?;
        let context = serde_json::to_string(&report.context)?;
        tracing::error!(
            target: "realty_core::telemetry",
            error_code = %report.error.code,
            status_code = report.error.status_code,
            details = %details,
            error_context = %context,
            "{}",
            report.error.message
        );
        Ok(())
    }
}

/// POSTs reports as JSON to the site's ingestion endpoint
#[derive(Debug, Clone)]
pub struct HttpIngestionSink {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpIngestionSink {
    /// Sink for `<origin>/api/errors`
    pub fn for_origin(origin: &str, timeout: Duration) -> Result<Self, SinkError> {
        let endpoint = format!("{}{}", origin.trim_end_matches('/'), INGESTION_PATH);
        Self::new(endpoint, timeout)
    }

    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, SinkError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(SinkError::Client)?;
        Ok(Self::with_client(client, endpoint))
    }

    pub fn with_client(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ErrorSink for HttpIngestionSink {
    fn name(&self) -> &str {
        "ingestion"
    }

    async fn forward(&self, report: &ErrorReport) -> Result<(), SinkError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(report)
            .send()
            .await
            .map_err(|source| SinkError::Http {
                endpoint: self.endpoint.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SinkError::Rejected {
                endpoint: self.endpoint.clone(),
                status: status.as_u16(),
            });
        }

        debug!(endpoint = %self.endpoint, code = %report.error.code, "Forwarded error report");
        Ok(())
    }
}
