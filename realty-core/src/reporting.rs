//! One-call reporting path: classify, log and track
//!
//! This is the flow a UI error boundary or a data-fetching wrapper follows
//! when it catches something it cannot recover from locally.

use crate::config::Config;
use crate::error::{AppError, Failure};
use crate::error_handler::ErrorHandler;
use crate::error_tracking::{ErrorTracker, PartialErrorContext, SinkError};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct ErrorReporter {
    handler: ErrorHandler,
    tracker: Arc<ErrorTracker>,
}

impl ErrorReporter {
    pub fn new(handler: ErrorHandler, tracker: Arc<ErrorTracker>) -> Self {
        Self { handler, tracker }
    }

    /// Build the handler and a tracker with the configured sinks
    pub fn from_config(config: &Config) -> Result<Self, SinkError> {
        let tracker = ErrorTracker::from_config(&config.tracking)?;
        Ok(Self::new(ErrorHandler::from_config(config), Arc::new(tracker)))
    }

    pub fn handler(&self) -> &ErrorHandler {
        &self.handler
    }

    pub fn tracker(&self) -> &Arc<ErrorTracker> {
        &self.tracker
    }

    /// Classify a failure, log it under `source` and record it in the tracker
    pub fn report(
        &self,
        failure: impl Into<Failure>,
        source: &str,
        context: PartialErrorContext,
    ) -> AppError {
        let error = self.handler.handle(failure);
        ErrorHandler::log(&error, Some(source));
        self.tracker.track_error(&error, context);
        error
    }
}
