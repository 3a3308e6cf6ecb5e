//! Bounded tracking of recent errors with best-effort forwarding
//!
//! An [`ErrorTracker`] keeps the most recent (error, context) pairs in
//! insertion order, evicting the oldest once it is full, and hands every
//! tracked error to its sinks without making the caller wait.
//!
//! Trackers are constructed explicitly and shared with `Arc`; there is no
//! process-wide instance, so independent trackers never share a buffer.
//!
//! ```rust
//! use realty_core::error::AppError;
//! use realty_core::error_tracking::{ErrorTracker, PartialErrorContext};
//!
//! let tracker = ErrorTracker::new(100);
//! tracker.track_error(&AppError::validation("Bad price"), PartialErrorContext::new());
//! assert_eq!(tracker.error_stats().total, 1);
//! ```

pub mod context;
pub mod sinks;

pub use context::{AmbientContext, ErrorContext, PartialErrorContext};
pub use sinks::{
    ErrorPayload, ErrorReport, ErrorSink, HttpIngestionSink, SinkError, TracingTelemetrySink,
    INGESTION_PATH,
};

use crate::config::TrackingConfig;
use crate::error::AppError;
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::{debug, warn, Instrument};

pub const DEFAULT_CAPACITY: usize = 100;
pub const DEFAULT_RECENT_LIMIT: usize = 10;

/// Number of entries included in [`ErrorStats::recent`]
pub const STATS_RECENT_ENTRIES: usize = 5;

/// A tracked error and the context it was recorded with
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorLogEntry {
    pub error: AppError,
    pub context: ErrorContext,
}

/// Aggregate view over the tracker's buffer
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorStats {
    pub total: usize,
    pub by_code: BTreeMap<String, usize>,
    pub by_status_code: BTreeMap<u16, usize>,
    /// Most recent entries, oldest first
    pub recent: Vec<ErrorLogEntry>,
}

pub struct ErrorTracker {
    entries: Mutex<VecDeque<ErrorLogEntry>>,
    capacity: usize,
    recent_limit: usize,
    ambient: AmbientContext,
    sinks: Vec<Arc<dyn ErrorSink>>,
}

impl ErrorTracker {
    /// Create a tracker with no sinks and an empty ambient context
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
            recent_limit: DEFAULT_RECENT_LIMIT,
            ambient: AmbientContext::default(),
            sinks: Vec::new(),
        }
    }

    /// Create a tracker with the sinks the configuration asks for
    pub fn from_config(config: &TrackingConfig) -> Result<Self, SinkError> {
        let mut tracker = Self::new(config.capacity)
            .with_recent_limit(config.recent_limit)
            .with_ambient(AmbientContext::new(&config.page_url, &config.user_agent));

        if config.telemetry_enabled {
            tracker = tracker.with_sink(Arc::new(TracingTelemetrySink));
        }
        if let Some(origin) = &config.ingestion_origin {
            let sink = HttpIngestionSink::for_origin(origin, config.ingestion_timeout)?;
            debug!(endpoint = sink.endpoint(), "Forwarding tracked errors to ingestion endpoint");
            tracker = tracker.with_sink(Arc::new(sink));
        }

        Ok(tracker)
    }

    pub fn with_ambient(mut self, ambient: AmbientContext) -> Self {
        self.ambient = ambient;
        self
    }

    pub fn with_recent_limit(mut self, limit: usize) -> Self {
        self.recent_limit = limit;
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn ErrorSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Record an error and forward it to every sink
    ///
    /// The error is buffered before any forwarding starts. Forwarding runs on
    /// tasks spawned onto the current tokio runtime and is never awaited
    /// here; without a runtime it is skipped. Sink failures are logged and
    /// never returned. Returns the context that was recorded.
    pub fn track_error(&self, error: &AppError, context: PartialErrorContext) -> ErrorContext {
        let context = self.ambient.materialize(context);

        {
            let mut entries = self.entries.lock();
            entries.push_back(ErrorLogEntry {
                error: error.clone(),
                context: context.clone(),
            });
            while entries.len() > self.capacity {
                entries.pop_front();
            }
        }

        debug!(
            code = error.code(),
            status_code = error.status_code(),
            "Tracked error"
        );

        self.forward(ErrorReport::new(error, context.clone()));
        context
    }

    fn forward(&self, report: ErrorReport) {
        if self.sinks.is_empty() {
            return;
        }

        let handle = match Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                debug!("No async runtime available, skipping error forwarding");
                return;
            }
        };

        let report = Arc::new(report);
        for sink in &self.sinks {
            let sink = Arc::clone(sink);
            let report = Arc::clone(&report);
            let span = tracing::debug_span!("forward_error", sink = sink.name());
            handle.spawn(
                async move {
                    if let Err(e) = sink.forward(&report).await {
                        warn!("Failed to forward error report: {}", e);
                    }
                }
                .instrument(span),
            );
        }
    }

    /// The last `limit` entries, oldest first
    pub fn recent_errors(&self, limit: usize) -> Vec<ErrorLogEntry> {
        let entries = self.entries.lock();
        let skip = entries.len().saturating_sub(limit);
        entries.iter().skip(skip).cloned().collect()
    }

    /// The last entries up to the configured recent limit
    pub fn latest_errors(&self) -> Vec<ErrorLogEntry> {
        self.recent_errors(self.recent_limit)
    }

    pub fn clear_errors(&self) {
        self.entries.lock().clear();
    }

    /// Counts by code and status, plus the most recent entries
    pub fn error_stats(&self) -> ErrorStats {
        let entries = self.entries.lock();
        let mut by_code = BTreeMap::new();
        let mut by_status_code = BTreeMap::new();

        for entry in entries.iter() {
            *by_code.entry(entry.error.code().to_string()).or_insert(0) += 1;
            *by_status_code.entry(entry.error.status_code()).or_insert(0) += 1;
        }

        let skip = entries.len().saturating_sub(STATS_RECENT_ENTRIES);
        ErrorStats {
            total: entries.len(),
            by_code,
            by_status_code,
            recent: entries.iter().skip(skip).cloned().collect(),
        }
    }
}

impl Default for ErrorTracker {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl std::fmt::Debug for ErrorTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErrorTracker")
            .field("capacity", &self.capacity)
            .field("len", &self.len())
            .field("ambient", &self.ambient)
            .field(
                "sinks",
                &self.sinks.iter().map(|s| s.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}
