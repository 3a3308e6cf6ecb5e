pub mod config;
pub mod error;
pub mod error_handler;
pub mod error_tracking;
pub mod observability;
pub mod patterns;
pub mod reporting;

pub use error::{AppError, AppResult, ErrorKind, Failure};
pub use error_handler::{ErrorHandler, RetryPolicy};
pub use error_tracking::{ErrorContext, ErrorStats, ErrorTracker, PartialErrorContext};
pub use reporting::ErrorReporter;
