use realty_core::config::ConfigBuilder;
use realty_core::error::{AppError, ErrorKind, Failure};
use realty_core::error_handler::ErrorHandler;
use realty_core::patterns::{retry, RetryConfig};
use realty_core::{ErrorReporter, ErrorTracker, PartialErrorContext};
use serde_json::json;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[test]
fn test_validation_then_network_scenario() {
    let tracker = ErrorTracker::new(100);

    let validation = AppError::validation("Asking price is required").with_detail("field", "price");
    let network = AppError::connection_failed();
    tracker.track_error(&validation, PartialErrorContext::new());
    tracker.track_error(&network, PartialErrorContext::new());

    let stats = tracker.error_stats();
    assert_eq!(stats.total, 2);
    assert_eq!(stats.by_code.get("VALIDATION_ERROR"), Some(&1));
    assert_eq!(stats.by_code.get("NETWORK_ERROR"), Some(&1));
    assert_eq!(stats.by_status_code.get(&400), Some(&1));
    assert_eq!(stats.by_status_code.get(&0), Some(&1));
    assert_eq!(stats.recent[0].error, validation);
    assert_eq!(stats.recent[1].error, network);

    assert_eq!(
        ErrorHandler::user_friendly_message(&validation),
        "Please check your input and try again."
    );
    assert_eq!(
        ErrorHandler::user_friendly_message(&network),
        "Please check your internet connection and try again."
    );
    assert!(!ErrorHandler::is_retryable(&validation));
    assert!(ErrorHandler::is_retryable(&network));
}

#[test]
fn test_unknown_value_is_reported_as_unexpected() {
    let config = ConfigBuilder::new().telemetry_enabled(false).build().unwrap();
    let reporter = ErrorReporter::from_config(&config).unwrap();

    let error = reporter.report(
        Failure::from(json!({ "weird": [1, 2, 3] })),
        "listing page",
        PartialErrorContext::new(),
    );

    assert_eq!(error.kind(), ErrorKind::Database);
    assert_eq!(error.message(), "An unexpected error occurred");
    assert_eq!(error.detail("originalError"), Some(&json!({ "weird": [1, 2, 3] })));
    assert_eq!(
        ErrorHandler::user_friendly_message(&error),
        "Something went wrong. Please try again later."
    );
    assert_eq!(reporter.tracker().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_retry_driver_recovers_and_tracks_failures() {
    let config = ConfigBuilder::new()
        .base_delay(Duration::from_millis(100))
        .max_jitter(Duration::ZERO)
        .telemetry_enabled(false)
        .build()
        .unwrap();
    let reporter = ErrorReporter::from_config(&config).unwrap();
    let calls = Arc::new(AtomicU32::new(0));

    let result = retry(
        reporter.handler(),
        &RetryConfig::from_policy_config(&config.retry).with_operation_name("load_listings"),
        || {
            let calls = Arc::clone(&calls);
            let reporter = reporter.clone();
            async move {
                if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(reporter.report(
                        AppError::network("listing service unreachable"),
                        "load_listings",
                        PartialErrorContext::new(),
                    ))
                } else {
                    Ok(vec!["12 Oak St", "4 Elm Ave"])
                }
            }
        },
    )
    .await
    .unwrap();

    assert_eq!(result.len(), 2);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert_eq!(reporter.tracker().error_stats().by_code.get("NETWORK_ERROR"), Some(&2));
}
