use realty_core::config::{Config, ConfigBuilder, ConfigError, LogFormat};
use realty_core::error::AppError;
use realty_core::error_handler::ErrorHandler;
use serial_test::serial;
use std::fs;
use std::time::Duration;
use tempfile::NamedTempFile;

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.retry.base_delay, Duration::from_secs(1));
    assert_eq!(config.retry.max_delay, Duration::from_secs(30));
    assert_eq!(config.retry.multiplier, 2.0);
    assert_eq!(config.retry.max_jitter, Duration::from_secs(1));
    assert_eq!(config.tracking.capacity, 100);
    assert_eq!(config.tracking.recent_limit, 10);
    assert!(config.tracking.telemetry_enabled);
    assert!(config.tracking.ingestion_origin.is_none());
    assert_eq!(config.observability.logging.level, "info");
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_builder() {
    let config = ConfigBuilder::new()
        .base_delay(Duration::from_millis(250))
        .max_delay(Duration::from_secs(5))
        .multiplier(3.0)
        .max_jitter(Duration::ZERO)
        .max_attempts(3)
        .capacity(20)
        .page_url("https://homes.example/search")
        .user_agent("test-agent")
        .ingestion_origin("https://homes.example")
        .log_level("debug")
        .build()
        .unwrap();

    assert_eq!(config.retry.base_delay, Duration::from_millis(250));
    assert_eq!(config.retry.max_attempts, 3);
    assert_eq!(config.tracking.capacity, 20);
    assert_eq!(config.tracking.page_url, "https://homes.example/search");
    assert_eq!(
        config.tracking.ingestion_origin.as_deref(),
        Some("https://homes.example")
    );

    let policy = config.retry.policy();
    assert_eq!(policy.base_delay, Duration::from_millis(250));
    assert_eq!(policy.multiplier, 3.0);
}

#[test]
#[serial]
fn test_load_from_toml() {
    let toml_content = r#"
[retry]
base_delay = "500ms"
max_delay = "10s"
multiplier = 1.5
max_jitter = "250ms"
max_attempts = 4

[tracking]
capacity = 50
page_url = "https://homes.example/listing/7"
telemetry_enabled = false
ingestion_origin = "http://localhost:3000"
ingestion_timeout = "2s"

[observability.logging]
level = "warn"
format = "compact"
"#;

    let temp_file = NamedTempFile::new().unwrap();
    fs::write(temp_file.path(), toml_content).unwrap();

    let config = Config::from_file(temp_file.path()).unwrap();

    assert_eq!(config.retry.base_delay, Duration::from_millis(500));
    assert_eq!(config.retry.max_delay, Duration::from_secs(10));
    assert_eq!(config.retry.multiplier, 1.5);
    assert_eq!(config.retry.max_jitter, Duration::from_millis(250));
    assert_eq!(config.retry.max_attempts, 4);

    assert_eq!(config.tracking.capacity, 50);
    assert!(!config.tracking.telemetry_enabled);
    assert_eq!(
        config.tracking.ingestion_origin.as_deref(),
        Some("http://localhost:3000")
    );
    assert_eq!(config.tracking.ingestion_timeout, Duration::from_secs(2));

    assert_eq!(config.observability.logging.level, "warn");
    assert_eq!(config.observability.logging.format, LogFormat::Compact);
}

#[test]
#[serial]
fn test_partial_config() {
    let toml_content = r#"
[tracking]
capacity = 7
"#;

    let temp_file = NamedTempFile::new().unwrap();
    fs::write(temp_file.path(), toml_content).unwrap();

    let config = Config::from_file(temp_file.path()).unwrap();

    assert_eq!(config.tracking.capacity, 7);
    // Default values
    assert_eq!(config.retry.base_delay, Duration::from_secs(1));
    assert_eq!(config.tracking.recent_limit, 10);
    assert_eq!(config.observability.logging.format, LogFormat::Pretty);
}

#[test]
fn test_missing_file() {
    let result = Config::from_file("/nonexistent/realty.toml");
    assert!(matches!(result, Err(ConfigError::Read { .. })));
}

#[test]
fn test_malformed_toml() {
    let temp_file = NamedTempFile::new().unwrap();
    fs::write(temp_file.path(), "[retry\nbase_delay = ").unwrap();

    let result = Config::from_file(temp_file.path());
    assert!(matches!(result, Err(ConfigError::Parse(_))));
}

#[test]
#[serial]
fn test_environment_override() {
    std::env::set_var("REALTY_LOG_LEVEL", "trace");
    std::env::set_var("REALTY_INGESTION_ORIGIN", "https://collector.example");
    std::env::set_var("REALTY_TRACKER_CAPACITY", "25");
    std::env::set_var("REALTY_PAGE_URL", "https://homes.example/");
    std::env::set_var("REALTY_USER_AGENT", "env-agent");

    let mut config = Config::default();
    config.apply_env_overrides();

    assert_eq!(config.observability.logging.level, "trace");
    assert_eq!(
        config.tracking.ingestion_origin.as_deref(),
        Some("https://collector.example")
    );
    assert_eq!(config.tracking.capacity, 25);
    assert_eq!(config.tracking.page_url, "https://homes.example/");
    assert_eq!(config.tracking.user_agent, "env-agent");

    // Clean up
    std::env::remove_var("REALTY_LOG_LEVEL");
    std::env::remove_var("REALTY_INGESTION_ORIGIN");
    std::env::remove_var("REALTY_TRACKER_CAPACITY");
    std::env::remove_var("REALTY_PAGE_URL");
    std::env::remove_var("REALTY_USER_AGENT");
}

#[test]
#[serial]
fn test_unparseable_capacity_override_is_ignored() {
    std::env::set_var("REALTY_TRACKER_CAPACITY", "lots");

    let mut config = Config::default();
    config.apply_env_overrides();
    assert_eq!(config.tracking.capacity, 100);

    std::env::remove_var("REALTY_TRACKER_CAPACITY");
}

#[test]
fn test_config_validation() {
    let mut config = Config::default();
    assert!(config.validate().is_ok());

    config.retry.base_delay = Duration::ZERO;
    assert!(config.validate().is_err());
    config.retry.base_delay = Duration::from_secs(1);

    config.retry.max_delay = Duration::from_millis(10);
    assert!(config.validate().is_err());
    config.retry.max_delay = Duration::from_secs(30);

    config.retry.multiplier = 0.5;
    assert!(config.validate().is_err());
    config.retry.multiplier = f64::NAN;
    assert!(config.validate().is_err());
    config.retry.multiplier = 2.0;

    config.retry.max_attempts = 0;
    assert!(config.validate().is_err());
    config.retry.max_attempts = 5;

    config.tracking.capacity = 0;
    assert!(config.validate().is_err());
    config.tracking.capacity = 100;

    config.tracking.ingestion_origin = Some("ftp://files.example".to_string());
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("tracking.ingestion_origin"));
    config.tracking.ingestion_origin = None;

    config.observability.logging.level = "loud".to_string();
    assert!(config.validate().is_err());
    config.observability.logging.level = "info".to_string();

    assert!(config.validate().is_ok());
}

#[test]
fn test_builder_rejects_invalid_values() {
    let result = ConfigBuilder::new().capacity(0).build();
    assert!(matches!(result, Err(ConfigError::Invalid { .. })));
}

#[test]
#[serial]
fn test_sub_millisecond_base_delay_keeps_network_errors_retrying() {
    let toml_content = r#"
[retry]
base_delay = "500us"
max_jitter = "0s"
"#;

    let temp_file = NamedTempFile::new().unwrap();
    fs::write(temp_file.path(), toml_content).unwrap();

    let config = Config::from_file(temp_file.path()).unwrap();
    assert_eq!(config.retry.base_delay, Duration::from_micros(500));

    let handler = ErrorHandler::from_config(&config);
    let err = AppError::connection_failed();
    for attempt in 0..4 {
        let delay = handler.retry_delay(&err, attempt);
        assert_eq!(delay, Duration::from_micros(500) * 2u32.pow(attempt));
    }
}
