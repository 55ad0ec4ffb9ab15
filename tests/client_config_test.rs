//! Tests for ClientConfig loading and overrides.

use std::fs;
use std::time::Duration;
use tempfile::TempDir;

use tictactoe_client::{COMPUTER_DELAY_ENV, ClientConfig, SERVICE_URL_ENV, StaleTurnPolicy};

fn write_config(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("client.toml");
    fs::write(&path, content).expect("Failed to write TOML");
    path
}

#[test]
fn test_defaults() {
    let config = ClientConfig::default();
    assert_eq!(config.service_url(), "http://127.0.0.1:5001");
    assert_eq!(config.computer_delay(), Duration::from_millis(500));
    assert_eq!(config.request_timeout(), Duration::from_secs(5));
    assert_eq!(*config.stale_turn_policy(), StaleTurnPolicy::Guarded);
}

#[test]
fn test_load_full_file() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = write_config(
        &dir,
        r#"service_url = "http://rules.local:8080"
computer_delay_ms = 250
request_timeout_ms = 1000
stale_turn_policy = "fire_and_forget"
"#,
    );

    let config = ClientConfig::from_file(&path).expect("Load failed");

    assert_eq!(config.service_url(), "http://rules.local:8080");
    assert_eq!(*config.computer_delay_ms(), 250);
    assert_eq!(config.request_timeout(), Duration::from_secs(1));
    assert_eq!(*config.stale_turn_policy(), StaleTurnPolicy::FireAndForget);
}

#[test]
fn test_missing_keys_take_defaults() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = write_config(&dir, "computer_delay_ms = 0\n");

    let config = ClientConfig::from_file(&path).expect("Load failed");

    assert_eq!(config.computer_delay(), Duration::ZERO);
    assert_eq!(config.service_url(), ClientConfig::default().service_url());
}

#[test]
fn test_invalid_toml_is_rejected() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = write_config(&dir, "stale_turn_policy = \"sometimes\"\n");

    let err = ClientConfig::from_file(&path).expect_err("Bad policy should fail");
    assert!(err.message.contains("Failed to parse config"));
}

#[test]
fn test_missing_file_is_rejected() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let err = ClientConfig::from_file(dir.path().join("absent.toml"))
        .expect_err("Missing file should fail");
    assert!(err.message.contains("Failed to read config file"));
}

#[test]
fn test_overrides_from_lookup() {
    let config = ClientConfig::default()
        .with_overrides_from(|key| match key {
            SERVICE_URL_ENV => Some("http://override:9000".to_string()),
            COMPUTER_DELAY_ENV => Some("75".to_string()),
            _ => None,
        })
        .expect("Overrides failed");

    assert_eq!(config.service_url(), "http://override:9000");
    assert_eq!(config.computer_delay(), Duration::from_millis(75));
}

#[test]
fn test_bad_delay_override_is_rejected() {
    let result = ClientConfig::default().with_overrides_from(|key| {
        (key == COMPUTER_DELAY_ENV).then(|| "soon".to_string())
    });
    assert!(result.is_err());
}

#[test]
fn test_builder_setters() {
    let config = ClientConfig::default()
        .with_service_url("http://elsewhere")
        .with_computer_delay(Duration::from_millis(20))
        .with_stale_turn_policy(StaleTurnPolicy::FireAndForget);

    assert_eq!(config.service_url(), "http://elsewhere");
    assert_eq!(*config.computer_delay_ms(), 20);
    assert_eq!(*config.stale_turn_policy(), StaleTurnPolicy::FireAndForget);
}
