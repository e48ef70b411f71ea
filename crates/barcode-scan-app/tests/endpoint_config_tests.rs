//! Integration tests for decode endpoint configuration.

use barcode_scan_app::{AppConfig, AppError, ENDPOINT_ENV_VAR, ScanController};
use barcode_scan_client::DEFAULT_DECODE_ENDPOINT;

#[test]
fn endpoint_config_tests_defaults_when_unset_or_blank() {
    let unset = AppConfig::from_lookup(|_| None).expect("default should be valid");
    assert_eq!(unset.endpoint.as_str(), DEFAULT_DECODE_ENDPOINT);

    let blank = AppConfig::from_lookup(|_| Some("  ".to_string())).expect("blank falls back");
    assert_eq!(blank.endpoint.as_str(), DEFAULT_DECODE_ENDPOINT);
}

#[test]
fn endpoint_config_tests_applies_override() {
    let config = AppConfig::from_lookup(|key| {
        (key == ENDPOINT_ENV_VAR).then(|| "https://scanner.example.test/v1/decode".to_string())
    })
    .expect("override should be valid");
    assert_eq!(config.endpoint.host_str(), Some("scanner.example.test"));
    assert_eq!(config.endpoint.path(), "/v1/decode");
}

#[test]
fn endpoint_config_tests_controller_uses_configured_endpoint() {
    let config = AppConfig::from_lookup(|_| Some("http://127.0.0.1:6100/decode-barcode".to_string()))
        .expect("override should be valid");
    let controller = ScanController::from_config(&config);

    assert_eq!(controller.client().endpoint(), &config.endpoint);
    assert!(!controller.view().busy);
}

#[test]
fn endpoint_config_tests_rejects_invalid_override() {
    let error = AppConfig::from_lookup(|_| Some("localhost:5002".to_string()))
        .expect_err("scheme-less override should fail");
    assert!(matches!(error, AppError::Decode(_)));
}

#[test]
fn endpoint_config_tests_reads_process_environment() {
    // Safety:
    // - This is the only test in this binary that touches the process env.
    // - The variable is removed before returning.
    unsafe { std::env::set_var(ENDPOINT_ENV_VAR, "http://10.0.0.7:5002/decode-barcode") };
    let config = AppConfig::from_env().expect("env override should be valid");
    assert_eq!(config.endpoint.port(), Some(5002));
    assert_eq!(config.endpoint.host_str(), Some("10.0.0.7"));

    // Safety: see rationale above.
    unsafe { std::env::remove_var(ENDPOINT_ENV_VAR) };
}
