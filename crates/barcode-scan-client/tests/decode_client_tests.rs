//! Integration tests for response handling in the decode client.

mod common;

use std::sync::Arc;

use barcode_scan_client::{DEFAULT_DECODE_ENDPOINT, DecodeClient, DecodeError};
use barcode_scan_core::{DecodeOutcome, FAILURE_MESSAGE};
use serde_json::json;

#[tokio::test]
async fn decode_client_tests_wraps_json_body_as_success() {
    let transport = Arc::new(common::CannedTransport::json(
        200,
        r#"{"success": true, "data": "012345"}"#,
    ));
    let client = DecodeClient::new(DEFAULT_DECODE_ENDPOINT, transport.clone())
        .expect("client should build");

    let outcome = client.decode(common::fixture_payload()).await;
    let DecodeOutcome::Success { payload } = outcome else {
        panic!("expected success, got {outcome:?}");
    };
    assert_eq!(
        serde_json::Value::Object(payload),
        json!({"success": true, "data": "012345"})
    );
    assert_eq!(transport.requests(), 1);
}

#[tokio::test]
async fn decode_client_tests_ignores_http_error_status() {
    let transport = Arc::new(common::CannedTransport::json(
        400,
        r#"{"success": false, "error": "No image provided"}"#,
    ));
    let client = DecodeClient::new(DEFAULT_DECODE_ENDPOINT, transport).expect("client should build");

    let body = client
        .submit(common::fixture_payload())
        .await
        .expect("error status with JSON body is still a response");
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "No image provided");
}

#[tokio::test]
async fn decode_client_tests_collapses_failures_into_generic_message() {
    let cases = [
        common::CannedTransport::failing(DecodeError::Transport("connection refused".to_string())),
        common::CannedTransport::json(500, "Internal Server Error"),
        common::CannedTransport::json(200, "\"just a string\""),
    ];

    for transport in cases {
        let client = DecodeClient::new(DEFAULT_DECODE_ENDPOINT, Arc::new(transport))
            .expect("client should build");
        let outcome = client.decode(common::fixture_payload()).await;
        assert_eq!(outcome.error_message(), Some(FAILURE_MESSAGE));
    }
}

#[test]
fn decode_client_tests_rejects_invalid_endpoint() {
    let transport = Arc::new(common::CannedTransport::json(200, "{}"));
    let error = DecodeClient::new("file:///tmp/decode", transport)
        .err()
        .expect("file scheme should be rejected");
    assert_eq!(error.kind(), "invalid_endpoint");
}
