//! Shared fixtures for session integration tests.

use barcode_scan_capture::{SelectedFile, encode_data_uri};
use barcode_scan_core::{DecodeOutcome, ResponseBody};
use serde_json::Value;

/// Valid webcam-style capture.
#[allow(dead_code)]
pub fn capture_uri() -> String {
    encode_data_uri("image/jpeg", &[0xff, 0xd8, 0xff, 0xe0, 0x00, 0x10])
}

/// Non-empty upload fixture.
#[allow(dead_code)]
pub fn upload(name: &str) -> SelectedFile {
    SelectedFile::new(vec![0x89, 0x50, 0x4e, 0x47], name, Some("image/png".to_string()))
}

/// Success outcome built from a JSON object literal.
#[allow(dead_code)]
pub fn success(value: Value) -> DecodeOutcome {
    let payload: ResponseBody = match value {
        Value::Object(map) => map,
        _ => panic!("fixture must be an object"),
    };
    DecodeOutcome::Success { payload }
}
