#![warn(missing_docs)]
//! # barcode-scan-contract
//!
//! ## Purpose
//! Reads the decode service's known response keys without requiring them.
//!
//! ## Responsibilities
//! - Extract `success`, `data`, `error`, and `barcodes[]` when present.
//! - Classify a body into a presentation-level [`ReportStatus`].
//! - Ignore malformed or unknown keys instead of failing.
//!
//! ## Data flow
//! Success payload ([`barcode_scan_core::ResponseBody`]) -> [`inspect_response`]
//! -> [`DecodeReport`] -> UI summary line.
//!
//! ## Error model
//! Inspection never fails; a body with none of the known keys is
//! [`ReportStatus::Unrecognized`].

use barcode_scan_core::ResponseBody;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Symbology reported when a barcode entry has no `type`.
pub const UNKNOWN_SYMBOLOGY: &str = "UNKNOWN";

/// One barcode read by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedBarcode {
    /// Symbology name, for example `EAN13` or `QRCODE`.
    #[serde(rename = "type")]
    pub symbology: String,
    /// Decoded text.
    pub data: String,
}

/// Known keys extracted from a response body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodeReport {
    /// `success` flag.
    pub success: Option<bool>,
    /// Single decoded value (`data`).
    pub data: Option<String>,
    /// Service error text (`error`).
    pub error: Option<String>,
    /// Barcodes listed under `barcodes`.
    pub barcodes: Vec<DecodedBarcode>,
}

/// Presentation-level reading of a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportStatus {
    /// At least one value was decoded.
    Decoded,
    /// The service processed the image but found nothing.
    NotFound,
    /// The service reported an error.
    ServiceError(String),
    /// None of the known keys were present.
    Unrecognized,
}

impl DecodeReport {
    /// Classifies the report.
    pub fn status(&self) -> ReportStatus {
        if self.success == Some(false) || (self.error.is_some() && !self.has_values()) {
            return ReportStatus::ServiceError(
                self.error
                    .clone()
                    .unwrap_or_else(|| "unspecified error".to_string()),
            );
        }
        if self.has_values() {
            return ReportStatus::Decoded;
        }
        if self.success == Some(true) {
            return ReportStatus::NotFound;
        }
        ReportStatus::Unrecognized
    }

    /// Decoded values as `(symbology, data)` pairs; a bare `data` key has no
    /// symbology.
    pub fn values(&self) -> Vec<(Option<&str>, &str)> {
        let mut values: Vec<(Option<&str>, &str)> = self
            .barcodes
            .iter()
            .map(|barcode| (Some(barcode.symbology.as_str()), barcode.data.as_str()))
            .collect();
        if let Some(data) = &self.data
            && !values.iter().any(|(_, value)| *value == data.as_str())
        {
            values.push((None, data.as_str()));
        }
        values
    }

    fn has_values(&self) -> bool {
        !self.barcodes.is_empty() || self.data.is_some()
    }
}

/// Extracts the known keys from `body`.
pub fn inspect_response(body: &ResponseBody) -> DecodeReport {
    DecodeReport {
        success: body.get("success").and_then(Value::as_bool),
        data: body.get("data").and_then(Value::as_str).map(str::to_string),
        error: body.get("error").and_then(Value::as_str).map(str::to_string),
        barcodes: body
            .get("barcodes")
            .and_then(Value::as_array)
            .map(|entries| entries.iter().filter_map(barcode_entry).collect())
            .unwrap_or_default(),
    }
}

fn barcode_entry(entry: &Value) -> Option<DecodedBarcode> {
    let data = entry.get("data")?.as_str()?;
    let symbology = entry
        .get("type")
        .and_then(Value::as_str)
        .unwrap_or(UNKNOWN_SYMBOLOGY);

    Some(DecodedBarcode {
        symbology: symbology.to_string(),
        data: data.to_string(),
    })
}
