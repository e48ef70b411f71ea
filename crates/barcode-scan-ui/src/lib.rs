#![warn(missing_docs)]
//! # barcode-scan-ui
//!
//! ## Purpose
//! Projects scan session state into render-ready values.
//!
//! ## Responsibilities
//! - Expose busy state and whether capture/upload controls are enabled.
//! - Label and address the current image preview.
//! - Format success bodies as pretty JSON and a one-line summary.
//! - Surface the failure message.
//!
//! ## Data flow
//! [`barcode_scan_session::ScanSession`] -> [`ScanView::project`] -> renderer.
//!
//! ## Ownership and lifetimes
//! `ScanView` owns copies of everything it shows so renderers never borrow
//! the session across frames.
//!
//! ## Error model
//! Projection is infallible.

use barcode_scan_capture::PreviewKey;
use barcode_scan_contract::{DecodeReport, ReportStatus, inspect_response};
use barcode_scan_core::{AcquiredImage, DecodeOutcome, ImageSource};
use barcode_scan_session::ScanSession;

/// Text shown while a submission is in flight.
pub const BUSY_TEXT: &str = "Processing barcode...";

/// What the preview element should display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewSource {
    /// Registered preview of the uploaded file.
    Upload(PreviewKey),
    /// Camera data URI, displayable as-is.
    Camera(String),
}

/// Render-ready snapshot of a scan session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanView {
    /// A submission is in flight.
    pub busy: bool,
    /// Capture and upload buttons accept input.
    pub controls_enabled: bool,
    /// Busy indicator text.
    pub busy_text: Option<&'static str>,
    /// Heading above the preview.
    pub preview_label: Option<&'static str>,
    /// Preview content.
    pub preview: Option<PreviewSource>,
    /// Pretty-printed success body.
    pub result_json: Option<String>,
    /// One-line reading of the success body.
    pub summary: Option<String>,
    /// Failure message.
    pub error: Option<String>,
}

impl ScanView {
    /// Builds the view for the current session state.
    pub fn project(session: &ScanSession) -> Self {
        let busy = session.is_busy();
        let (result_json, summary, error) = match session.outcome() {
            Some(DecodeOutcome::Success { payload }) => (
                serde_json::to_string_pretty(payload).ok(),
                Some(summarize(&inspect_response(payload))),
                None,
            ),
            Some(DecodeOutcome::Failure { message }) => (None, None, Some(message.clone())),
            None => (None, None, None),
        };

        Self {
            busy,
            controls_enabled: !busy,
            busy_text: busy.then_some(BUSY_TEXT),
            preview_label: session.image_source().map(preview_label),
            preview: preview_source(session),
            result_json,
            summary,
            error,
        }
    }

    /// Returns `true` when the "try another image" control should show.
    pub fn can_retry(&self) -> bool {
        self.preview.is_some()
    }
}

/// Heading for a preview of `source`.
pub fn preview_label(source: ImageSource) -> &'static str {
    match source {
        ImageSource::Camera => "Captured Image:",
        ImageSource::Upload => "Uploaded Image:",
    }
}

/// Summarises a decode report in one line.
pub fn summarize(report: &DecodeReport) -> String {
    match report.status() {
        ReportStatus::Decoded => {
            let values = report.values();
            let listed = values
                .iter()
                .map(|(symbology, data)| match symbology {
                    Some(symbology) => format!("{symbology} {data}"),
                    None => (*data).to_string(),
                })
                .collect::<Vec<_>>()
                .join(", ");
            format!("Decoded {} barcode(s): {listed}", values.len())
        }
        ReportStatus::NotFound => "No barcode found".to_string(),
        ReportStatus::ServiceError(message) => format!("Decode service error: {message}"),
        ReportStatus::Unrecognized => "Decode service response received".to_string(),
    }
}

fn preview_source(session: &ScanSession) -> Option<PreviewSource> {
    match session.current_image()? {
        AcquiredImage::CameraFrame { encoded_image } => {
            Some(PreviewSource::Camera(encoded_image.clone()))
        }
        AcquiredImage::UploadedFile { .. } => session.preview().map(PreviewSource::Upload),
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for idle projection.

    use super::*;

    #[test]
    fn idle_session_shows_only_enabled_controls() {
        let view = ScanView::project(&ScanSession::new());
        assert!(!view.busy);
        assert!(view.controls_enabled);
        assert_eq!(view.preview_label, None);
        assert_eq!(view.preview, None);
        assert_eq!(view.error, None);
        assert!(!view.can_retry());
    }
}
