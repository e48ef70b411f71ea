#![warn(missing_docs)]
//! # barcode-scan-core
//!
//! ## Purpose
//! Defines the pure data model shared across the `barcode-scan` workspace.
//!
//! ## Responsibilities
//! - Represent the acquired still image and which source produced it.
//! - Represent the terminal outcome of one decode submission.
//! - Represent the mutually exclusive session phases.
//! - Provide the monotonically increasing submission sequence number.
//!
//! ## Data flow
//! Capture or file selection produces an [`AcquiredImage`]. The session turns
//! it into a submission tagged with a [`SubmissionId`], and the decode client
//! eventually yields a [`DecodeOutcome`] that settles the [`SessionPhase`].
//!
//! ## Ownership and lifetimes
//! Images and outcomes own their buffers (`String`, `Vec<u8>`, JSON maps) so
//! the session can hold them without borrowing from transient event payloads.
//!
//! ## Error model
//! Constructors reject empty inputs with [`CoreError`]. Every failure surfaced
//! to presentation is flattened into [`DecodeOutcome::Failure`] carrying
//! [`FAILURE_MESSAGE`].
//!
//! ## Example
//! ```rust
//! use barcode_scan_core::{AcquiredImage, ImageSource, SessionPhase};
//!
//! let image = AcquiredImage::camera("data:image/jpeg;base64,/9j/").unwrap();
//! assert_eq!(image.source(), ImageSource::Camera);
//! assert!(matches!(SessionPhase::default(), SessionPhase::Idle));
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Message shown for every failed decode attempt, whatever the cause.
pub const FAILURE_MESSAGE: &str = "Failed to decode barcode. Please try again.";

/// Opaque JSON object returned by the decode service.
pub type ResponseBody = serde_json::Map<String, serde_json::Value>;

/// Acquisition path that produced the current image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageSource {
    /// Live camera snapshot.
    Camera,
    /// File chosen from storage.
    Upload,
}

/// One still image ready for submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcquiredImage {
    /// Snapshot from the capture device, encoded as a data URI.
    CameraFrame {
        /// Self-describing image data string (`data:image/...;base64,...`).
        encoded_image: String,
    },
    /// File handed over by the picker.
    UploadedFile {
        /// Raw file contents.
        blob: Vec<u8>,
        /// Filename declared by the picker.
        filename: String,
        /// Declared MIME type, when the picker reported one.
        content_type: Option<String>,
    },
}

impl AcquiredImage {
    /// Creates a camera frame.
    ///
    /// # Errors
    /// Returns [`CoreError::EmptyCapture`] when `encoded_image` is blank.
    pub fn camera(encoded_image: impl Into<String>) -> Result<Self, CoreError> {
        let encoded_image = encoded_image.into();
        if encoded_image.trim().is_empty() {
            return Err(CoreError::EmptyCapture);
        }
        Ok(Self::CameraFrame { encoded_image })
    }

    /// Creates an uploaded file image.
    ///
    /// # Errors
    /// Returns [`CoreError::EmptyUpload`] when `blob` has no bytes.
    pub fn upload(
        blob: Vec<u8>,
        filename: impl Into<String>,
        content_type: Option<String>,
    ) -> Result<Self, CoreError> {
        if blob.is_empty() {
            return Err(CoreError::EmptyUpload);
        }
        Ok(Self::UploadedFile {
            blob,
            filename: filename.into(),
            content_type,
        })
    }

    /// Returns the acquisition path for this image.
    pub fn source(&self) -> ImageSource {
        match self {
            Self::CameraFrame { .. } => ImageSource::Camera,
            Self::UploadedFile { .. } => ImageSource::Upload,
        }
    }
}

/// Terminal result of one submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DecodeOutcome {
    /// The service answered with a JSON object. Its shape is not interpreted.
    Success {
        /// Parsed response body.
        payload: ResponseBody,
    },
    /// Submission could not complete: malformed capture, transport, or parse failure.
    Failure {
        /// Displayable message.
        message: String,
    },
}

impl DecodeOutcome {
    /// Builds the generic failure outcome.
    pub fn failure() -> Self {
        Self::Failure {
            message: FAILURE_MESSAGE.to_string(),
        }
    }

    /// Returns `true` for [`DecodeOutcome::Success`].
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Returns the failure message, if any.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Failure { message } => Some(message),
            Self::Success { .. } => None,
        }
    }

    /// Returns the success payload, if any.
    pub fn payload(&self) -> Option<&ResponseBody> {
        match self {
            Self::Success { payload } => Some(payload),
            Self::Failure { .. } => None,
        }
    }
}

/// Session phase; exactly one is active.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SessionPhase {
    /// Nothing submitted, or the session was reset.
    #[default]
    Idle,
    /// A submission is in flight.
    Submitting,
    /// The latest submission finished.
    Settled(DecodeOutcome),
}

impl SessionPhase {
    /// Returns the settled outcome, if any.
    pub fn outcome(&self) -> Option<&DecodeOutcome> {
        match self {
            Self::Settled(outcome) => Some(outcome),
            Self::Idle | Self::Submitting => None,
        }
    }

    /// Short name used in logs and status projections.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Submitting => "submitting",
            Self::Settled(DecodeOutcome::Success { .. }) => "settled_success",
            Self::Settled(DecodeOutcome::Failure { .. }) => "settled_failure",
        }
    }
}

/// Sequence number identifying one submission.
///
/// Ids only grow; a resolution is relevant only while its id is the latest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SubmissionId(u64);

impl SubmissionId {
    /// Returns the following id.
    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// Raw sequence value.
    pub fn value(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Error type for core model validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// Capture produced no image data.
    #[error("captured image is empty")]
    EmptyCapture,
    /// Selected file has no bytes.
    #[error("uploaded file is empty")]
    EmptyUpload,
}
