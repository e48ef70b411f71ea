#![warn(missing_docs)]
//! # barcode-scan-session
//!
//! ## Purpose
//! Owns the acquisition-and-submission state of one scan session.
//!
//! ## Responsibilities
//! - Track the single current image and which source produced it.
//! - Move between `Idle`, `Submitting`, and `Settled` with explicit transitions.
//! - Build the payload synchronously when an image is selected.
//! - Tag each submission with a [`SubmissionId`] and discard stale results.
//! - Hold the preview handle of the current upload and release it on
//!   replacement or reset.
//!
//! ## Data flow
//! Selection -> [`Selection::Pending`] handed to the caller -> decode client
//! runs -> caller calls [`ScanSession::resolve`] with the outcome.
//!
//! ## Ownership and lifetimes
//! The session exclusively owns the current [`AcquiredImage`] and outcome.
//! A pending submission carries its own payload copy, so no borrow of the
//! session is needed while the request is in flight.
//!
//! ## Error model
//! Selections never fail. Malformed captures settle as a failure outcome
//! right away; empty inputs are ignored.
//!
//! ## Example
//! ```rust
//! use barcode_scan_core::{DecodeOutcome, SessionPhase};
//! use barcode_scan_session::{ScanSession, Selection};
//!
//! let mut session = ScanSession::new();
//! let Selection::Pending(pending) = session.select_camera("data:image/jpeg;base64,/9j/4A==") else {
//!     panic!("valid capture should submit");
//! };
//! assert!(session.is_busy());
//! assert!(session.resolve(pending.id, DecodeOutcome::failure()));
//! assert!(matches!(session.phase(), SessionPhase::Settled(_)));
//! ```

use barcode_scan_capture::{
    FileSelection, FrameSource, PreviewHandle, PreviewKey, PreviewRegistry, SelectedFile,
};
use barcode_scan_core::{AcquiredImage, DecodeOutcome, ImageSource, SessionPhase, SubmissionId};
use barcode_scan_payload::{MultipartPayload, build_payload};

/// Submission waiting for the decode client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSubmission {
    /// Sequence number to pass back to [`ScanSession::resolve`].
    pub id: SubmissionId,
    /// Source of the submitted image.
    pub source: ImageSource,
    /// Request body.
    pub payload: MultipartPayload,
}

/// Effect of a selection event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Input was empty; nothing changed.
    Ignored,
    /// Payload could not be built; the session already settled as a failure.
    Settled,
    /// The caller must submit this payload and resolve the outcome.
    Pending(PendingSubmission),
}

#[derive(Debug)]
struct CurrentImage {
    image: AcquiredImage,
    preview: Option<PreviewHandle>,
}

/// Session state machine.
#[derive(Debug, Default)]
pub struct ScanSession {
    phase: SessionPhase,
    current: Option<CurrentImage>,
    latest: SubmissionId,
    previews: PreviewRegistry,
}

impl ScanSession {
    /// Creates an idle session with its own preview registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an idle session that registers previews in `previews`.
    pub fn with_previews(previews: PreviewRegistry) -> Self {
        Self {
            previews,
            ..Self::default()
        }
    }

    /// Selects a camera snapshot and starts a submission.
    pub fn select_camera(&mut self, encoded_image: impl Into<String>) -> Selection {
        match AcquiredImage::camera(encoded_image) {
            Ok(image) => self.begin(image, None),
            Err(error) => {
                tracing::debug!(%error, "ignoring camera selection");
                Selection::Ignored
            }
        }
    }

    /// Selects an uploaded file and starts a submission.
    pub fn select_upload(&mut self, file: SelectedFile) -> Selection {
        if file.bytes.is_empty() {
            tracing::debug!(filename = %file.filename, "ignoring empty upload");
            return Selection::Ignored;
        }

        let preview = self.previews.register(&file);
        match file.into_acquired() {
            Ok(image) => self.begin(image, Some(preview)),
            Err(error) => {
                tracing::debug!(%error, "ignoring upload selection");
                Selection::Ignored
            }
        }
    }

    /// Pulls the current frame from `source`; a camera that is not ready is a no-op.
    pub fn capture_from(&mut self, source: &dyn FrameSource) -> Selection {
        match source.current_frame() {
            Some(frame) => self.select_camera(frame),
            None => {
                tracing::debug!("camera has no frame yet");
                Selection::Ignored
            }
        }
    }

    /// Handles a picker event; an event with no file is a no-op.
    pub fn select_from_picker(&mut self, selection: FileSelection) -> Selection {
        match selection.into_first() {
            Some(file) => self.select_upload(file),
            None => Selection::Ignored,
        }
    }

    /// Clears image and outcome and returns to `Idle`.
    ///
    /// A submission still in flight becomes stale; its result will be dropped.
    pub fn reset(&mut self) {
        self.latest = self.latest.next();
        self.current = None;
        self.phase = SessionPhase::Idle;
        tracing::debug!(sequence = %self.latest, "session reset");
    }

    /// Applies the outcome of submission `id`.
    ///
    /// Returns `false` and leaves the session untouched when `id` is not the
    /// latest submission or the session is no longer submitting.
    pub fn resolve(&mut self, id: SubmissionId, outcome: DecodeOutcome) -> bool {
        if id != self.latest || self.phase != SessionPhase::Submitting {
            tracing::debug!(
                submission = %id,
                latest = %self.latest,
                phase = self.phase.label(),
                "discarding stale decode result"
            );
            return false;
        }

        self.phase = SessionPhase::Settled(outcome);
        tracing::debug!(submission = %id, phase = self.phase.label(), "submission settled");
        true
    }

    /// Current phase.
    pub fn phase(&self) -> &SessionPhase {
        &self.phase
    }

    /// Returns `true` while a submission is in flight.
    pub fn is_busy(&self) -> bool {
        self.phase == SessionPhase::Submitting
    }

    /// Current image, if any.
    pub fn current_image(&self) -> Option<&AcquiredImage> {
        self.current.as_ref().map(|current| &current.image)
    }

    /// Source of the current image.
    pub fn image_source(&self) -> Option<ImageSource> {
        self.current_image().map(AcquiredImage::source)
    }

    /// Settled outcome, if any.
    pub fn outcome(&self) -> Option<&DecodeOutcome> {
        self.phase.outcome()
    }

    /// Failure message of the settled outcome, if any.
    pub fn error(&self) -> Option<&str> {
        self.outcome().and_then(DecodeOutcome::error_message)
    }

    /// Preview key of the current upload.
    pub fn preview(&self) -> Option<PreviewKey> {
        self.current
            .as_ref()
            .and_then(|current| current.preview.as_ref())
            .map(PreviewHandle::key)
    }

    /// Registry the session registers previews in.
    pub fn previews(&self) -> &PreviewRegistry {
        &self.previews
    }

    /// Sequence number of the most recent submission or reset.
    pub fn latest_submission(&self) -> SubmissionId {
        self.latest
    }

    fn begin(&mut self, image: AcquiredImage, preview: Option<PreviewHandle>) -> Selection {
        self.latest = self.latest.next();
        let id = self.latest;
        let source = image.source();
        let built = build_payload(&image);

        self.current = Some(CurrentImage { image, preview });
        self.phase = SessionPhase::Submitting;
        tracing::debug!(submission = %id, ?source, "submission started");

        match built {
            Ok(payload) => Selection::Pending(PendingSubmission {
                id,
                source,
                payload,
            }),
            Err(error) => {
                tracing::warn!(submission = %id, kind = "payload", %error, "capture could not be encoded");
                self.phase = SessionPhase::Settled(DecodeOutcome::failure());
                Selection::Settled
            }
        }
    }
}
