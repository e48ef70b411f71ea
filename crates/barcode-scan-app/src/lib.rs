#![warn(missing_docs)]
//! # barcode-scan-app
//!
//! ## Purpose
//! Drives the scan session against the decode service.
//!
//! ## Responsibilities
//! - Load the decode endpoint from configuration.
//! - Run pending submissions through the decode client.
//! - Feed outcomes back into the session, dropping stale ones.
//! - Expose the view projection to the presentation layer.
//!
//! ## Data flow
//! Selection event -> [`barcode_scan_session::ScanSession`] ->
//! [`run_submission`] -> [`barcode_scan_client::DecodeClient`] ->
//! [`barcode_scan_session::ScanSession::resolve`] -> [`ScanView`].
//!
//! ## Ownership and lifetimes
//! [`ScanController`] keeps the session in an `Rc<RefCell<_>>` and never holds
//! a borrow across the decode request, so resets and new selections can run
//! while a submission is outstanding on the same thread.
//!
//! ## Error model
//! Decode failures end up in the session as failure outcomes. Only setup
//! problems (bad endpoint override, unreadable input file) surface as
//! [`AppError`].

pub mod config;
pub mod logging;

use std::cell::{Ref, RefCell};
use std::rc::Rc;
use std::sync::Arc;

use barcode_scan_capture::{CaptureError, FileSelection, FrameSource, SelectedFile};
use barcode_scan_client::{DecodeClient, DecodeError, HttpTransport};
use barcode_scan_core::{DecodeOutcome, SessionPhase, SubmissionId};
use barcode_scan_session::{PendingSubmission, ScanSession, Selection};
use barcode_scan_ui::ScanView;
use thiserror::Error;

pub use config::{AppConfig, ENDPOINT_ENV_VAR};

/// Build-time application version loaded from root `VERSION`.
pub const APP_VERSION: &str = env!("BARCODE_SCAN_VERSION");

/// Returns the app version sourced from root `VERSION`.
pub fn app_version() -> &'static str {
    APP_VERSION
}

/// Outcome of one submission, tagged with its sequence number.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// Submission the outcome belongs to.
    pub id: SubmissionId,
    /// Decode outcome.
    pub outcome: DecodeOutcome,
}

/// What happened to a selection handed to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Input was empty; the session did not change.
    Ignored,
    /// The session settled with this selection's outcome.
    Applied,
    /// The outcome arrived after a newer selection or a reset and was dropped.
    Discarded,
}

/// Submits one pending payload and waits for the outcome.
///
/// This is the only suspension point in the scan flow.
pub async fn run_submission(client: &DecodeClient, pending: PendingSubmission) -> Resolution {
    let PendingSubmission {
        id,
        source,
        payload,
    } = pending;
    tracing::info!(
        submission = %id,
        ?source,
        filename = %payload.filename,
        bytes = payload.bytes.len(),
        "submitting image for decode"
    );

    let outcome = client.decode(payload).await;
    Resolution { id, outcome }
}

/// Single-threaded driver pairing a session with a decode client.
#[derive(Clone)]
pub struct ScanController {
    session: Rc<RefCell<ScanSession>>,
    client: DecodeClient,
}

impl ScanController {
    /// Creates a controller over a fresh session.
    pub fn new(client: DecodeClient) -> Self {
        Self::with_session(ScanSession::new(), client)
    }

    /// Creates a controller over an existing session.
    pub fn with_session(session: ScanSession, client: DecodeClient) -> Self {
        Self {
            session: Rc::new(RefCell::new(session)),
            client,
        }
    }

    /// Creates a controller using the HTTP transport and the configured endpoint.
    pub fn from_config(config: &AppConfig) -> Self {
        let transport = Arc::new(HttpTransport::new());
        Self::new(DecodeClient::with_endpoint(config.endpoint.clone(), transport))
    }

    /// Takes a snapshot from `camera` and submits it.
    pub async fn capture(&self, camera: &dyn FrameSource) -> Completion {
        let selection = self.session.borrow_mut().capture_from(camera);
        self.drive(selection).await
    }

    /// Submits an uploaded file.
    pub async fn upload(&self, file: SelectedFile) -> Completion {
        let selection = self.session.borrow_mut().select_upload(file);
        self.drive(selection).await
    }

    /// Handles a picker event.
    pub async fn pick(&self, selection: FileSelection) -> Completion {
        let selection = self.session.borrow_mut().select_from_picker(selection);
        self.drive(selection).await
    }

    /// Returns the session to `Idle`.
    pub fn reset(&self) {
        self.session.borrow_mut().reset();
    }

    /// Render-ready snapshot.
    pub fn view(&self) -> ScanView {
        ScanView::project(&self.session.borrow())
    }

    /// Current phase snapshot.
    pub fn phase(&self) -> SessionPhase {
        self.session.borrow().phase().clone()
    }

    /// Read access to the session. Do not hold across an `.await`.
    pub fn session(&self) -> Ref<'_, ScanSession> {
        self.session.borrow()
    }

    /// Decode client in use.
    pub fn client(&self) -> &DecodeClient {
        &self.client
    }

    async fn drive(&self, selection: Selection) -> Completion {
        let pending = match selection {
            Selection::Ignored => return Completion::Ignored,
            Selection::Settled => return Completion::Applied,
            Selection::Pending(pending) => pending,
        };

        let resolution = run_submission(&self.client, pending).await;
        let applied = self
            .session
            .borrow_mut()
            .resolve(resolution.id, resolution.outcome);

        if applied {
            Completion::Applied
        } else {
            tracing::info!(submission = %resolution.id, "decode result superseded");
            Completion::Discarded
        }
    }
}

/// App integration error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Decode client setup failed.
    #[error("decode client error: {0}")]
    Decode(#[from] DecodeError),
    /// Input image could not be loaded.
    #[error("capture error: {0}")]
    Capture(#[from] CaptureError),
}
