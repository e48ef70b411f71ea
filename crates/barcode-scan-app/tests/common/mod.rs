//! Shared fixtures for app integration tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use barcode_scan_capture::SelectedFile;
use barcode_scan_client::{DecodeError, DecodeTransport, TransportResponse};
use barcode_scan_payload::MultipartPayload;
use tokio::sync::oneshot;
use url::Url;

type Reply = Result<TransportResponse, DecodeError>;

/// JSON reply with status 200.
#[allow(dead_code)]
pub fn json_reply(body: &str) -> Reply {
    Ok(TransportResponse {
        status: 200,
        body: body.as_bytes().to_vec(),
    })
}

/// Non-empty upload fixture.
#[allow(dead_code)]
pub fn upload(name: &str) -> SelectedFile {
    SelectedFile::new(vec![0x89, 0x50, 0x4e, 0x47], name, Some("image/png".to_string()))
}

/// Transport that answers every request with the same reply.
#[allow(dead_code)]
pub struct CannedTransport {
    reply: Reply,
    seen: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl CannedTransport {
    pub fn new(reply: Reply) -> Self {
        Self {
            reply,
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Filenames of the payloads posted so far.
    pub fn filenames(&self) -> Vec<String> {
        self.seen.lock().expect("seen lock should work").clone()
    }
}

#[async_trait]
impl DecodeTransport for CannedTransport {
    async fn post_multipart(&self, _endpoint: &Url, payload: MultipartPayload) -> Reply {
        self.seen
            .lock()
            .expect("seen lock should work")
            .push(payload.filename);
        self.reply.clone()
    }
}

/// Transport whose requests stay pending until the test releases them.
///
/// Requests take gates in the order they were opened.
#[allow(dead_code)]
#[derive(Default)]
pub struct GatedTransport {
    gates: Mutex<VecDeque<oneshot::Receiver<Reply>>>,
    calls: AtomicUsize,
}

#[allow(dead_code)]
impl GatedTransport {
    /// Opens the next gate; sending on it releases the matching request.
    pub fn gate(&self) -> oneshot::Sender<Reply> {
        let (sender, receiver) = oneshot::channel();
        self.gates
            .lock()
            .expect("gate lock should work")
            .push_back(receiver);
        sender
    }

    /// Number of requests received.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DecodeTransport for GatedTransport {
    async fn post_multipart(&self, _endpoint: &Url, _payload: MultipartPayload) -> Reply {
        let gate = self.gates.lock().expect("gate lock should work").pop_front();
        self.calls.fetch_add(1, Ordering::SeqCst);
        match gate {
            Some(gate) => gate
                .await
                .unwrap_or_else(|_| Err(DecodeError::Transport("gate closed".to_string()))),
            None => Err(DecodeError::Transport("no gate opened".to_string())),
        }
    }
}

/// Yields until `transport` has received `count` requests.
#[allow(dead_code)]
pub async fn wait_for_calls(transport: &GatedTransport, count: usize) {
    while transport.calls() < count {
        tokio::task::yield_now().await;
    }
}
