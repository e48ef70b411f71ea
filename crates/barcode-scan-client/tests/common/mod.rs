//! Shared fixtures for decode client integration tests.

use std::sync::Mutex;

use async_trait::async_trait;
use barcode_scan_client::{DecodeError, DecodeTransport, TransportResponse};
use barcode_scan_payload::{CAPTURE_FILENAME, IMAGE_FIELD_NAME, MultipartPayload};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use url::Url;

/// Transport answering every request with one canned result.
#[allow(dead_code)]
pub struct CannedTransport {
    pub result: Result<TransportResponse, DecodeError>,
    pub seen: Mutex<Vec<MultipartPayload>>,
}

#[allow(dead_code)]
impl CannedTransport {
    pub fn json(status: u16, body: &str) -> Self {
        Self {
            result: Ok(TransportResponse {
                status,
                body: body.as_bytes().to_vec(),
            }),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: DecodeError) -> Self {
        Self {
            result: Err(error),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> usize {
        self.seen.lock().expect("seen lock should work").len()
    }
}

#[async_trait]
impl DecodeTransport for CannedTransport {
    async fn post_multipart(
        &self,
        _endpoint: &Url,
        payload: MultipartPayload,
    ) -> Result<TransportResponse, DecodeError> {
        self.seen.lock().expect("seen lock should work").push(payload);
        self.result.clone()
    }
}

/// Camera-shaped payload fixture.
#[allow(dead_code)]
pub fn fixture_payload() -> MultipartPayload {
    MultipartPayload {
        field_name: IMAGE_FIELD_NAME,
        filename: CAPTURE_FILENAME.to_string(),
        content_type: Some("image/jpeg".to_string()),
        bytes: vec![0xff, 0xd8, 0xff, 0xe0, 0x00, 0x10],
    }
}

/// Serves one HTTP exchange on a local port and returns the raw request.
#[allow(dead_code)]
pub async fn serve_once(
    status_line: &'static str,
    body: &'static str,
) -> (String, tokio::task::JoinHandle<Vec<u8>>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("listener should bind");
    let address = listener.local_addr().expect("listener address");

    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.expect("client should connect");
        let request = read_request(&mut stream).await;
        let response = format!(
            "HTTP/1.1 {status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        stream
            .write_all(response.as_bytes())
            .await
            .expect("response should be written");
        stream.shutdown().await.ok();
        request
    });

    (format!("http://{address}/decode-barcode"), handle)
}

async fn read_request(stream: &mut tokio::net::TcpStream) -> Vec<u8> {
    let mut request = Vec::new();
    let mut chunk = [0_u8; 4096];
    loop {
        let read = stream.read(&mut chunk).await.expect("request should be readable");
        if read == 0 {
            break;
        }
        request.extend_from_slice(&chunk[..read]);
        if request_complete(&request) {
            break;
        }
    }
    request
}

fn request_complete(request: &[u8]) -> bool {
    let Some(header_end) = find(request, b"\r\n\r\n") else {
        return false;
    };
    let headers = String::from_utf8_lossy(&request[..header_end]).to_ascii_lowercase();
    let body = &request[header_end + 4..];

    let content_length = headers.lines().find_map(|line| {
        line.strip_prefix("content-length:")
            .and_then(|value| value.trim().parse::<usize>().ok())
    });
    match content_length {
        Some(length) => body.len() >= length,
        None => body.ends_with(b"0\r\n\r\n"),
    }
}

/// Byte-slice search.
pub fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
