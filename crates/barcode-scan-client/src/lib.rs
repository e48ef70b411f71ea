#![warn(missing_docs)]
//! # barcode-scan-client
//!
//! ## Purpose
//! Submits multipart image payloads to the barcode decode service.
//!
//! ## Responsibilities
//! - Validate the decode endpoint (`http` or `https`).
//! - Execute one POST per submission through an injectable transport.
//! - Parse the response body as a JSON object regardless of HTTP status.
//! - Collapse transport and parse failures into one displayable outcome.
//!
//! ## Data flow
//! [`barcode_scan_payload::MultipartPayload`] -> [`DecodeClient::submit`] ->
//! [`DecodeTransport::post_multipart`] -> [`parse_response_body`] ->
//! [`barcode_scan_core::DecodeOutcome`].
//!
//! ## Ownership and lifetimes
//! Payloads move into the transport so their bytes can become the request body
//! without another copy.
//!
//! ## Error model
//! [`DecodeError`] keeps the cause for logging. [`DecodeClient::decode`]
//! flattens it into [`barcode_scan_core::FAILURE_MESSAGE`].
//!
//! ## Example
//! ```rust
//! use barcode_scan_client::{DEFAULT_DECODE_ENDPOINT, validate_decode_endpoint};
//!
//! let url = validate_decode_endpoint(DEFAULT_DECODE_ENDPOINT).unwrap();
//! assert_eq!(url.port(), Some(5002));
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use barcode_scan_core::{DecodeOutcome, ResponseBody};
use barcode_scan_payload::MultipartPayload;
use reqwest::multipart::{Form, Part};
use thiserror::Error;
use url::Url;

/// Decode endpoint used when no override is configured.
pub const DEFAULT_DECODE_ENDPOINT: &str = "http://localhost:5002/decode-barcode";

/// Status and body of one completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body.
    pub body: Vec<u8>,
}

/// Abstract transport used by the decode client.
#[async_trait]
pub trait DecodeTransport: Send + Sync {
    /// Posts `payload` as multipart/form-data to `endpoint`.
    ///
    /// # Errors
    /// Returns [`DecodeError::Transport`] when the exchange cannot complete.
    async fn post_multipart(
        &self,
        endpoint: &Url,
        payload: MultipartPayload,
    ) -> Result<TransportResponse, DecodeError>;
}

/// reqwest-backed transport.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Creates a transport with a default reqwest client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a transport around a preconfigured client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DecodeTransport for HttpTransport {
    async fn post_multipart(
        &self,
        endpoint: &Url,
        payload: MultipartPayload,
    ) -> Result<TransportResponse, DecodeError> {
        let MultipartPayload {
            field_name,
            filename,
            content_type,
            bytes,
        } = payload;

        let mut part = Part::bytes(bytes).file_name(filename);
        if let Some(content_type) = usable_content_type(content_type) {
            part = part.mime_str(&content_type).map_err(|error| {
                DecodeError::Transport(format!("invalid part content type: {error}"))
            })?;
        }
        let form = Form::new().part(field_name, part);

        let response = self
            .client
            .post(endpoint.clone())
            .multipart(form)
            .send()
            .await
            .map_err(|error| DecodeError::Transport(error.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|error| DecodeError::Transport(format!("body read failed: {error}")))?;

        Ok(TransportResponse {
            status,
            body: body.to_vec(),
        })
    }
}

/// Declared part type when reqwest accepts it; blank or unparsable types are
/// dropped so the part goes out untyped.
fn usable_content_type(content_type: Option<String>) -> Option<String> {
    let content_type = content_type?;
    let trimmed = content_type.trim();
    if trimmed.is_empty() {
        return None;
    }

    match Part::bytes(Vec::new()).mime_str(trimmed) {
        Ok(_) => Some(trimmed.to_string()),
        Err(error) => {
            tracing::debug!(content_type = trimmed, %error, "sending part without content type");
            None
        }
    }
}

/// Decode client bound to one endpoint.
#[derive(Clone)]
pub struct DecodeClient {
    endpoint: Url,
    transport: Arc<dyn DecodeTransport>,
}

impl DecodeClient {
    /// Creates a client with a validated endpoint.
    ///
    /// # Errors
    /// Returns [`DecodeError::InvalidEndpoint`] for unparsable or non-http(s) URLs.
    pub fn new(endpoint: &str, transport: Arc<dyn DecodeTransport>) -> Result<Self, DecodeError> {
        let endpoint = validate_decode_endpoint(endpoint)?;
        Ok(Self::with_endpoint(endpoint, transport))
    }

    /// Creates a client for an endpoint already checked by
    /// [`validate_decode_endpoint`].
    pub fn with_endpoint(endpoint: Url, transport: Arc<dyn DecodeTransport>) -> Self {
        Self {
            endpoint,
            transport,
        }
    }

    /// Creates a client using [`HttpTransport`].
    ///
    /// # Errors
    /// See [`DecodeClient::new`].
    pub fn http(endpoint: &str) -> Result<Self, DecodeError> {
        Self::new(endpoint, Arc::new(HttpTransport::new()))
    }

    /// Returns the configured endpoint.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Posts one payload and parses the JSON body.
    ///
    /// The HTTP status is not interpreted; structured service errors come back
    /// as `Ok` bodies.
    ///
    /// # Errors
    /// Returns [`DecodeError::Transport`] or [`DecodeError::Parse`].
    pub async fn submit(&self, payload: MultipartPayload) -> Result<ResponseBody, DecodeError> {
        let len = payload.bytes.len();
        let response = self.transport.post_multipart(&self.endpoint, payload).await?;
        tracing::debug!(
            endpoint = %self.endpoint,
            status = response.status,
            sent = len,
            received = response.body.len(),
            "decode exchange completed"
        );
        parse_response_body(&response.body)
    }

    /// Posts one payload and returns the displayable outcome.
    pub async fn decode(&self, payload: MultipartPayload) -> DecodeOutcome {
        match self.submit(payload).await {
            Ok(payload) => DecodeOutcome::Success { payload },
            Err(error) => {
                tracing::warn!(kind = error.kind(), %error, "decode request failed");
                DecodeOutcome::failure()
            }
        }
    }
}

/// Validates the decode endpoint.
///
/// # Errors
/// Returns [`DecodeError::InvalidEndpoint`] for unparsable URLs and schemes
/// other than `http`/`https`.
pub fn validate_decode_endpoint(endpoint: &str) -> Result<Url, DecodeError> {
    let parsed = Url::parse(endpoint.trim())
        .map_err(|error| DecodeError::InvalidEndpoint(format!("invalid decode url: {error}")))?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(DecodeError::InvalidEndpoint(format!(
            "decode endpoint must use http or https, got {other}"
        ))),
    }
}

/// Parses a response body into a JSON object.
///
/// # Errors
/// Returns [`DecodeError::Parse`] for invalid JSON or a non-object top level.
pub fn parse_response_body(raw: &[u8]) -> Result<ResponseBody, DecodeError> {
    let value: serde_json::Value = serde_json::from_slice(raw)
        .map_err(|error| DecodeError::Parse(format!("response is not JSON: {error}")))?;

    match value {
        serde_json::Value::Object(map) => Ok(map),
        other => Err(DecodeError::Parse(format!(
            "response is not a JSON object: {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// Decode client errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Endpoint is unusable.
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),
    /// Network, DNS, or connection failure.
    #[error("decode transport failure: {0}")]
    Transport(String),
    /// Body is not a JSON object.
    #[error("decode response parse failure: {0}")]
    Parse(String),
}

impl DecodeError {
    /// Stable category name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidEndpoint(_) => "invalid_endpoint",
            Self::Transport(_) => "transport",
            Self::Parse(_) => "parse",
        }
    }
}
