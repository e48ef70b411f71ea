#![warn(missing_docs)]
//! # barcode-scan-payload
//!
//! ## Purpose
//! Turns an acquired image into the single-part multipart payload expected by
//! the decode service.
//!
//! ## Responsibilities
//! - Decode camera data URIs into raw image bytes.
//! - Attach uploaded blobs unchanged with their declared filename.
//! - Fix the part's field name and the camera filename.
//!
//! ## Data flow
//! [`barcode_scan_core::AcquiredImage`] -> [`build_payload`] ->
//! [`MultipartPayload`] handed to the decode client.
//!
//! ## Ownership and lifetimes
//! The payload owns a copy of the image bytes so the submission can outlive
//! the session's current image.
//!
//! ## Error model
//! Malformed captures fail with [`PayloadError`]; the session settles such a
//! submission as a failure without touching the network.

use barcode_scan_core::AcquiredImage;
use base64::Engine as _;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use thiserror::Error;

/// Multipart field name the decode service reads.
pub const IMAGE_FIELD_NAME: &str = "image";

/// Filename attached to camera snapshots.
pub const CAPTURE_FILENAME: &str = "capture.jpg";

const DATA_URI_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// One-part multipart request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartPayload {
    /// Form field name; always [`IMAGE_FIELD_NAME`].
    pub field_name: &'static str,
    /// Filename sent with the part.
    pub filename: String,
    /// Part MIME type, when known.
    pub content_type: Option<String>,
    /// Raw image bytes.
    pub bytes: Vec<u8>,
}

/// Raw image recovered from a data URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    /// Declared media type; `None` when the URI omitted it.
    pub media_type: Option<String>,
    /// Decoded bytes.
    pub bytes: Vec<u8>,
}

/// Builds the decode request payload for one image.
///
/// # Errors
/// Returns a [`PayloadError`] when a camera frame is not a base64 image data
/// URI. Uploaded files never fail.
pub fn build_payload(image: &AcquiredImage) -> Result<MultipartPayload, PayloadError> {
    match image {
        AcquiredImage::CameraFrame { encoded_image } => {
            let decoded = decode_data_uri(encoded_image)?;
            Ok(MultipartPayload {
                field_name: IMAGE_FIELD_NAME,
                filename: CAPTURE_FILENAME.to_string(),
                content_type: decoded.media_type,
                bytes: decoded.bytes,
            })
        }
        AcquiredImage::UploadedFile {
            blob,
            filename,
            content_type,
        } => Ok(MultipartPayload {
            field_name: IMAGE_FIELD_NAME,
            filename: filename.clone(),
            content_type: content_type
                .as_deref()
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string),
            bytes: blob.clone(),
        }),
    }
}

/// Decodes `data:[<mediatype>][;params];base64,<data>` into raw bytes.
///
/// ASCII whitespace inside the payload is ignored and padding is optional.
///
/// # Errors
/// See [`PayloadError`] for the rejected shapes.
pub fn decode_data_uri(uri: &str) -> Result<DecodedImage, PayloadError> {
    let uri = uri.trim();
    let rest = match uri.get(..5) {
        Some(scheme) if scheme.eq_ignore_ascii_case("data:") => &uri[5..],
        _ => return Err(PayloadError::MissingScheme),
    };

    let (header, data) = rest.split_once(',').ok_or(PayloadError::MissingSeparator)?;
    let mut params = header.split(';');
    let media_type = params.next().unwrap_or_default().trim();
    let is_base64 = params.any(|param| param.trim().eq_ignore_ascii_case("base64"));

    let media_type = if media_type.is_empty() {
        None
    } else if is_image_media_type(media_type) {
        Some(media_type.to_ascii_lowercase())
    } else {
        return Err(PayloadError::UnsupportedMediaType(media_type.to_string()));
    };

    if !is_base64 {
        return Err(PayloadError::NotBase64);
    }

    let compact: Vec<u8> = data
        .bytes()
        .filter(|byte| !byte.is_ascii_whitespace())
        .collect();
    let bytes = DATA_URI_BASE64.decode(&compact)?;
    if bytes.is_empty() {
        return Err(PayloadError::EmptyImage);
    }

    Ok(DecodedImage { media_type, bytes })
}

fn is_image_media_type(media_type: &str) -> bool {
    let Some((kind, subtype)) = media_type.split_once('/') else {
        return false;
    };
    kind.eq_ignore_ascii_case("image")
        && !subtype.is_empty()
        && subtype
            .bytes()
            .all(|byte| byte.is_ascii_alphanumeric() || b"+-.".contains(&byte))
}

/// Payload construction errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PayloadError {
    /// Capture is not a data URI.
    #[error("capture is not a data URI")]
    MissingScheme,
    /// Data URI has no `,` between header and data.
    #[error("data URI has no data separator")]
    MissingSeparator,
    /// Data URI declares a non-image media type.
    #[error("unsupported media type: {0}")]
    UnsupportedMediaType(String),
    /// Data URI payload is not base64-encoded.
    #[error("data URI payload is not base64-encoded")]
    NotBase64,
    /// Base64 payload is malformed.
    #[error("invalid base64 payload: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
    /// Decoded image has no bytes.
    #[error("decoded image is empty")]
    EmptyImage,
}
