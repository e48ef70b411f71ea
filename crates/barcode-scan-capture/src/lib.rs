#![warn(missing_docs)]
//! # barcode-scan-capture
//!
//! ## Purpose
//! Provides the image acquisition collaborators consumed by the scan session.
//!
//! ## Responsibilities
//! - Define a backend-agnostic camera trait returning the current frame.
//! - Expose a still-image frame source for the CLI and a synthetic one for tests.
//! - Model file picker events carrying zero or one file.
//! - Track preview handles for uploaded files and release them on drop.
//!
//! ## Data flow
//! Camera -> [`FrameSource::current_frame`] -> data URI string -> session.
//! Picker -> [`FileSelection`] -> [`SelectedFile`] -> session, which registers
//! a [`PreviewHandle`] while the upload stays current.
//!
//! ## Ownership and lifetimes
//! Frames and selected files are owned values. A [`PreviewHandle`] holds a
//! shared reference to its registry and removes its entry when dropped.
//!
//! ## Error model
//! Reading files from disk can fail with [`CaptureError`]. A camera that is
//! not ready is not an error; it yields `None`.

use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use barcode_scan_core::{AcquiredImage, CoreError};
use base64::Engine as _;
use thiserror::Error;

/// Media type reported by webcam snapshots.
pub const DEFAULT_SNAPSHOT_MEDIA_TYPE: &str = "image/jpeg";

/// Trait implemented by camera providers.
pub trait FrameSource: Send + Sync {
    /// Returns the current still frame as a data URI, or `None` when no frame
    /// is available yet.
    fn current_frame(&self) -> Option<String>;
}

/// Camera stand-in that serves one still image from disk.
///
/// The file is read once at construction; every call to
/// [`FrameSource::current_frame`] returns the same snapshot.
#[derive(Debug, Clone)]
pub struct StillImageFrameSource {
    path: PathBuf,
    data_uri: String,
}

impl StillImageFrameSource {
    /// Loads a still image and encodes it as a data URI.
    ///
    /// # Errors
    /// Returns [`CaptureError::Io`] when the file cannot be read and
    /// [`CaptureError::EmptyFile`] when it has no bytes.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CaptureError> {
        let path = path.as_ref().to_path_buf();
        let bytes = read_file(&path)?;
        let media_type = media_type_for_path(&path).unwrap_or(DEFAULT_SNAPSHOT_MEDIA_TYPE);
        tracing::debug!(path = %path.display(), media_type, len = bytes.len(), "loaded still frame");

        Ok(Self {
            data_uri: encode_data_uri(media_type, &bytes),
            path,
        })
    }

    /// Path the frame was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FrameSource for StillImageFrameSource {
    fn current_frame(&self) -> Option<String> {
        Some(self.data_uri.clone())
    }
}

/// Deterministic camera for tests. Frames are served in order; an exhausted
/// queue or a `None` entry behaves like a camera that is not ready.
#[derive(Debug, Default)]
pub struct SyntheticFrameSource {
    frames: Mutex<VecDeque<Option<String>>>,
}

impl SyntheticFrameSource {
    /// Creates a source that serves `frames` in order.
    pub fn with_frames(frames: impl IntoIterator<Item = Option<String>>) -> Self {
        Self {
            frames: Mutex::new(frames.into_iter().collect()),
        }
    }

    /// Creates a source that never has a frame.
    pub fn not_ready() -> Self {
        Self::default()
    }

    /// Creates a source serving one frame built from raw image bytes.
    pub fn from_image_bytes(media_type: &str, bytes: &[u8]) -> Self {
        Self::with_frames([Some(encode_data_uri(media_type, bytes))])
    }
}

impl FrameSource for SyntheticFrameSource {
    fn current_frame(&self) -> Option<String> {
        self.frames
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .flatten()
    }
}

/// One file delivered by the picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    /// File contents.
    pub bytes: Vec<u8>,
    /// Filename as reported by the picker.
    pub filename: String,
    /// MIME type, when known.
    pub content_type: Option<String>,
}

impl SelectedFile {
    /// Creates a selected file from in-memory contents.
    pub fn new(bytes: Vec<u8>, filename: impl Into<String>, content_type: Option<String>) -> Self {
        Self {
            bytes,
            filename: filename.into(),
            content_type,
        }
    }

    /// Reads a file from disk the way a picker would hand it over.
    ///
    /// # Errors
    /// Returns [`CaptureError::Io`] when the file cannot be read.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CaptureError> {
        let path = path.as_ref();
        let bytes = read_file(path)?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self {
            bytes,
            filename,
            content_type: media_type_for_path(path).map(str::to_string),
        })
    }

    /// Converts into the session's image model.
    ///
    /// # Errors
    /// Returns [`CoreError::EmptyUpload`] when the file has no bytes.
    pub fn into_acquired(self) -> Result<AcquiredImage, CoreError> {
        AcquiredImage::upload(self.bytes, self.filename, self.content_type)
    }
}

/// Picker event; only the first file is relevant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSelection {
    files: Vec<SelectedFile>,
}

impl FileSelection {
    /// Creates an event carrying `files`.
    pub fn new(files: Vec<SelectedFile>) -> Self {
        Self { files }
    }

    /// Creates an event with no files (the picker was dismissed).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates an event with one file.
    pub fn single(file: SelectedFile) -> Self {
        Self { files: vec![file] }
    }

    /// Number of files in the event.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns `true` when the event carries no file.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Takes the first file, dropping any others.
    pub fn into_first(self) -> Option<SelectedFile> {
        self.files.into_iter().next()
    }
}

/// Opaque key of a registered preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PreviewKey(u64);

impl std::fmt::Display for PreviewKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "preview://{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PreviewEntry {
    filename: String,
    byte_len: usize,
}

#[derive(Debug, Default)]
struct RegistryInner {
    next_key: u64,
    live: HashMap<PreviewKey, PreviewEntry>,
}

/// Registry of addressable previews for uploaded files.
///
/// Cloning shares the same registry.
#[derive(Debug, Clone, Default)]
pub struct PreviewRegistry {
    inner: Arc<Mutex<RegistryInner>>,
}

impl PreviewRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a preview for `file`; the entry lives as long as the handle.
    pub fn register(&self, file: &SelectedFile) -> PreviewHandle {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.next_key = inner.next_key.saturating_add(1);
        let key = PreviewKey(inner.next_key);
        inner.live.insert(
            key,
            PreviewEntry {
                filename: file.filename.clone(),
                byte_len: file.bytes.len(),
            },
        );

        PreviewHandle {
            key,
            registry: self.clone(),
        }
    }

    /// Number of previews that have not been released.
    pub fn live_count(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .live
            .len()
    }

    /// Returns `true` while `key` is registered.
    pub fn contains(&self, key: PreviewKey) -> bool {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .live
            .contains_key(&key)
    }

    fn release(&self, key: PreviewKey) {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(entry) = inner.live.remove(&key) {
            tracing::debug!(%key, filename = %entry.filename, len = entry.byte_len, "released preview");
        }
    }
}

/// Scoped preview of one uploaded file. Dropping it releases the entry.
#[derive(Debug)]
pub struct PreviewHandle {
    key: PreviewKey,
    registry: PreviewRegistry,
}

impl PreviewHandle {
    /// Key under which the preview is addressable.
    pub fn key(&self) -> PreviewKey {
        self.key
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        self.registry.release(self.key);
    }
}

/// Encodes image bytes as a base64 data URI.
pub fn encode_data_uri(media_type: &str, bytes: &[u8]) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
    format!("data:{media_type};base64,{encoded}")
}

/// Guesses an image MIME type from a file extension.
pub fn media_type_for_path(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    match extension.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "bmp" => Some("image/bmp"),
        "webp" => Some("image/webp"),
        "tif" | "tiff" => Some("image/tiff"),
        _ => None,
    }
}

fn read_file(path: &Path) -> Result<Vec<u8>, CaptureError> {
    let bytes = std::fs::read(path).map_err(|source| CaptureError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if bytes.is_empty() {
        return Err(CaptureError::EmptyFile(path.to_path_buf()));
    }
    Ok(bytes)
}

/// Capture layer error type.
#[derive(Debug, Error)]
pub enum CaptureError {
    /// File could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        /// Offending path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// File has no bytes.
    #[error("file is empty: {}", .0.display())]
    EmptyFile(PathBuf),
}

#[cfg(test)]
mod tests {
    //! Unit tests for synthetic capture and preview bookkeeping.

    use super::*;

    #[test]
    fn synthetic_source_serves_frames_then_runs_dry() {
        let source = SyntheticFrameSource::with_frames([None, Some("data:,x".to_string())]);
        assert_eq!(source.current_frame(), None);
        assert_eq!(source.current_frame().as_deref(), Some("data:,x"));
        assert_eq!(source.current_frame(), None);
    }

    #[test]
    fn dropping_handle_releases_preview() {
        let registry = PreviewRegistry::new();
        let file = SelectedFile::new(vec![1, 2], "a.png", None);
        let handle = registry.register(&file);
        let key = handle.key();

        assert!(registry.contains(key));
        drop(handle);
        assert!(!registry.contains(key));
        assert_eq!(registry.live_count(), 0);
    }

    #[test]
    fn guesses_media_types_case_insensitively() {
        assert_eq!(media_type_for_path(Path::new("x.JPG")), Some("image/jpeg"));
        assert_eq!(media_type_for_path(Path::new("x.txt")), None);
        assert_eq!(encode_data_uri("image/png", &[0xff]), "data:image/png;base64,/w==");
    }
}
