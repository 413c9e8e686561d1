//! Shared data structures for the session state
//!
//! These structs carry an image from the file picker, through the
//! restoration service, and back out to the screen and disk.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::Result;

/// Prefix that turns a base64 payload into a renderable PNG data URI
pub const PNG_DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// Prefix for the suggested download file name
pub const DOWNLOAD_PREFIX: &str = "restored-";

/// A photo the user picked, ready to be sent for restoration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedImage {
    /// Local file the preview is loaded from
    pub source_path: PathBuf,
    /// Base64 of the full file content
    pub encoded_payload: Arc<str>,
    /// Declared image format (e.g., "image/jpeg")
    pub mime_type: String,
    /// Filename only (e.g., "grandma-1952.jpg")
    pub file_name: String,
}

/// Image returned by the restoration service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestorationResult {
    /// Base64 image data as returned by the service
    pub payload: String,
}

impl RestorationResult {
    pub fn new(payload: impl Into<String>) -> Self {
        Self { payload: payload.into() }
    }

    /// Data URI for direct rendering
    pub fn data_uri(&self) -> String {
        format!("{PNG_DATA_URI_PREFIX}{}", self.payload)
    }

    /// Raw image bytes
    pub fn decode(&self) -> Result<Vec<u8>> {
        Ok(STANDARD.decode(self.payload.as_bytes())?)
    }

    /// Suggested file name when saving, derived from the original upload
    pub fn download_name(original_file_name: &str) -> String {
        format!("{DOWNLOAD_PREFIX}{original_file_name}")
    }
}
