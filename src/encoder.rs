//! File intake
//!
//! Turns a picked file into an [`UploadedImage`]: the whole file as base64,
//! the MIME type it declares, and its name. No size or format validation
//! happens here; the picker filter is advisory only.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::ImageFormat;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{RestoreError, Result};
use crate::state::UploadedImage;

/// Extensions offered by the file picker
pub const ACCEPTED_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "webp"];

/// MIME type used when neither the extension nor the content identify the format
const FALLBACK_MIME: &str = "application/octet-stream";

/// Read and encode a file
///
/// # Returns
/// * `Ok(UploadedImage)` - file content encoded, nothing else touched
/// * `Err(RestoreError::Encoding)` - file could not be read
pub async fn encode_file(path: PathBuf) -> Result<UploadedImage> {
    let bytes = tokio::fs::read(&path).await.map_err(|e| {
        tracing::warn!("⚠️  Could not read {}: {}", path.display(), e);
        RestoreError::Encoding(e.to_string())
    })?;

    let image = encode_bytes(path, &bytes);
    tracing::debug!(
        "📷 Encoded {} ({} bytes, {})",
        image.file_name,
        bytes.len(),
        image.mime_type
    );
    Ok(image)
}

/// Encode already-loaded file content
pub fn encode_bytes(path: PathBuf, bytes: &[u8]) -> UploadedImage {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default();

    UploadedImage {
        mime_type: detect_mime_type(&path, bytes).to_string(),
        encoded_payload: Arc::from(STANDARD.encode(bytes)),
        file_name,
        source_path: path,
    }
}

/// Declared type from the extension first, then a content sniff
fn detect_mime_type(path: &Path, bytes: &[u8]) -> &'static str {
    ImageFormat::from_path(path)
        .or_else(|_| image::guess_format(bytes))
        .map(|format| format.to_mime_type())
        .unwrap_or(FALLBACK_MIME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    #[tokio::test]
    async fn test_round_trip_preserves_bytes() {
        let mut file = tempfile::Builder::new().suffix(".jpg").tempfile().unwrap();
        let content: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
        file.write_all(&content).unwrap();

        let image = encode_file(file.path().to_path_buf()).await.unwrap();

        let decoded = STANDARD.decode(image.encoded_payload.as_bytes()).unwrap();
        assert_eq!(decoded, content);
        assert_eq!(image.mime_type, "image/jpeg");
        assert_eq!(image.source_path, file.path());
    }

    #[tokio::test]
    async fn test_missing_file_is_encoding_error() {
        let result = encode_file(PathBuf::from("/nonexistent/photo.png")).await;
        assert!(matches!(result, Err(RestoreError::Encoding(_))));
    }

    #[test]
    fn test_file_name_and_extension_mime() {
        let image = encode_bytes(PathBuf::from("/photos/old/wedding.webp"), b"anything");
        assert_eq!(image.file_name, "wedding.webp");
        assert_eq!(image.mime_type, "image/webp");
    }

    #[test]
    fn test_unknown_extension_sniffs_content() {
        let image = encode_bytes(PathBuf::from("scan.dat"), &PNG_SIGNATURE);
        assert_eq!(image.mime_type, "image/png");
    }

    #[test]
    fn test_unknown_everything_falls_back() {
        let image = encode_bytes(PathBuf::from("notes"), b"plain text");
        assert_eq!(image.mime_type, FALLBACK_MIME);
    }

    #[test]
    fn test_empty_file_encodes_to_empty_payload() {
        let image = encode_bytes(PathBuf::from("empty.png"), &[]);
        assert_eq!(&*image.encoded_payload, "");
    }
}
