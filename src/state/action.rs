//! Work the session asks its owner to perform.
//!
//! The session never does I/O itself. Each action carries the generation the
//! owner must echo back in the matching completion event.

use std::path::PathBuf;
use std::sync::Arc;

/// Actions produced by the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    /// Read and encode a file, then report `UploadFinished`.
    Encode {
        /// Generation to echo back.
        generation: u64,
        /// File to encode.
        path: PathBuf,
    },

    /// Call the restoration service, then report `RestoreFinished`.
    Restore {
        /// Generation to echo back.
        generation: u64,
        /// Base64 of the uploaded file.
        encoded_payload: Arc<str>,
        /// Declared image format.
        mime_type: String,
    },
}
