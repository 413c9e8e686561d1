//! Inputs that drive the [`crate::Session`] state machine.
//!
//! Events come from two places:
//! - user actions (pick a file, restore, reset)
//! - completions of the background work the session asked for, tagged with
//!   the generation that was current when the work started

use std::path::PathBuf;

use super::data::UploadedImage;
use crate::error::RestoreError;

/// Events processed by the session.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// User picked a file.
    UploadRequested {
        /// File to encode.
        path: PathBuf,
    },

    /// Encoding finished.
    UploadFinished {
        /// Generation captured when the upload started.
        generation: u64,
        /// Encoded image or the read failure.
        outcome: Result<UploadedImage, RestoreError>,
    },

    /// User asked to restore the current image.
    RestoreRequested,

    /// Restoration call finished.
    RestoreFinished {
        /// Generation captured when the restore started.
        generation: u64,
        /// Base64 image, `None` for an empty answer, or the failure.
        outcome: Result<Option<String>, RestoreError>,
    },

    /// User asked to start over.
    ResetRequested,
}
