//! Restore session state machine.
//!
//! [`Session`] tracks the uploaded photo, the restored result, the busy flag,
//! and the messages shown to the user. It is a pure state machine: it consumes
//! [`SessionEvent`]s and returns [`SessionAction`]s for its owner to run, so
//! the whole workflow is testable without a window or a network.
//!
//! Every action carries a generation number. Starting an upload or restore and
//! resetting all advance it, and completions tagged with an older generation
//! are dropped. A reset therefore ignores in-flight work instead of aborting it.

use std::path::PathBuf;

use super::{RestorationResult, SessionAction, SessionEvent, UploadedImage};
use crate::error::RestoreError;

/// Status shown before any photo is loaded
pub const STATUS_IDLE: &str = "Upload an old photo to begin the restoration process.";
/// Status while a file is being read
pub const STATUS_PREPARING: &str = "Preparing your image...";
/// Status once a photo is loaded
pub const STATUS_READY: &str = "Image ready. Click \"Restore Photo\" to enhance it.";
/// Status while the service is working
pub const STATUS_RESTORING: &str = "AI is working its magic... Restoring colors and details.";
/// Status after a successful restoration
pub const STATUS_COMPLETE: &str = "Restoration complete! Compare the results below.";
/// Status after a failed restoration
pub const STATUS_FAILED: &str = "Something went wrong. Please try another photo.";
/// Error shown when restore is requested with nothing loaded
pub const ERROR_NO_IMAGE: &str = "Please upload an image first.";

/// Coarse view of where the session is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing loaded.
    Idle,
    /// A file is being read; nothing loaded yet.
    Preparing,
    /// Photo loaded, no result. An error from a failed attempt may be set.
    Ready,
    /// Restoration request in flight.
    Restoring,
    /// Restored image available.
    Complete,
}

/// State of one restore session.
///
/// Invariants:
/// - `result` is only present when `uploaded_image` is present.
/// - `result` and `error_message` are never both present.
/// - `busy` is true only while an encode or restore is outstanding.
#[derive(Debug, Clone)]
pub struct Session {
    uploaded_image: Option<UploadedImage>,
    result: Option<RestorationResult>,
    busy: bool,
    error_message: Option<String>,
    status_message: String,
    /// Identity of the operation whose completion will be accepted.
    generation: u64,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            uploaded_image: None,
            result: None,
            busy: false,
            error_message: None,
            status_message: STATUS_IDLE.to_string(),
            generation: 0,
        }
    }
}

impl Session {
    /// Create an idle session
    pub fn new() -> Self {
        Self::default()
    }

    /// Process an event and return the work to perform.
    pub fn handle(&mut self, event: SessionEvent) -> Vec<SessionAction> {
        match event {
            SessionEvent::UploadRequested { path } => self.start_upload(path),
            SessionEvent::UploadFinished { generation, outcome } => {
                if self.is_stale(generation) {
                    tracing::debug!(
                        "Dropping stale upload completion (generation {})",
                        generation
                    );
                    return vec![];
                }
                self.finish_upload(outcome);
                vec![]
            }
            SessionEvent::RestoreRequested => self.start_restore(),
            SessionEvent::RestoreFinished { generation, outcome } => {
                if self.is_stale(generation) {
                    tracing::debug!(
                        "Dropping stale restore completion (generation {})",
                        generation
                    );
                    return vec![];
                }
                self.finish_restore(outcome);
                vec![]
            }
            SessionEvent::ResetRequested => {
                self.reset();
                vec![]
            }
        }
    }

    fn start_upload(&mut self, path: PathBuf) -> Vec<SessionAction> {
        if self.busy {
            tracing::warn!("Upload requested while busy, ignoring");
            return vec![];
        }

        self.uploaded_image = None;
        self.result = None;
        self.error_message = None;
        self.busy = true;
        self.status_message = STATUS_PREPARING.to_string();
        self.generation += 1;

        vec![SessionAction::Encode { generation: self.generation, path }]
    }

    fn finish_upload(&mut self, outcome: Result<UploadedImage, RestoreError>) {
        self.busy = false;
        match outcome {
            Ok(image) => {
                tracing::info!("📥 Loaded {} ({})", image.file_name, image.mime_type);
                self.uploaded_image = Some(image);
                self.status_message = STATUS_READY.to_string();
            }
            Err(e) => {
                tracing::warn!("⚠️  Upload failed: {}", e);
                self.uploaded_image = None;
                self.error_message = Some(e.to_string());
                self.status_message = STATUS_IDLE.to_string();
            }
        }
    }

    fn start_restore(&mut self) -> Vec<SessionAction> {
        if self.busy {
            tracing::warn!("Restore requested while busy, ignoring");
            return vec![];
        }

        let Some(image) = &self.uploaded_image else {
            self.error_message = Some(ERROR_NO_IMAGE.to_string());
            return vec![];
        };

        let action = SessionAction::Restore {
            generation: self.generation + 1,
            encoded_payload: image.encoded_payload.clone(),
            mime_type: image.mime_type.clone(),
        };

        self.error_message = None;
        self.result = None;
        self.busy = true;
        self.status_message = STATUS_RESTORING.to_string();
        self.generation += 1;

        vec![action]
    }

    fn finish_restore(&mut self, outcome: Result<Option<String>, RestoreError>) {
        self.busy = false;
        match outcome.and_then(|payload| payload.ok_or(RestoreError::EmptyResult)) {
            Ok(payload) => {
                tracing::info!("✅ Restoration complete");
                self.result = Some(RestorationResult::new(payload));
                self.status_message = STATUS_COMPLETE.to_string();
            }
            Err(e) => {
                tracing::warn!("⚠️  Restoration failed: {}", e);
                self.error_message = Some(e.to_string());
                self.status_message = STATUS_FAILED.to_string();
            }
        }
    }

    /// Return to idle defaults. In-flight work is left to finish and ignored.
    pub fn reset(&mut self) {
        let generation = self.generation + 1;
        *self = Self { generation, ..Self::default() };
    }

    fn is_stale(&self, generation: u64) -> bool {
        generation != self.generation
    }

    /// Where the session currently is
    pub fn phase(&self) -> Phase {
        match (self.busy, &self.uploaded_image, &self.result) {
            (true, Some(_), _) => Phase::Restoring,
            (true, None, _) => Phase::Preparing,
            (false, Some(_), Some(_)) => Phase::Complete,
            (false, Some(_), None) => Phase::Ready,
            (false, None, _) => Phase::Idle,
        }
    }

    /// Photo currently loaded
    pub fn uploaded_image(&self) -> Option<&UploadedImage> {
        self.uploaded_image.as_ref()
    }

    /// Restored image, if the last attempt succeeded
    pub fn result(&self) -> Option<&RestorationResult> {
        self.result.as_ref()
    }

    /// Whether an encode or restore is outstanding
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Error from the last failed action
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Human-readable progress line
    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    /// Generation a completion must carry to be accepted
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether the restore control should be enabled
    pub fn can_restore(&self) -> bool {
        !self.busy && self.uploaded_image.is_some()
    }

    /// Whether the upload control should be enabled
    pub fn can_upload(&self) -> bool {
        !self.busy
    }

    /// Suggested name for saving the current result
    pub fn download_name(&self) -> Option<String> {
        self.result.as_ref()?;
        self.uploaded_image
            .as_ref()
            .map(|image| RestorationResult::download_name(&image.file_name))
    }
}
