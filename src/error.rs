//! Error types for the restoration workflow
//!
//! Every failure the application can hit is one `RestoreError` variant.
//! The session turns them into the message shown above the images, so the
//! `Display` text is what the user reads.

use thiserror::Error;

/// Failures raised while encoding, calling the restoration service, or saving
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RestoreError {
    /// The selected file could not be read or its payload could not be decoded
    #[error("Failed to process image: {0}")]
    Encoding(String),

    /// A required setting is missing; fatal at startup
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Network or service-level failure calling the restoration endpoint
    #[error("Restoration service error: {0}")]
    Transport(String),

    /// The service answered with text instead of an image
    #[error("AI returned a text response instead of an image: \"{0}\"")]
    ServiceRefusal(String),

    /// The service answered with neither an image nor text
    #[error("The AI did not return an image. Please try again.")]
    EmptyResult,

    /// Writing the restored image to disk failed
    #[error("Failed to save image: {0}")]
    Io(String),
}

impl From<reqwest::Error> for RestoreError {
    fn from(err: reqwest::Error) -> Self {
        RestoreError::Transport(err.to_string())
    }
}

impl From<base64::DecodeError> for RestoreError {
    fn from(err: base64::DecodeError) -> Self {
        RestoreError::Encoding(format!("invalid base64 payload: {err}"))
    }
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, RestoreError>;
