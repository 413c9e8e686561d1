//! Restoration service client
//!
//! - `wire.rs` - generateContent request/response bodies and response parsing
//! - `gemini.rs` - reqwest-backed [`GeminiClient`]
//!
//! The session never talks HTTP directly; it asks a [`Restorer`] for a result,
//! which keeps the network out of state machine tests.

pub mod gemini;
pub mod wire;

pub use gemini::GeminiClient;
pub use wire::extract_image;

use async_trait::async_trait;

use crate::error::Result;

/// Fixed instruction sent alongside every photo
pub const RESTORE_PROMPT: &str = "Restore this old photograph. Perform color recovery and enhancement, increase sharpness and clarity, and fix minor damage like scratches or fading. Do not add, remove, or change any objects or people in the original image. Return only the enhanced image.";

/// Anything that can turn an encoded photo into a restored one
#[async_trait]
pub trait Restorer: Send + Sync {
    /// Restore one image.
    ///
    /// # Returns
    /// * `Ok(Some(payload))` - base64 of the restored image
    /// * `Ok(None)` - the service answered with neither image nor text
    /// * `Err(_)` - transport failure, refusal text, or an undecodable payload
    async fn restore(&self, encoded_payload: &str, mime_type: &str) -> Result<Option<String>>;
}
