//! Photo restoration core
//!
//! Everything the desktop app needs apart from the window itself:
//! - `encoder` - picked file → base64 payload + MIME type
//! - `client` - generateContent request/response and the [`Restorer`] seam
//! - `state` - the pure [`Session`] state machine
//! - `runtime` - runs the actions a session emits
//! - `download` - writes a result to disk
//! - `config`, `error` - environment configuration and the error taxonomy

pub mod client;
pub mod config;
pub mod download;
pub mod encoder;
pub mod error;
pub mod runtime;
pub mod state;

pub use client::{GeminiClient, Restorer};
pub use config::Config;
pub use error::RestoreError;
pub use state::{Phase, RestorationResult, Session, SessionAction, SessionEvent, UploadedImage};
