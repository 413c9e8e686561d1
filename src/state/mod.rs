//! Session state module
//!
//! This module holds everything the restore workflow remembers:
//! - Shared data structures (data.rs)
//! - Events and actions exchanged with the owner (event.rs, action.rs)
//! - The session state machine itself (session.rs)

pub mod action;
pub mod data;
pub mod event;
pub mod session;

pub use action::SessionAction;
pub use data::{RestorationResult, UploadedImage};
pub use event::SessionEvent;
pub use session::{Phase, Session};
