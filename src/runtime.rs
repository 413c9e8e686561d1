//! Executes session actions.
//!
//! [`perform`] is the bridge between the pure [`Session`](crate::Session) and
//! the outside world: it runs one [`SessionAction`] and returns the completion
//! event to feed back in. The GUI wraps it in `Task::perform`; tests await it
//! directly against a scripted [`Restorer`].

use std::sync::Arc;

use crate::client::Restorer;
use crate::encoder;
use crate::state::{SessionAction, SessionEvent};

/// Run one action to completion.
pub async fn perform(action: SessionAction, restorer: Arc<dyn Restorer>) -> SessionEvent {
    match action {
        SessionAction::Encode { generation, path } => SessionEvent::UploadFinished {
            generation,
            outcome: encoder::encode_file(path).await,
        },
        SessionAction::Restore { generation, encoded_payload, mime_type } => {
            SessionEvent::RestoreFinished {
                generation,
                outcome: restorer.restore(&encoded_payload, &mime_type).await,
            }
        }
    }
}
