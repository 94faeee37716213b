//! User interactions routed into the running session.
//!
//! The tree belongs to the session loop, so a front end never touches it
//! directly: it queues a [`UserAction`] through an [`ActionSender`] and the
//! loop applies it against the live tree between frames.

use tokio::sync::mpsc;
use tracing::warn;

use crate::health::SESSION_TARGET;

/// Interaction a user performed on a rendered component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAction {
    /// Close button of a dismissible component (alert, toast).
    Dismiss(String),
    /// Press of a button; forwarded to the server as a `click` event.
    Click(String),
}

impl UserAction {
    /// Address the action targets.
    #[must_use]
    pub fn address(&self) -> &str {
        match self {
            Self::Dismiss(address) | Self::Click(address) => address,
        }
    }
}

/// Handle for queueing [`UserAction`]s on the session loop.
///
/// Actions queued while no channel is open are discarded when the next
/// session starts, together with the tree they referred to.
#[derive(Debug, Clone)]
pub struct ActionSender {
    queue: mpsc::UnboundedSender<UserAction>,
}

impl ActionSender {
    pub(crate) const fn new(queue: mpsc::UnboundedSender<UserAction>) -> Self {
        Self { queue }
    }

    /// Queues `action`; returns `false` when the session loop has gone.
    #[must_use = "a dropped action is reported through the return value"]
    pub fn send(&self, action: UserAction) -> bool {
        match self.queue.send(action) {
            Ok(()) => true,
            Err(error) => {
                warn!(
                    target: SESSION_TARGET,
                    address = error.0.address(),
                    "dropping user action; session loop has stopped"
                );
                false
            }
        }
    }

    /// Queues a dismissal of the component at `address`.
    #[must_use = "a dropped action is reported through the return value"]
    pub fn dismiss(&self, address: impl Into<String>) -> bool {
        self.send(UserAction::Dismiss(address.into()))
    }

    /// Queues a click on the button at `address`.
    #[must_use = "a dropped action is reported through the return value"]
    pub fn click(&self, address: impl Into<String>) -> bool {
        self.send(UserAction::Click(address.into()))
    }
}
