//! Events sent from the client back to the server.

use serde::Serialize;
use tokio::sync::{mpsc, watch};
use tracing::{debug, warn};

use crate::component::ComponentKind;
use crate::connection::ConnectionState;
use crate::health::SESSION_TARGET;
use crate::identity::Tree;

/// Event name sent when a button is pressed.
pub const CLICK_EVENT: &str = "click";

/// Fire-and-forget event, serialized as `{"id": ..., "event": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutboundEvent {
    /// Address of the originating component.
    pub id: String,
    /// Event name.
    pub event: String,
}

impl OutboundEvent {
    /// Event `event` originating at `id`.
    #[must_use]
    pub fn new(id: impl Into<String>, event: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            event: event.into(),
        }
    }

    /// Click on the component at `id`.
    #[must_use]
    pub fn click(id: impl Into<String>) -> Self {
        Self::new(id, CLICK_EVENT)
    }
}

/// Handle for queueing outbound events on the current session's channel.
///
/// Events are never retried: one sent while the channel is down is logged
/// and dropped.
#[derive(Debug, Clone)]
pub struct EventSender {
    state: watch::Receiver<ConnectionState>,
    queue: mpsc::UnboundedSender<OutboundEvent>,
}

impl EventSender {
    pub(crate) const fn new(
        state: watch::Receiver<ConnectionState>,
        queue: mpsc::UnboundedSender<OutboundEvent>,
    ) -> Self {
        Self { state, queue }
    }

    /// Queues `event`; returns `false` when it was dropped.
    #[must_use = "a dropped event is reported through the return value"]
    pub fn send(&self, event: OutboundEvent) -> bool {
        let state = *self.state.borrow();
        if !state.is_connected() {
            warn!(
                target: SESSION_TARGET,
                id = %event.id,
                event = %event.event,
                state = %state,
                "dropping outbound event while not connected"
            );
            return false;
        }
        match self.queue.send(event) {
            Ok(()) => true,
            Err(error) => {
                warn!(
                    target: SESSION_TARGET,
                    id = %error.0.id,
                    "dropping outbound event; session has ended"
                );
                false
            }
        }
    }

    /// Reports a click on the button at `address`.
    ///
    /// Clicks on anything but a live, enabled button are ignored and return
    /// `false`.
    #[must_use = "a dropped event is reported through the return value"]
    pub fn click(&self, tree: &Tree, address: &str) -> bool {
        let Some(node) = tree.lookup(address) else {
            debug!(target: SESSION_TARGET, address, "ignoring click on a missing component");
            return false;
        };
        if node.kind() != ComponentKind::Button || node.instance().content.flag("disable") {
            debug!(
                target: SESSION_TARGET,
                address,
                kind = %node.kind(),
                "ignoring click on a component that does not take clicks"
            );
            return false;
        }
        let id = tree
            .canonical(address)
            .map_or_else(|| address.to_owned(), ToString::to_string);
        self.send(OutboundEvent::click(id))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use rstest::{fixture, rstest};
    use serde_json::json;

    use super::*;
    use crate::dispatch::{Dispatcher, Frame};

    struct Harness {
        sender: EventSender,
        state: watch::Sender<ConnectionState>,
        queue: mpsc::UnboundedReceiver<OutboundEvent>,
        tree: Tree,
    }

    #[fixture]
    fn harness() -> Harness {
        let (state, state_rx) = watch::channel(ConnectionState::Connected);
        let (queue_tx, queue) = mpsc::unbounded_channel();
        let mut tree = Tree::new();
        let frame = Frame::Text(
            json!([
                {"func": "button_new", "id": "go", "text": "Go"},
                {"func": "button_new", "id": "off", "disable": true},
                {"func": "alert_new", "id": "a"}
            ])
            .to_string(),
        );
        Dispatcher::with_builtin_widgets().apply_frame(&mut tree, &frame, Instant::now());
        Harness {
            sender: EventSender::new(state_rx, queue_tx),
            state,
            queue,
            tree,
        }
    }

    #[test]
    fn events_serialize_as_id_and_event() {
        let text = serde_json::to_string(&OutboundEvent::click("go")).expect("serialize");
        assert_eq!(text, r#"{"id":"go","event":"click"}"#);
    }

    #[rstest]
    fn clicks_on_enabled_buttons_are_queued(mut harness: Harness) {
        assert!(harness.sender.click(&harness.tree, "go"));
        assert_eq!(harness.queue.try_recv().ok(), Some(OutboundEvent::click("go")));
    }

    #[rstest]
    #[case::disabled("off")]
    #[case::not_a_button("a")]
    #[case::missing("ghost")]
    fn other_clicks_are_ignored(mut harness: Harness, #[case] address: &str) {
        assert!(!harness.sender.click(&harness.tree, address));
        assert!(harness.queue.try_recv().is_err());
    }

    #[rstest]
    fn events_are_dropped_while_disconnected(mut harness: Harness) {
        harness.state.send_replace(ConnectionState::Disconnected);
        assert!(!harness.sender.send(OutboundEvent::click("go")));
        assert!(harness.queue.try_recv().is_err());
    }

    #[rstest]
    fn events_are_dropped_once_the_session_ends(harness: Harness) {
        let Harness { sender, queue, .. } = harness;
        drop(queue);
        assert!(!sender.send(OutboundEvent::click("go")));
    }
}
