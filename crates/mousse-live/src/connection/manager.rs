//! Session loop driving one update channel at a time.

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use mousse_config::Config;
use tokio::sync::{mpsc, watch};
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::component::Region;
use crate::dispatch::{Dispatcher, Frame};
use crate::health::{HealthReporter, SESSION_TARGET};
use crate::identity::{Tree, TreeSnapshot};
use crate::interaction::{ActionSender, UserAction};
use crate::outbound::{EventSender, OutboundEvent};

use super::CONNECTION_TARGET;
use super::probe::{ProbeOutcome, Prober, probe_timeout};
use super::state::ConnectionState;
use super::transport::{Connector, Transport};

/// Probe periods for the two connection phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeSchedule {
    /// Period while the update channel is open.
    pub connected: Duration,
    /// Period while waiting for the server to come back.
    pub disconnected: Duration,
}

impl ProbeSchedule {
    /// Schedule taken from the clamped configuration values.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            connected: config.probe_interval(),
            disconnected: config.reconnect_probe_interval(),
        }
    }
}

enum ChannelEnd {
    Reload,
    Lost,
}

/// Owns the transport, the probe schedule, and the outbound queue.
///
/// Every session starts from an empty tree and ends with exactly one reload
/// request, either because the server answered a probe with `204` while the
/// channel was open or because it did so after the channel was lost.
///
/// The session's tree is published through [`Self::watch_tree`] after every
/// change, and user actions queued through [`Self::action_sender`] are applied
/// to it while the channel is open.
pub struct ConnectionManager<C, P> {
    connector: C,
    prober: P,
    dispatcher: Dispatcher,
    reporter: Arc<dyn HealthReporter>,
    schedule: ProbeSchedule,
    state: watch::Sender<ConnectionState>,
    view: watch::Sender<TreeSnapshot>,
    outbound: mpsc::UnboundedReceiver<OutboundEvent>,
    sender: EventSender,
    actions: mpsc::UnboundedReceiver<UserAction>,
    action_sender: ActionSender,
}

impl<C, P> ConnectionManager<C, P>
where
    C: Connector,
    P: Prober,
{
    /// Builds a manager that starts out disconnected.
    #[must_use]
    pub fn new(
        connector: C,
        prober: P,
        dispatcher: Dispatcher,
        reporter: Arc<dyn HealthReporter>,
        schedule: ProbeSchedule,
    ) -> Self {
        let (state, state_rx) = watch::channel(ConnectionState::Disconnected);
        let (queue, outbound) = mpsc::unbounded_channel();
        let (action_queue, actions) = mpsc::unbounded_channel();
        Self {
            connector,
            prober,
            dispatcher,
            reporter,
            schedule,
            state,
            view: watch::Sender::new(TreeSnapshot::default()),
            outbound,
            sender: EventSender::new(state_rx, queue),
            actions,
            action_sender: ActionSender::new(action_queue),
        }
    }

    /// Handle for sending events over whichever session is current.
    #[must_use]
    pub fn event_sender(&self) -> EventSender {
        self.sender.clone()
    }

    /// Handle for dismissing and clicking components of the current session.
    #[must_use]
    pub fn action_sender(&self) -> ActionSender {
        self.action_sender.clone()
    }

    /// Receiver tracking the current session's tree.
    #[must_use]
    pub fn watch_tree(&self) -> watch::Receiver<TreeSnapshot> {
        self.view.subscribe()
    }

    /// Current connection state.
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    /// Receiver tracking connection state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ConnectionState> {
        self.state.subscribe()
    }

    /// Runs sessions back to back, each on a fresh tree.
    pub async fn run(&mut self) -> Infallible {
        loop {
            let mut tree = Tree::new();
            self.run_session(&mut tree).await;
        }
    }

    /// Runs one session against `tree` until the server asks for a reload.
    pub async fn run_session(&mut self, tree: &mut Tree) {
        self.discard_outbound();
        self.discard_actions();
        self.publish(tree);
        self.transition(ConnectionState::Connecting);
        let end = match self.connector.connect().await {
            Ok(transport) => {
                self.transition(ConnectionState::Connected);
                self.pump(tree, transport).await
            }
            Err(error) => {
                warn!(
                    target: CONNECTION_TARGET,
                    error = %error,
                    "failed to open update channel"
                );
                ChannelEnd::Lost
            }
        };
        self.transition(ConnectionState::Disconnected);
        if matches!(end, ChannelEnd::Lost) {
            self.await_server().await;
        }
        self.reporter.reload_requested();
    }

    async fn pump(&mut self, tree: &mut Tree, mut transport: C::Transport) -> ChannelEnd {
        let period = self.schedule.connected;
        let mut probe = time::interval_at(Instant::now() + period, period);
        probe.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            let deadline = tree.next_deadline();
            tokio::select! {
                frame = transport.next_frame() => match frame {
                    Some(Ok(frame)) => self.apply(tree, &frame),
                    Some(Err(error)) => {
                        warn!(target: CONNECTION_TARGET, error = %error, "update channel failed");
                        return ChannelEnd::Lost;
                    }
                    None => {
                        info!(target: CONNECTION_TARGET, "update channel closed");
                        return ChannelEnd::Lost;
                    }
                },
                _ = probe.tick() => {
                    if self.probe(period).await == ProbeOutcome::Alive {
                        return ChannelEnd::Reload;
                    }
                }
                Some(event) = self.outbound.recv() => deliver(&mut transport, &event).await,
                Some(action) = self.actions.recv() => self.perform(tree, &action),
                () = wait_until(deadline) => {
                    let report = self.dispatcher.tick(tree, now());
                    debug!(
                        target: SESSION_TARGET,
                        refreshed = report.refreshed.len(),
                        expired = report.expired.len(),
                        "component timers serviced"
                    );
                    self.publish(tree);
                }
            }
        }
    }

    fn apply(&self, tree: &mut Tree, frame: &Frame) {
        let report = self.dispatcher.apply_frame(tree, frame, now());
        let has_content = !tree.region(Region::Tabs).is_empty();
        self.reporter.frame_applied(&report, has_content);
        self.publish(tree);
    }

    fn perform(&self, tree: &mut Tree, action: &UserAction) {
        match action {
            UserAction::Dismiss(address) => {
                if let Err(error) = self.dispatcher.dismiss(tree, address) {
                    warn!(
                        target: SESSION_TARGET,
                        address = %address,
                        class = error.class(),
                        error = %error,
                        "dismissal ignored"
                    );
                }
            }
            UserAction::Click(address) => {
                let queued = self.sender.click(tree, address);
                debug!(target: SESSION_TARGET, address = %address, queued, "click handled");
            }
        }
        self.publish(tree);
    }

    fn publish(&self, tree: &Tree) {
        let snapshot = tree.snapshot();
        self.view.send_modify(|view| *view = snapshot);
    }

    async fn await_server(&self) {
        let period = self.schedule.disconnected;
        let mut ticker = time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            if self.probe(period).await == ProbeOutcome::Alive {
                return;
            }
        }
    }

    async fn probe(&self, period: Duration) -> ProbeOutcome {
        let limit = probe_timeout(period);
        let outcome = time::timeout(limit, self.prober.probe(limit))
            .await
            .unwrap_or(ProbeOutcome::TimedOut);
        match &outcome {
            ProbeOutcome::Alive => info!(
                target: CONNECTION_TARGET,
                "server answered the probe with a reload request"
            ),
            ProbeOutcome::Status(status) => debug!(
                target: CONNECTION_TARGET,
                status,
                "probe answered"
            ),
            ProbeOutcome::TimedOut => warn!(
                target: CONNECTION_TARGET,
                timeout_ms = limit.as_millis(),
                "probe timed out"
            ),
            ProbeOutcome::Failed(message) => warn!(
                target: CONNECTION_TARGET,
                error = %message,
                "probe failed"
            ),
        }
        outcome
    }

    fn transition(&self, next: ConnectionState) {
        let previous = self.state.send_replace(next);
        if previous != next {
            debug!(
                target: CONNECTION_TARGET,
                from = %previous,
                to = %next,
                "connection state changed"
            );
            self.reporter.connection_changed(next);
        }
    }

    fn discard_actions(&mut self) {
        while let Ok(action) = self.actions.try_recv() {
            debug!(
                target: SESSION_TARGET,
                action = ?action,
                "discarding user action queued for a previous session"
            );
        }
    }

    fn discard_outbound(&mut self) {
        while let Ok(event) = self.outbound.try_recv() {
            debug!(
                target: SESSION_TARGET,
                id = %event.id,
                event = %event.event,
                "discarding event queued for a previous session"
            );
        }
    }
}

async fn deliver<T: Transport>(transport: &mut T, event: &OutboundEvent) {
    let text = match serde_json::to_string(event) {
        Ok(text) => text,
        Err(error) => {
            warn!(target: SESSION_TARGET, error = %error, "failed to encode outbound event");
            return;
        }
    };
    if let Err(error) = transport.send_text(text).await {
        warn!(
            target: SESSION_TARGET,
            id = %event.id,
            error = %error,
            "failed to send outbound event"
        );
    }
}

async fn wait_until(deadline: Option<std::time::Instant>) {
    match deadline {
        Some(deadline) => time::sleep_until(Instant::from_std(deadline)).await,
        None => std::future::pending().await,
    }
}

fn now() -> std::time::Instant {
    Instant::now().into_std()
}
