//! Scripted update channels and probes for session tests.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::future::{self, Future};
use std::rc::Rc;
use std::time::Duration;

use crate::connection::{Connector, ProbeOutcome, Prober, Transport, TransportError};
use crate::dispatch::Frame;

/// One scripted event on a channel.
#[derive(Debug, Clone)]
pub enum ChannelStep {
    /// Deliver a text frame.
    Frame(String),
    /// Fail the channel.
    Fail(&'static str),
    /// Close the channel cleanly.
    Close,
}

/// Connector handing out scripted channels in order; refuses once they run
/// out.
#[derive(Debug, Clone, Default)]
pub struct ScriptedConnector {
    channels: Rc<RefCell<VecDeque<Vec<ChannelStep>>>>,
    sent: Rc<RefCell<Vec<String>>>,
    attempts: Rc<Cell<usize>>,
}

impl ScriptedConnector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a channel that plays `steps` and then stays open and idle.
    #[must_use]
    pub fn with_channel(self, steps: Vec<ChannelStep>) -> Self {
        self.channels.borrow_mut().push_back(steps);
        self
    }

    /// Text frames written by the client.
    #[must_use]
    pub fn sent(&self) -> Vec<String> {
        self.sent.borrow().clone()
    }

    /// Number of connection attempts made.
    #[must_use]
    pub fn attempts(&self) -> usize {
        self.attempts.get()
    }
}

impl Connector for ScriptedConnector {
    type Transport = ScriptedTransport;

    fn connect(&self) -> impl Future<Output = Result<ScriptedTransport, TransportError>> {
        self.attempts.set(self.attempts.get() + 1);
        let result = self
            .channels
            .borrow_mut()
            .pop_front()
            .map(|steps| ScriptedTransport {
                steps: steps.into(),
                sent: Rc::clone(&self.sent),
            })
            .ok_or_else(|| TransportError::connect("ws://scripted/live-updates", "refused"));
        future::ready(result)
    }
}

/// Channel produced by [`ScriptedConnector`].
#[derive(Debug)]
pub struct ScriptedTransport {
    steps: VecDeque<ChannelStep>,
    sent: Rc<RefCell<Vec<String>>>,
}

impl Transport for ScriptedTransport {
    async fn next_frame(&mut self) -> Option<Result<Frame, TransportError>> {
        match self.steps.pop_front() {
            Some(ChannelStep::Frame(text)) => Some(Ok(Frame::Text(text))),
            Some(ChannelStep::Fail(message)) => Some(Err(TransportError::channel(message))),
            Some(ChannelStep::Close) => None,
            None => future::pending().await,
        }
    }

    fn send_text(&mut self, text: String) -> impl Future<Output = Result<(), TransportError>> {
        self.sent.borrow_mut().push(text);
        future::ready(Ok(()))
    }
}

/// One scripted probe answer.
#[derive(Debug, Clone)]
pub enum ProbeReply {
    /// Answer immediately.
    Answer(ProbeOutcome),
    /// Never answer.
    Hang,
}

/// Prober replaying scripted answers, then answering `200` forever.
#[derive(Debug, Clone, Default)]
pub struct ScriptedProber {
    replies: Rc<RefCell<VecDeque<ProbeReply>>>,
    timeouts: Rc<RefCell<Vec<Duration>>>,
}

impl ScriptedProber {
    #[must_use]
    pub fn new(replies: impl IntoIterator<Item = ProbeReply>) -> Self {
        Self {
            replies: Rc::new(RefCell::new(replies.into_iter().collect())),
            timeouts: Rc::default(),
        }
    }

    /// Prober that answers `200` `quiet` times and then requests a reload.
    #[must_use]
    pub fn reload_after(quiet: usize) -> Self {
        Self::new(
            std::iter::repeat_n(ProbeReply::Answer(ProbeOutcome::Status(200)), quiet)
                .chain([ProbeReply::Answer(ProbeOutcome::Alive)]),
        )
    }

    /// Number of probes issued.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.timeouts.borrow().len()
    }

    /// Timeouts passed to each probe.
    #[must_use]
    pub fn timeouts(&self) -> Vec<Duration> {
        self.timeouts.borrow().clone()
    }
}

impl Prober for ScriptedProber {
    async fn probe(&self, timeout: Duration) -> ProbeOutcome {
        self.timeouts.borrow_mut().push(timeout);
        let reply = self
            .replies
            .borrow_mut()
            .pop_front()
            .unwrap_or(ProbeReply::Answer(ProbeOutcome::Status(200)));
        match reply {
            ProbeReply::Answer(outcome) => outcome,
            ProbeReply::Hang => future::pending().await,
        }
    }
}
