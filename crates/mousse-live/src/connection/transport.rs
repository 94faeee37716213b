//! Seams between the session loop and the wire.

use std::future::Future;

use thiserror::Error;

use crate::dispatch::Frame;

/// Errors raised by the update channel.
///
/// Every variant ends the current session with a transition to
/// [`ConnectionState::Disconnected`](super::ConnectionState::Disconnected);
/// none of them is fatal to the client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The channel could not be opened.
    #[error("failed to open update channel at {url}: {message}")]
    Connect {
        /// Channel URL.
        url: String,
        /// Underlying failure.
        message: String,
    },
    /// The open channel failed while reading or writing.
    #[error("update channel failed: {message}")]
    Channel {
        /// Underlying failure.
        message: String,
    },
}

impl TransportError {
    /// Creates a connection failure for `url`.
    #[must_use]
    pub fn connect(url: impl Into<String>, error: impl ToString) -> Self {
        Self::Connect {
            url: url.into(),
            message: error.to_string(),
        }
    }

    /// Creates a failure of an open channel.
    #[must_use]
    pub fn channel(error: impl ToString) -> Self {
        Self::Channel {
            message: error.to_string(),
        }
    }
}

/// An open update channel.
pub trait Transport {
    /// Waits for the next inbound frame.
    ///
    /// Resolves to `None` once the peer closed the channel. Control traffic
    /// is handled internally and never surfaces as a frame.
    fn next_frame(&mut self) -> impl Future<Output = Option<Result<Frame, TransportError>>>;

    /// Writes one text frame.
    fn send_text(&mut self, text: String) -> impl Future<Output = Result<(), TransportError>>;
}

/// Opens update channels.
pub trait Connector {
    /// Channel type produced by [`Self::connect`].
    type Transport: Transport;

    /// Opens a new channel.
    fn connect(&self) -> impl Future<Output = Result<Self::Transport, TransportError>>;
}
