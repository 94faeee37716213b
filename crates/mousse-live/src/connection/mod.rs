//! Update channel lifecycle, liveness probing, and session resync.
//!
//! The [`ConnectionManager`] owns the transport and drives one session at a
//! time: frames go through the [`Dispatcher`](crate::dispatch::Dispatcher)
//! into a fresh [`Tree`](crate::identity::Tree), a periodic probe watches for
//! the server asking for a reload, and a lost channel is followed by
//! probing until the server is back. Sessions are never resumed in place.

mod manager;
mod probe;
mod state;
mod transport;
mod websocket;

pub use manager::{ConnectionManager, ProbeSchedule};
pub use probe::{HttpProber, PROBE_TIMEOUT_MARGIN, ProbeOutcome, Prober, probe_timeout};
pub use state::ConnectionState;
pub use transport::{Connector, Transport, TransportError};
pub use websocket::{WebSocketConnector, WebSocketTransport};

/// Tracing target for transport and probe events.
pub(crate) const CONNECTION_TARGET: &str = concat!(env!("CARGO_CRATE_NAME"), "::connection");
