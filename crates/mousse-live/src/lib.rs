//! Live-update client for MintMousse dashboards.
//!
//! The client mirrors server-authoritative UI state in an explicit [`Tree`]
//! of component instances. The server pushes frames of operations over a
//! WebSocket; each frame is decoded, and its operations are dispatched in
//! order to pluggable [`ComponentHandler`]s through a registration table.
//! Every operation runs behind its own fault boundary, so a malformed or
//! stale operation costs only itself.
//!
//! A liveness probe runs alongside the channel. When the server answers it
//! with `204 No Content`, or answers again after the channel was lost, the
//! client discards the tree and starts a new session rather than patching
//! the old one.
//!
//! Front ends observe the session's tree through
//! [`ConnectionManager::watch_tree`] and feed dismissals and clicks back
//! through an [`ActionSender`].
//!
//! [`bootstrap_with`] wires configuration from [`mousse_config`], installs
//! telemetry, and returns a [`LiveClient`] that builds the production
//! [`ConnectionManager`].

mod bootstrap;
pub mod component;
pub mod connection;
pub mod dispatch;
pub mod handlers;
mod health;
pub mod identity;
mod interaction;
mod outbound;
mod telemetry;

pub use bootstrap::{
    BootstrapError, ConfigLoader, LiveClient, StaticConfigLoader, SystemConfigLoader,
    bootstrap_with,
};
pub use connection::{ConnectionManager, ConnectionState};
pub use dispatch::{Dispatcher, FrameReport};
pub use handlers::ComponentHandler;
pub use health::{HealthReporter, StructuredHealthReporter};
pub use identity::{Tree, TreeSnapshot};
pub use interaction::{ActionSender, UserAction};
pub use outbound::{CLICK_EVENT, EventSender, OutboundEvent};
pub use telemetry::{TelemetryError, TelemetryHandle};

#[cfg(test)]
mod tests;
