use strum::Display;

/// Lifecycle of the update channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum ConnectionState {
    /// No channel is open.
    #[default]
    Disconnected,
    /// A channel is being opened.
    Connecting,
    /// Frames are flowing.
    Connected,
}

impl ConnectionState {
    /// Whether outbound events can be sent.
    #[must_use]
    pub const fn is_connected(self) -> bool {
        matches!(self, Self::Connected)
    }
}
