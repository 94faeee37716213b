//! WebSocket update channel.

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::debug;
use url::Url;

use crate::dispatch::Frame;

use super::CONNECTION_TARGET;
use super::transport::{Connector, Transport, TransportError};

/// Opens WebSocket channels to a fixed URL.
#[derive(Debug, Clone)]
pub struct WebSocketConnector {
    url: Url,
}

impl WebSocketConnector {
    /// Connector for the channel at `url`.
    #[must_use]
    pub const fn new(url: Url) -> Self {
        Self { url }
    }

    /// Channel URL.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }
}

impl Connector for WebSocketConnector {
    type Transport = WebSocketTransport;

    async fn connect(&self) -> Result<WebSocketTransport, TransportError> {
        let (stream, response) = connect_async(self.url.as_str())
            .await
            .map_err(|error| TransportError::connect(self.url.as_str(), error))?;
        debug!(
            target: CONNECTION_TARGET,
            url = %self.url,
            status = %response.status(),
            "update channel handshake completed"
        );
        Ok(WebSocketTransport { stream })
    }
}

/// Open WebSocket channel.
pub struct WebSocketTransport {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl Transport for WebSocketTransport {
    async fn next_frame(&mut self) -> Option<Result<Frame, TransportError>> {
        loop {
            let message = match self.stream.next().await? {
                Ok(message) => message,
                Err(error) => return Some(Err(TransportError::channel(error))),
            };
            match message {
                Message::Text(text) => return Some(Ok(Frame::Text(text))),
                Message::Binary(bytes) => return Some(Ok(Frame::Binary(bytes))),
                Message::Close(frame) => {
                    debug!(
                        target: CONNECTION_TARGET,
                        close = ?frame,
                        "update channel closed by the server"
                    );
                    return None;
                }
                // Pongs for incoming pings are queued by tungstenite itself.
                Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => {}
            }
        }
    }

    async fn send_text(&mut self, text: String) -> Result<(), TransportError> {
        self.stream
            .send(Message::Text(text))
            .await
            .map_err(TransportError::channel)
    }
}
