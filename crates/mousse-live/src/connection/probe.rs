//! Liveness probe against the server's ping endpoint.

use std::future::Future;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use url::Url;

/// Amount by which a probe's timeout undercuts its interval.
pub const PROBE_TIMEOUT_MARGIN: Duration = Duration::from_millis(100);

/// Result of one liveness probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The server answered `204 No Content` and wants clients to reload.
    Alive,
    /// The server answered with another status.
    Status(u16),
    /// No answer arrived before the timeout.
    TimedOut,
    /// The request failed outright.
    Failed(String),
}

/// Issues liveness probes.
pub trait Prober {
    /// Probes once, giving up after `timeout`.
    fn probe(&self, timeout: Duration) -> impl Future<Output = ProbeOutcome>;
}

/// Timeout for a probe issued every `interval`.
#[must_use]
pub fn probe_timeout(interval: Duration) -> Duration {
    interval.saturating_sub(PROBE_TIMEOUT_MARGIN)
}

/// Probes `GET <server>/api/ping` over HTTP.
#[derive(Debug, Clone)]
pub struct HttpProber {
    client: Client,
    url: Url,
}

impl HttpProber {
    /// Prober for `url`.
    ///
    /// # Errors
    ///
    /// Returns the [`reqwest::Error`] raised while building the HTTP client.
    pub fn new(url: Url) -> Result<Self, reqwest::Error> {
        let client = Client::builder().build()?;
        Ok(Self { client, url })
    }

    /// Probe URL.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }
}

impl Prober for HttpProber {
    async fn probe(&self, timeout: Duration) -> ProbeOutcome {
        let response = self
            .client
            .get(self.url.clone())
            .timeout(timeout)
            .send()
            .await;
        match response {
            Ok(response) if response.status() == StatusCode::NO_CONTENT => ProbeOutcome::Alive,
            Ok(response) => ProbeOutcome::Status(response.status().as_u16()),
            Err(error) if error.is_timeout() => ProbeOutcome::TimedOut,
            Err(error) => ProbeOutcome::Failed(error.to_string()),
        }
    }
}
