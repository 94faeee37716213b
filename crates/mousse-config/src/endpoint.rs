use std::fmt;

use thiserror::Error;
use url::Url;

/// Path of the persistent update channel on the server.
pub const UPDATE_CHANNEL_PATH: &str = "/live-updates";

/// Path answered by the server's liveness probe.
pub const PROBE_PATH: &str = "/api/ping";

/// URLs derived from the configured server base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerEndpoints {
    updates: Url,
    probe: Url,
}

impl ServerEndpoints {
    /// Derives the WebSocket update channel and the HTTP probe URL.
    ///
    /// The base may use an HTTP or a WebSocket scheme; `http` pairs with `ws`
    /// and `https` with `wss`. Any path, query, or fragment on the base is
    /// replaced by the fixed protocol paths.
    ///
    /// # Errors
    ///
    /// Returns [`EndpointError`] when the base does not parse, lacks a host, or
    /// uses a scheme other than `http`, `https`, `ws`, or `wss`.
    pub fn from_base(base: &str) -> Result<Self, EndpointError> {
        let url = Url::parse(base)?;
        if url.host_str().is_none() {
            return Err(EndpointError::MissingHost(base.to_owned()));
        }
        let (http_scheme, ws_scheme) = match url.scheme() {
            "http" | "ws" => ("http", "ws"),
            "https" | "wss" => ("https", "wss"),
            other => return Err(EndpointError::UnsupportedScheme(other.to_owned())),
        };

        let updates = with_scheme_and_path(&url, ws_scheme, UPDATE_CHANNEL_PATH, base)?;
        let probe = with_scheme_and_path(&url, http_scheme, PROBE_PATH, base)?;
        Ok(Self { updates, probe })
    }

    /// WebSocket URL of the update channel.
    #[must_use]
    pub fn updates(&self) -> &Url {
        &self.updates
    }

    /// HTTP URL of the liveness probe.
    #[must_use]
    pub fn probe(&self) -> &Url {
        &self.probe
    }
}

impl fmt::Display for ServerEndpoints {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "updates={} probe={}", self.updates, self.probe)
    }
}

fn with_scheme_and_path(
    base: &Url,
    scheme: &str,
    path: &str,
    original: &str,
) -> Result<Url, EndpointError> {
    let mut url = base.clone();
    url.set_scheme(scheme)
        .map_err(|()| EndpointError::UnsupportedScheme(original.to_owned()))?;
    url.set_path(path);
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

/// Errors encountered while deriving [`ServerEndpoints`].
#[derive(Debug, Error)]
pub enum EndpointError {
    /// Scheme was not recognised.
    #[error("unsupported server scheme '{0}'")]
    UnsupportedScheme(String),
    /// The base URL carried no host name.
    #[error("missing server host in '{0}'")]
    MissingHost(String),
    /// URL failed to parse.
    #[error(transparent)]
    Url(#[from] url::ParseError),
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::http(
        "http://localhost:8080",
        "ws://localhost:8080/live-updates",
        "http://localhost:8080/api/ping"
    )]
    #[case::https(
        "https://example.org",
        "wss://example.org/live-updates",
        "https://example.org/api/ping"
    )]
    #[case::websocket_base(
        "ws://127.0.0.1:9000/ignored?q=1",
        "ws://127.0.0.1:9000/live-updates",
        "http://127.0.0.1:9000/api/ping"
    )]
    fn derives_endpoints(#[case] base: &str, #[case] updates: &str, #[case] probe: &str) {
        let endpoints = ServerEndpoints::from_base(base).expect("derive endpoints");
        assert_eq!(endpoints.updates().as_str(), updates);
        assert_eq!(endpoints.probe().as_str(), probe);
    }

    #[test]
    fn rejects_unsupported_scheme() {
        let error = ServerEndpoints::from_base("ftp://example.org").expect_err("ftp rejected");
        assert!(matches!(error, EndpointError::UnsupportedScheme(_)));
    }

    #[test]
    fn rejects_unparseable_base() {
        let error = ServerEndpoints::from_base("not a url").expect_err("garbage rejected");
        assert!(matches!(error, EndpointError::Url(_)));
    }
}
