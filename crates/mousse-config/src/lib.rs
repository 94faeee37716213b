//! Shared configuration for the MintMousse live-update client.
//!
//! Settings are layered by `ortho_config`: built-in defaults, then an optional
//! TOML file (`--config-path` or `MOUSSE_CONFIG_PATH`), then `MOUSSE_*`
//! environment variables, then command-line flags.

mod defaults;
mod endpoint;
mod logging;

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

pub use defaults::{
    DEFAULT_LOG_FILTER, DEFAULT_PROBE_INTERVAL_SECS, DEFAULT_RECONNECT_PROBE_INTERVAL_SECS,
    DEFAULT_SERVER_URL, MIN_PROBE_INTERVAL, clamp_probe_interval, default_log_filter,
    default_log_filter_string, default_log_format, default_probe_interval_secs,
    default_reconnect_probe_interval_secs, default_server_url,
};
pub use endpoint::{EndpointError, PROBE_PATH, ServerEndpoints, UPDATE_CHANNEL_PATH};
pub use logging::{LogFormat, LogFormatParseError};

/// Runtime configuration of the live-update client.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "MOUSSE")]
pub struct Config {
    /// Base URL of the server; the update channel and probe derive from it.
    #[serde(default = "default_server_url")]
    #[ortho_config(default = default_server_url())]
    pub server_url: String,
    /// Seconds between liveness probes while the update channel is open.
    #[serde(default = "default_probe_interval_secs")]
    #[ortho_config(default = default_probe_interval_secs())]
    pub probe_interval_secs: f64,
    /// Seconds between liveness probes while the server is unreachable.
    #[serde(default = "default_reconnect_probe_interval_secs")]
    #[ortho_config(default = default_reconnect_probe_interval_secs())]
    pub reconnect_probe_interval_secs: f64,
    /// Tracing filter expression.
    #[serde(default = "default_log_filter_string")]
    #[ortho_config(default = default_log_filter_string())]
    pub log_filter: String,
    /// Output format of the structured log.
    #[serde(default = "default_log_format")]
    #[ortho_config(default = default_log_format())]
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            probe_interval_secs: default_probe_interval_secs(),
            reconnect_probe_interval_secs: default_reconnect_probe_interval_secs(),
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
        }
    }
}

impl Config {
    /// Configured server base URL.
    #[must_use]
    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    /// Probe period while connected, never shorter than [`MIN_PROBE_INTERVAL`].
    #[must_use]
    pub fn probe_interval(&self) -> Duration {
        clamp_probe_interval(self.probe_interval_secs)
    }

    /// Probe period while disconnected, never shorter than [`MIN_PROBE_INTERVAL`].
    #[must_use]
    pub fn reconnect_probe_interval(&self) -> Duration {
        clamp_probe_interval(self.reconnect_probe_interval_secs)
    }

    /// Tracing filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Structured log format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Derives the update channel and probe URLs from [`Self::server_url`].
    ///
    /// # Errors
    ///
    /// Returns [`EndpointError`] when the server URL is unusable.
    pub fn endpoints(&self) -> Result<ServerEndpoints, EndpointError> {
        ServerEndpoints::from_base(&self.server_url)
    }
}

#[cfg(test)]
mod tests {
    use std::ffi::OsString;

    use ortho_config::OrthoConfig;

    use super::*;

    #[test]
    fn loads_defaults_without_any_overrides() {
        let config = Config::load_from_iter(vec![OsString::from("mousse-live")])
            .expect("defaults load on their own");
        assert_eq!(config, Config::default());
    }

    #[test]
    fn defaults_point_at_local_server() {
        let config = Config::default();
        let endpoints = config.endpoints().expect("default endpoints");
        assert_eq!(
            endpoints.updates().as_str(),
            "ws://127.0.0.1:8080/live-updates"
        );
        assert_eq!(config.probe_interval(), Duration::from_secs(1));
        assert_eq!(config.reconnect_probe_interval(), Duration::from_secs(2));
        assert_eq!(config.log_format(), LogFormat::Json);
    }

    #[test]
    fn short_intervals_are_clamped() {
        let config = Config {
            probe_interval_secs: 0.05,
            ..Config::default()
        };
        assert_eq!(config.probe_interval(), MIN_PROBE_INTERVAL);
    }
}
