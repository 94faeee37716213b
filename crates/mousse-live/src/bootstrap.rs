//! Client bootstrap orchestration.

use std::sync::Arc;

use mousse_config::{Config, EndpointError, ServerEndpoints};
use ortho_config::{OrthoConfig, OrthoError};
use thiserror::Error;

use crate::connection::{ConnectionManager, HttpProber, ProbeSchedule, WebSocketConnector};
use crate::dispatch::Dispatcher;
use crate::health::HealthReporter;
use crate::telemetry::{self, TelemetryError, TelemetryHandle};

/// Trait abstracting configuration loading for testability.
pub trait ConfigLoader: Send + Sync {
    /// Loads the client configuration.
    ///
    /// # Errors
    ///
    /// Returns the [`OrthoError`] raised while layering configuration.
    fn load(&self) -> Result<Config, Arc<OrthoError>>;
}

/// Loader that delegates to [`Config::load`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemConfigLoader;

impl ConfigLoader for SystemConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Config::load()
    }
}

/// Loader returning a fixed configuration.
#[derive(Debug, Clone)]
pub struct StaticConfigLoader {
    config: Config,
}

impl StaticConfigLoader {
    /// Loader that always yields `config`.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }
}

impl ConfigLoader for StaticConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Ok(self.config.clone())
    }
}

/// Errors surfaced during bootstrap.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// Configuration failed to load.
    #[error("failed to load configuration: {source}")]
    Configuration {
        /// Underlying loader error.
        #[source]
        source: Arc<OrthoError>,
    },
    /// Telemetry initialisation failed.
    #[error("failed to initialise telemetry: {source}")]
    Telemetry {
        /// Underlying telemetry error.
        #[source]
        source: TelemetryError,
    },
    /// The server URL does not yield usable endpoints.
    #[error("invalid server URL: {source}")]
    Endpoints {
        /// Underlying URL error.
        #[source]
        source: EndpointError,
    },
    /// The HTTP client for the liveness probe could not be built.
    #[error("failed to build probe client: {source}")]
    HttpClient {
        /// Underlying client error.
        #[source]
        source: reqwest::Error,
    },
}

/// Result of a successful bootstrap invocation.
pub struct LiveClient {
    config: Config,
    endpoints: ServerEndpoints,
    prober: HttpProber,
    telemetry: TelemetryHandle,
    reporter: Arc<dyn HealthReporter>,
}

impl LiveClient {
    /// Accessor for the resolved configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// URLs of the update channel and the probe.
    #[must_use]
    pub fn endpoints(&self) -> &ServerEndpoints {
        &self.endpoints
    }

    /// Accessor for the telemetry handle, primarily useful for testing.
    #[must_use]
    pub fn telemetry(&self) -> TelemetryHandle {
        self.telemetry
    }

    /// Production connection manager over WebSocket and HTTP.
    #[must_use]
    pub fn connection_manager(self) -> ConnectionManager<WebSocketConnector, HttpProber> {
        ConnectionManager::new(
            WebSocketConnector::new(self.endpoints.updates().clone()),
            self.prober,
            Dispatcher::with_builtin_widgets(),
            self.reporter,
            ProbeSchedule::from_config(&self.config),
        )
    }
}

/// Bootstraps the client using the supplied collaborators.
///
/// # Errors
///
/// Returns [`BootstrapError`] when configuration, telemetry, endpoint
/// derivation, or the probe client fails; the reporter sees the failure
/// first.
pub fn bootstrap_with(
    loader: &dyn ConfigLoader,
    reporter: Arc<dyn HealthReporter>,
) -> Result<LiveClient, BootstrapError> {
    reporter.bootstrap_starting();
    match prepare(loader) {
        Ok((config, endpoints, prober, telemetry)) => {
            reporter.bootstrap_succeeded(&config);
            Ok(LiveClient {
                config,
                endpoints,
                prober,
                telemetry,
                reporter,
            })
        }
        Err(error) => {
            reporter.bootstrap_failed(&error);
            Err(error)
        }
    }
}

fn prepare(
    loader: &dyn ConfigLoader,
) -> Result<(Config, ServerEndpoints, HttpProber, TelemetryHandle), BootstrapError> {
    let config = loader
        .load()
        .map_err(|source| BootstrapError::Configuration { source })?;
    let telemetry =
        telemetry::initialise(&config).map_err(|source| BootstrapError::Telemetry { source })?;
    let endpoints = config
        .endpoints()
        .map_err(|source| BootstrapError::Endpoints { source })?;
    let prober = HttpProber::new(endpoints.probe().clone())
        .map_err(|source| BootstrapError::HttpClient { source })?;
    Ok((config, endpoints, prober, telemetry))
}
