//! Test configuration loaders for scenarios covering success and failure paths.

use std::ffi::OsString;
use std::sync::Arc;

use mousse_config::{Config, LogFormat};
use ortho_config::{OrthoConfig, OrthoError};

use crate::bootstrap::ConfigLoader;

/// Loader that yields a local configuration without consulting the process
/// environment.
#[derive(Debug, Default)]
pub struct TestConfigLoader {
    server_url: Option<String>,
}

impl TestConfigLoader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loader whose configuration points at `server_url`.
    #[must_use]
    pub fn pointing_at(server_url: &str) -> Self {
        Self {
            server_url: Some(server_url.to_owned()),
        }
    }
}

impl ConfigLoader for TestConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        let defaults = Config::default();
        Ok(Config {
            server_url: self
                .server_url
                .clone()
                .unwrap_or_else(|| defaults.server_url.clone()),
            log_format: LogFormat::Compact,
            ..defaults
        })
    }
}

/// Loader that intentionally fails by passing an unknown log format.
pub struct FailingConfigLoader;

impl ConfigLoader for FailingConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        let args = vec![
            OsString::from("mousse-live"),
            OsString::from("--log-format"),
            OsString::from("pretty"),
        ];
        Config::load_from_iter(args)
    }
}
