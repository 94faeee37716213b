//! Process-wide tracing subscriber for the client.
//!
//! Events go to stderr with RFC 3339 UTC timestamps, either as flattened
//! JSON objects or as compact lines. Colour is enabled only when stderr is a
//! terminal.

use std::io::{self, IsTerminal};

use once_cell::sync::OnceCell;
use tracing::{Subscriber, subscriber::SetGlobalDefaultError};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::{self, time::UtcTime};

use mousse_config::{Config, LogFormat};

/// Format of the subscriber installed by the first successful call.
static INSTALLED: OnceCell<LogFormat> = OnceCell::new();

/// Proof that the global subscriber is in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TelemetryHandle {
    format: LogFormat,
}

impl TelemetryHandle {
    /// Output format of the installed subscriber.
    ///
    /// This is the format of the first configuration that installed
    /// telemetry, which may differ from the one passed to a later call.
    #[must_use]
    pub const fn format(&self) -> LogFormat {
        self.format
    }
}

/// Errors encountered while configuring telemetry.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// The configured filter expression did not parse.
    #[error("invalid log filter '{expression}': {message}")]
    Filter {
        /// Expression as configured.
        expression: String,
        /// Parser diagnostic.
        message: String,
    },
    /// Another global subscriber was installed first.
    #[error("failed to install telemetry subscriber: {0}")]
    Subscriber(#[source] SetGlobalDefaultError),
}

/// Installs the global subscriber described by `config`.
///
/// Only the first successful call installs anything; later calls return a
/// handle for the subscriber already in place.
///
/// # Errors
///
/// Returns [`TelemetryError`] when the filter does not parse or a subscriber
/// from elsewhere already owns the global slot.
pub fn initialise(config: &Config) -> Result<TelemetryHandle, TelemetryError> {
    INSTALLED
        .get_or_try_init(|| install(config))
        .map(|format| TelemetryHandle { format: *format })
}

fn install(config: &Config) -> Result<LogFormat, TelemetryError> {
    let subscriber = build_subscriber(config)?;
    tracing::subscriber::set_global_default(subscriber).map_err(TelemetryError::Subscriber)?;
    Ok(config.log_format())
}

fn build_subscriber(config: &Config) -> Result<Box<dyn Subscriber + Send + Sync>, TelemetryError> {
    let filter = parse_filter(config.log_filter())?;
    let base = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_timer(UtcTime::rfc_3339());

    Ok(match config.log_format() {
        LogFormat::Json => Box::new(base.json().flatten_event(true).finish()),
        LogFormat::Compact => Box::new(base.compact().finish()),
    })
}

fn parse_filter(expression: &str) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_new(expression).map_err(|error| TelemetryError::Filter {
        expression: expression.to_owned(),
        message: error.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::level("debug")]
    #[case::per_target("mousse_live::dispatch=trace,info")]
    fn accepts_filter_expressions(#[case] expression: &str) {
        assert!(parse_filter(expression).is_ok());
    }

    #[test]
    fn bad_filters_name_the_expression() {
        let config = Config {
            log_filter: "mousse_live=loudest".to_owned(),
            ..Config::default()
        };
        let Err(error) = build_subscriber(&config) else {
            panic!("filter should be rejected");
        };
        assert!(matches!(
            &error,
            TelemetryError::Filter { expression, .. } if expression == "mousse_live=loudest"
        ));
    }
}
