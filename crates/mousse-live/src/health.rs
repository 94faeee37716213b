//! Structured reporting of client lifecycle and session events.

use std::sync::Arc;

use mousse_config::Config;

use crate::bootstrap::BootstrapError;
use crate::connection::ConnectionState;
use crate::dispatch::FrameReport;

/// Tracing target for session-level events.
pub(crate) const SESSION_TARGET: &str = concat!(env!("CARGO_CRATE_NAME"), "::session");

const HEALTH_TARGET: &str = concat!(env!("CARGO_CRATE_NAME"), "::health");

/// Observer surfacing lifecycle events and session indicators.
///
/// The client has no render surface of its own; whatever presents the tree
/// subscribes here for the connected/disconnected indicator, the
/// "no content" indicator, and reload requests.
#[cfg_attr(test, mockall::automock)]
pub trait HealthReporter: Send + Sync {
    /// Invoked before configuration loading begins.
    fn bootstrap_starting(&self);

    /// Invoked after bootstrap completes successfully.
    fn bootstrap_succeeded(&self, config: &Config);

    /// Invoked when bootstrap fails.
    fn bootstrap_failed(&self, error: &BootstrapError);

    /// Invoked whenever the update channel changes state.
    fn connection_changed(&self, state: ConnectionState);

    /// Invoked after each inbound frame; `has_content` is false while the tab
    /// region is empty.
    fn frame_applied(&self, report: &FrameReport, has_content: bool);

    /// Invoked once per session when the tree is discarded for a reload.
    fn reload_requested(&self);
}

impl<T> HealthReporter for Arc<T>
where
    T: HealthReporter,
{
    fn bootstrap_starting(&self) {
        (**self).bootstrap_starting();
    }

    fn bootstrap_succeeded(&self, config: &Config) {
        (**self).bootstrap_succeeded(config);
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        (**self).bootstrap_failed(error);
    }

    fn connection_changed(&self, state: ConnectionState) {
        (**self).connection_changed(state);
    }

    fn frame_applied(&self, report: &FrameReport, has_content: bool) {
        (**self).frame_applied(report, has_content);
    }

    fn reload_requested(&self) {
        (**self).reload_requested();
    }
}

/// Default reporter that records events using `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StructuredHealthReporter;

impl StructuredHealthReporter {
    /// Builds a new reporter.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl HealthReporter for StructuredHealthReporter {
    fn bootstrap_starting(&self) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "bootstrap_starting",
            "starting live-update client"
        );
    }

    fn bootstrap_succeeded(&self, config: &Config) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "bootstrap_succeeded",
            server = %config.server_url(),
            probe_interval_ms = config.probe_interval().as_millis(),
            log_filter = %config.log_filter(),
            log_format = %config.log_format(),
            "live-update client ready"
        );
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        tracing::error!(
            target: HEALTH_TARGET,
            event = "bootstrap_failed",
            error = %error,
            "live-update client failed to start"
        );
    }

    fn connection_changed(&self, state: ConnectionState) {
        if state.is_connected() {
            tracing::info!(
                target: SESSION_TARGET,
                event = "connection_changed",
                state = %state,
                indicator = "connected",
                "update channel connected"
            );
        } else {
            tracing::warn!(
                target: SESSION_TARGET,
                event = "connection_changed",
                state = %state,
                indicator = "disconnected",
                "update channel not connected"
            );
        }
    }

    fn frame_applied(&self, report: &FrameReport, has_content: bool) {
        tracing::debug!(
            target: SESSION_TARGET,
            event = "frame_applied",
            operations = report.outcomes().len(),
            applied = report.applied(),
            dropped = report.decode_error().is_some(),
            has_content,
            "frame applied"
        );
    }

    fn reload_requested(&self) {
        tracing::info!(
            target: SESSION_TARGET,
            event = "reload_requested",
            "discarding the tree for a fresh session"
        );
    }
}
