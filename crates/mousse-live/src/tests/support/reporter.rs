//! Test double for [`HealthReporter`] that records events for assertions.

use std::sync::Mutex;

use mousse_config::Config;

use crate::bootstrap::BootstrapError;
use crate::connection::ConnectionState;
use crate::dispatch::FrameReport;
use crate::health::HealthReporter;

/// Health events tracked during scenarios.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HealthEvent {
    /// Bootstrap started.
    BootstrapStarting,
    /// Bootstrap completed successfully.
    BootstrapSucceeded,
    /// Bootstrap failed with an error description.
    BootstrapFailed(String),
    /// The connection state changed.
    ConnectionChanged(ConnectionState),
    /// A frame was applied.
    FrameApplied {
        /// Operations that took effect.
        applied: usize,
        /// Operations that failed or were skipped.
        failed: usize,
        /// Whether the tab region held anything afterwards.
        has_content: bool,
    },
    /// The session ended with a reload.
    ReloadRequested,
}

/// Records health events for assertions.
#[derive(Debug, Default)]
pub struct RecordingHealthReporter {
    events: Mutex<Vec<HealthEvent>>,
}

impl RecordingHealthReporter {
    /// Captures a copy of the recorded events.
    #[must_use]
    pub fn events(&self) -> Vec<HealthEvent> {
        self.events
            .lock()
            .expect("health reporter mutex poisoned")
            .clone()
    }

    /// Number of reload requests seen so far.
    #[must_use]
    pub fn reloads(&self) -> usize {
        self.events()
            .iter()
            .filter(|event| **event == HealthEvent::ReloadRequested)
            .count()
    }

    pub fn record(&self, event: HealthEvent) {
        self.events
            .lock()
            .expect("health reporter mutex poisoned")
            .push(event);
    }
}

impl HealthReporter for RecordingHealthReporter {
    fn bootstrap_starting(&self) {
        self.record(HealthEvent::BootstrapStarting);
    }

    fn bootstrap_succeeded(&self, _config: &Config) {
        self.record(HealthEvent::BootstrapSucceeded);
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        self.record(HealthEvent::BootstrapFailed(error.to_string()));
    }

    fn connection_changed(&self, state: ConnectionState) {
        self.record(HealthEvent::ConnectionChanged(state));
    }

    fn frame_applied(&self, report: &FrameReport, has_content: bool) {
        self.record(HealthEvent::FrameApplied {
            applied: report.applied(),
            failed: report.errors().count(),
            has_content,
        });
    }

    fn reload_requested(&self) {
        self.record(HealthEvent::ReloadRequested);
    }
}
