//! BDD test worlds: bootstrap state and live-session state for step functions.

use std::cell::RefCell;
use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;

use crate::bootstrap::{BootstrapError, ConfigLoader, LiveClient, bootstrap_with};
use crate::connection::{ConnectionManager, ProbeSchedule};
use crate::dispatch::{Dispatcher, Frame, FrameReport};
use crate::identity::Tree;

use super::config_loader::{FailingConfigLoader, TestConfigLoader};
use super::reporter::RecordingHealthReporter;
use super::transport::{ChannelStep, ScriptedConnector, ScriptedProber};

/// Scenario world for the bootstrap sequence.
pub struct TestWorld {
    loader: Box<dyn ConfigLoader>,
    pub reporter: Arc<RecordingHealthReporter>,
    client: Option<LiveClient>,
    bootstrap_error: Option<BootstrapError>,
}

impl TestWorld {
    /// Builds a world with a successful configuration loader.
    #[must_use]
    pub fn new() -> Self {
        Self {
            loader: Box::new(TestConfigLoader::new()),
            reporter: Arc::new(RecordingHealthReporter::default()),
            client: None,
            bootstrap_error: None,
        }
    }

    /// Installs a loader that always fails.
    pub fn use_failing_loader(&mut self) {
        self.use_loader(Box::new(FailingConfigLoader));
    }

    /// Installs a loader that succeeds.
    pub fn use_successful_loader(&mut self) {
        self.use_loader(Box::new(TestConfigLoader::new()));
    }

    /// Installs a loader pointing at `server_url`.
    pub fn use_server_url(&mut self, server_url: &str) {
        self.use_loader(Box::new(TestConfigLoader::pointing_at(server_url)));
    }

    /// Runs the bootstrap sequence once.
    pub fn bootstrap(&mut self) {
        if self.client.is_some() || self.bootstrap_error.is_some() {
            return;
        }
        match bootstrap_with(&*self.loader, self.reporter.clone()) {
            Ok(client) => self.client = Some(client),
            Err(error) => self.bootstrap_error = Some(error),
        }
    }

    /// Returns whether bootstrap produced an error.
    #[must_use]
    pub fn bootstrap_error(&self) -> Option<&BootstrapError> {
        self.bootstrap_error.as_ref()
    }

    /// The bootstrapped client, if any.
    #[must_use]
    pub fn client(&self) -> Option<&LiveClient> {
        self.client.as_ref()
    }

    fn use_loader(&mut self, loader: Box<dyn ConfigLoader>) {
        self.loader = loader;
        self.client = None;
        self.bootstrap_error = None;
    }
}

impl Default for TestWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Default bootstrap world fixture.
#[must_use]
pub fn world() -> RefCell<TestWorld> {
    RefCell::new(TestWorld::new())
}

/// Scenario world for frames applied to a tree and for whole sessions.
pub struct SessionWorld {
    dispatcher: Dispatcher,
    pub tree: Tree,
    pub last_report: Option<FrameReport>,
    channel: Vec<ChannelStep>,
    channel_available: bool,
    pub prober: ScriptedProber,
    pub connector: ScriptedConnector,
    pub reporter: Arc<RecordingHealthReporter>,
}

impl SessionWorld {
    /// Builds a world with an empty tree and an idle channel.
    #[must_use]
    pub fn new() -> Self {
        Self {
            dispatcher: Dispatcher::with_builtin_widgets(),
            tree: Tree::new(),
            last_report: None,
            channel: Vec::new(),
            channel_available: true,
            prober: ScriptedProber::default(),
            connector: ScriptedConnector::new(),
            reporter: Arc::new(RecordingHealthReporter::default()),
        }
    }

    /// Applies one frame holding `operations` directly to the tree.
    pub fn apply(&mut self, operations: Value) {
        let frame = Frame::Text(operations.to_string());
        self.last_report = Some(
            self.dispatcher
                .apply_frame(&mut self.tree, &frame, Instant::now()),
        );
    }

    /// Appends a step to the scripted update channel.
    pub fn script(&mut self, step: ChannelStep) {
        self.channel.push(step);
    }

    /// Makes every connection attempt fail.
    pub fn refuse_connections(&mut self) {
        self.channel_available = false;
    }

    /// Runs exactly one session on a paused-clock runtime.
    ///
    /// # Panics
    ///
    /// Panics when the runtime cannot be built.
    pub fn run_session(&mut self) {
        let connector = if self.channel_available {
            ScriptedConnector::new().with_channel(self.channel.clone())
        } else {
            ScriptedConnector::new()
        };
        self.connector = connector.clone();
        let mut manager = ConnectionManager::new(
            connector,
            self.prober.clone(),
            Dispatcher::with_builtin_widgets(),
            self.reporter.clone(),
            ProbeSchedule {
                connected: std::time::Duration::from_secs(1),
                disconnected: std::time::Duration::from_secs(2),
            },
        );
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .start_paused(true)
            .build()
            .expect("build paused runtime");
        let mut tree = Tree::new();
        runtime.block_on(manager.run_session(&mut tree));
        self.tree = tree;
    }
}

impl Default for SessionWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Default session world fixture.
#[must_use]
pub fn session_world() -> RefCell<SessionWorld> {
    RefCell::new(SessionWorld::new())
}
