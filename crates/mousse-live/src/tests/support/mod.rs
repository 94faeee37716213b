//! Test harness utilities for the client's unit and behavioural suites.

mod config_loader;
mod reporter;
mod transport;
mod world;

pub use config_loader::{FailingConfigLoader, TestConfigLoader};
pub use reporter::{HealthEvent, RecordingHealthReporter};
pub use transport::{ChannelStep, ProbeReply, ScriptedConnector, ScriptedProber};
pub use world::{SessionWorld, TestWorld, session_world, world};
