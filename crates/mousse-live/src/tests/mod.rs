//! Test suites for the live-update client.

mod live_updates_behaviour;
mod support;
