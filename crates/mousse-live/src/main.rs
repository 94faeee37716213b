//! `mousse-live` binary: runs the live-update client until Ctrl-C.

use std::process::ExitCode;
use std::sync::Arc;

use mousse_live::{StructuredHealthReporter, SystemConfigLoader, bootstrap_with};

fn main() -> ExitCode {
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(error) => {
            eprintln!("mousse-live: failed to start runtime: {error}");
            return ExitCode::FAILURE;
        }
    };
    runtime.block_on(run())
}

async fn run() -> ExitCode {
    let reporter = Arc::new(StructuredHealthReporter::new());
    let client = match bootstrap_with(&SystemConfigLoader, reporter) {
        Ok(client) => client,
        Err(error) => {
            eprintln!("mousse-live: {error}");
            return ExitCode::FAILURE;
        }
    };

    let mut manager = client.connection_manager();
    tokio::select! {
        never = manager.run() => match never {},
        signal = tokio::signal::ctrl_c() => match signal {
            Ok(()) => ExitCode::SUCCESS,
            Err(error) => {
                eprintln!("mousse-live: failed to listen for Ctrl-C: {error}");
                ExitCode::FAILURE
            }
        },
    }
}
