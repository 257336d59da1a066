mod bootstrap;
mod config;
mod gameplay;
mod loop_runner;

use std::process::ExitCode;

use tracing::error;

pub(crate) fn run() -> ExitCode {
    match bootstrap::build_app() {
        Ok(wiring) => loop_runner::run(wiring),
        Err(err) => {
            error!(error = %err, "startup_failed");
            ExitCode::FAILURE
        }
    }
}
