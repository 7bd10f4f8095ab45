// src/lib.rs
pub mod aws;
pub mod cli;
pub mod config;
pub mod teardown;

pub use config::Config;
pub use teardown::{run_teardown, CloudServices, TeardownPlan, TeardownReport, TeardownStep};

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber.
/// Uses RUST_LOG env var for filtering (defaults to warn; progress lines go to stderr directly).
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}
