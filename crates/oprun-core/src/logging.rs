//! Logging setup
//!
//! Logs go to stderr so the child's stdout stays clean. Quiet by default;
//! `RUST_LOG=oprun_core=debug` shows config source, plan and exit status.

use tracing_subscriber::EnvFilter;

pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    // A subscriber may already be installed (tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
