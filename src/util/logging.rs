//! Logging bootstrap.
//!
//! The library only emits `tracing` events. Hosts that want them printed
//! call [`init`] once; repeated calls are no-ops.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directive.
pub const LOG_ENV: &str = "SCENEBRIDGE_LOG";

/// Install a fmt subscriber filtered by `SCENEBRIDGE_LOG`, then `RUST_LOG`,
/// defaulting to `warn`.
pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// Same as [`init`] but writes through the test harness capture.
pub fn init_for_tests() {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new("debug"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}
