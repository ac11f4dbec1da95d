//! Logging bootstrap for client binaries and integration tests.

use tracing_subscriber::EnvFilter;

/// Install the process-wide subscriber: JSON output, level filtering via
/// `RUST_LOG` (default `info`).
///
/// Idempotent — a second call (e.g. from another test in the same process)
/// is a no-op.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .try_init();
}
