//! Telemetry helpers for structured logging and tracing.

use tracing_subscriber::EnvFilter;

/// Initialize tracing/telemetry.
///
/// Users can install their own subscriber first; this helper installs an
/// env-filtered fmt subscriber only if none is set, defaulting to `info`
/// when `RUST_LOG` is absent. Calling it more than once is a no-op.
pub fn init_tracing() {
    if tracing::dispatcher::has_been_set() {
        return;
    }
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
