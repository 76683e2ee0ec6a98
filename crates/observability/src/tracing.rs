//! Structured log output for login decisions.
//!
//! The module is loaded into the PAM stack of a database server, so records are
//! written to stderr and never interleave with the host's stdout protocol.

use tracing_subscriber::EnvFilter;

/// Install a JSON subscriber on stderr, filtered by `RUST_LOG` (default `info`).
///
/// Returns without effect when a global subscriber is already set, whether by an
/// earlier login event or by the host process.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // The only failure mode is "already initialized".
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
