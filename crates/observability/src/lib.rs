//! Log setup for the login entry points.

/// Route login decision logs to stderr as JSON.
///
/// Called at the top of every PAM hook; only the first call installs anything.
pub fn init() {
    tracing::init();
}

/// Subscriber construction and filtering.
pub mod tracing;
