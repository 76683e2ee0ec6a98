//! Per-login evaluation context.

use chrono::{DateTime, Utc};

use crate::network::RemoteHost;

/// Everything a decision needs to know about the login attempt besides the
/// credential itself.
///
/// Built once per login event and passed by reference through every call; it is
/// never mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationContext {
    username: String,
    remote_host: RemoteHost,
    now: DateTime<Utc>,
}

impl EvaluationContext {
    pub fn new(
        username: impl Into<String>,
        remote_host: impl Into<RemoteHost>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            username: username.into(),
            remote_host: remote_host.into(),
            now,
        }
    }

    /// Context stamped with the current wall-clock time.
    pub fn now(username: impl Into<String>, remote_host: impl Into<RemoteHost>) -> Self {
        Self::new(username, remote_host, Utc::now())
    }

    /// Database user the login attempt wants to assume.
    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn remote_host(&self) -> &RemoteHost {
        &self.remote_host
    }

    pub fn evaluated_at(&self) -> DateTime<Utc> {
        self.now
    }
}
