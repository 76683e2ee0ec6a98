//! Authentication error model.

use thiserror::Error;

/// Result type used across the decision engine.
pub type AuthResult<T> = Result<T, AuthError>;

/// Reason a login attempt was denied (or could not be decided).
///
/// Every variant is a denial. There is no "unknown" outcome that a caller could
/// accidentally treat as success.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The authorization API could not be reached (connect error, timeout, abort).
    #[error("transport error: {0}")]
    Transport(String),

    /// The authorization API answered 200 with a body we could not decode.
    #[error("malformed authorization response: {0}")]
    Protocol(String),

    /// 406: the user has no delegated-access configuration at all.
    #[error("user not authorized for JIT access to database")]
    NotProvisioned,

    /// 403: the authorization API explicitly refused the user.
    #[error("user not authorized due to restriction")]
    Forbidden,

    /// Any other non-200 answer from the authorization API.
    #[error("authorization API failed with status: {0}")]
    UpstreamFailure(u16),

    #[error("empty username")]
    EmptyUser,

    /// No granted role matches the requested database user.
    #[error("not permitted to assume {0}")]
    RoleNotPermitted(String),

    /// A role carried an expiry that is not a millisecond epoch timestamp.
    #[error("invalid role expiry: {0}")]
    InvalidExpiry(String),

    #[error("access to role has expired")]
    AccessExpired,

    /// The remote host is not inside any of the role's allowed networks.
    #[error("connection origin not allowed")]
    OriginNotAllowed,

    /// Module arguments were malformed, or a required setting is missing.
    #[error("configuration error: {0}")]
    Config(String),

    /// The local account store rejected the username/password pair.
    #[error("invalid credentials: {0}")]
    InvalidCredentials(String),
}

impl AuthError {
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    pub fn protocol(msg: impl Into<String>) -> Self {
        Self::Protocol(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn invalid_credentials(msg: impl Into<String>) -> Self {
        Self::InvalidCredentials(msg.into())
    }

    /// Stable machine-readable code, used as a structured log field.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::Protocol(_) => "protocol",
            Self::NotProvisioned => "not_provisioned",
            Self::Forbidden => "forbidden",
            Self::UpstreamFailure(_) => "upstream_failure",
            Self::EmptyUser => "empty_user",
            Self::RoleNotPermitted(_) => "role_not_permitted",
            Self::InvalidExpiry(_) => "invalid_expiry",
            Self::AccessExpired => "access_expired",
            Self::OriginNotAllowed => "origin_not_allowed",
            Self::Config(_) => "config",
            Self::InvalidCredentials(_) => "invalid_credentials",
        }
    }

    /// Whether the failure is a problem with the module itself rather than with
    /// the login attempt.
    pub fn is_service_error(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}
