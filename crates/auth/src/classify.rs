//! Credential classification: decide which verification strategy a login uses.
//!
//! This is a structural heuristic only. Nothing here validates a signature or a
//! claim; a credential that merely *looks* like a token is still checked remotely.

/// Literal prefix of personal access tokens.
pub const PAT_PREFIX: &str = "sbp_";

/// Base64 of `{"`, the opening of every JSON object. JWT header and payload
/// segments both start with it.
pub const JWT_SEGMENT_MARKER: &str = "eyJ";

/// What a credential string looks like.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum CredentialKind {
    Password,
    PersonalAccessToken,
    DelegatedToken,
}

/// How a credential is verified.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum AuthenticatorStrategy {
    /// Native account store check.
    Password,
    /// Remote authorization API + permission evaluation.
    DelegatedToken,
}

impl CredentialKind {
    /// Personal access tokens and delegated tokens share one downstream strategy.
    pub fn strategy(self) -> AuthenticatorStrategy {
        match self {
            CredentialKind::Password => AuthenticatorStrategy::Password,
            CredentialKind::PersonalAccessToken | CredentialKind::DelegatedToken => {
                AuthenticatorStrategy::DelegatedToken
            }
        }
    }
}

impl core::fmt::Display for CredentialKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            CredentialKind::Password => f.write_str("password"),
            CredentialKind::PersonalAccessToken => f.write_str("pat"),
            CredentialKind::DelegatedToken => f.write_str("jwt"),
        }
    }
}

/// Classify a credential. Total and side-effect free.
pub fn classify(credential: &str) -> CredentialKind {
    if looks_like_pat(credential) {
        CredentialKind::PersonalAccessToken
    } else if looks_like_jwt(credential) {
        CredentialKind::DelegatedToken
    } else {
        CredentialKind::Password
    }
}

fn looks_like_pat(credential: &str) -> bool {
    credential.starts_with(PAT_PREFIX)
}

fn looks_like_jwt(credential: &str) -> bool {
    let mut segments = credential.split('.');
    match (segments.next(), segments.next(), segments.next(), segments.next()) {
        (Some(header), Some(payload), Some(_signature), None) => {
            header.starts_with(JWT_SEGMENT_MARKER) && payload.starts_with(JWT_SEGMENT_MARKER)
        }
        _ => false,
    }
}
