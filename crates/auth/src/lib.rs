//! `jitgate-auth` — login decision engine.
//!
//! Classifies a login credential, then either hands it to a local account store
//! or asks the authorization API for the token holder's permission set and
//! evaluates it against the requested role, the clock and the connection origin.
//!
//! This crate knows nothing about PAM; the host shim lives in `jitgate-pam`.

pub mod authenticator;
pub mod classify;
pub mod client;
pub mod evaluate;
pub mod permissions;
pub mod roles;
pub mod wire;

pub use authenticator::{Authenticator, LocalVerifier};
pub use classify::{AuthenticatorStrategy, CredentialKind, classify};
pub use client::{AuthorizationClient, DEFAULT_TIMEOUT};
pub use evaluate::evaluate;
pub use permissions::PermissionSet;
pub use roles::Role;
pub use wire::decode_permission_set;
