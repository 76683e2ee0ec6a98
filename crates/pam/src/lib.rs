//! `jitgate-pam` — host integration for the PAM `authenticate` hook.
//!
//! Parses module arguments, turns a PAM login event into an evaluation context,
//! runs the decision engine and maps the outcome onto PAM status codes.

pub mod config;
pub mod local;
pub mod login;

pub use config::ModuleConfig;
pub use local::PostgresPasswordVerifier;
pub use login::{LoginEvent, PamModule, PamStatus, authenticate};
