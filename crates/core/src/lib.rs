//! `jitgate-core` — shared building blocks for the login decision engine.
//!
//! This crate holds pure values only (no IO): the error taxonomy, the per-login
//! evaluation context and the network types origin checks are made of.

pub mod context;
pub mod error;
pub mod network;
pub mod value_object;

pub use context::EvaluationContext;
pub use error::{AuthError, AuthResult};
pub use network::{CidrParseError, CidrRange, NetworkEntry, RemoteHost};
pub use value_object::ValueObject;
