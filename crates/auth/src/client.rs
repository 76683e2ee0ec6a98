//! Authorization API client.

use std::time::Duration;

use reqwest::header::ACCEPT;
use reqwest::{StatusCode, Url};

use jitgate_core::{AuthError, AuthResult, EvaluationContext};

use crate::PermissionSet;
use crate::wire::{AuthzRequest, decode_permission_set};

/// Upper bound on one authorization round-trip.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Fetches a subject's permission set from the authorization API.
///
/// The token being checked is also the credential the API is called with, so a
/// successful fetch proves the token is still valid for this project.
///
/// Every call makes exactly one request. Nothing is cached between calls.
#[derive(Debug, Clone)]
pub struct AuthorizationClient {
    endpoint: Url,
    http: reqwest::Client,
}

impl AuthorizationClient {
    pub fn new(endpoint: impl Into<String>) -> AuthResult<Self> {
        Self::with_timeout(endpoint, DEFAULT_TIMEOUT)
    }

    /// Fails with [`AuthError::Config`] unless `endpoint` is an absolute http(s) URL.
    pub fn with_timeout(endpoint: impl Into<String>, timeout: Duration) -> AuthResult<Self> {
        let endpoint = parse_endpoint(&endpoint.into())?;

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .map_err(|e| AuthError::config(format!("failed to build http client: {e}")))?;

        Ok(Self { endpoint, http })
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }

    /// POST `{"role", "rhost"}` to the endpoint with the credential as bearer token.
    ///
    /// Status mapping:
    /// - 200: body decoded into a [`PermissionSet`]
    /// - 406: [`AuthError::NotProvisioned`]
    /// - 403: [`AuthError::Forbidden`]
    /// - anything else: [`AuthError::UpstreamFailure`]
    pub async fn fetch_permissions(
        &self,
        credential: &str,
        ctx: &EvaluationContext,
    ) -> AuthResult<PermissionSet> {
        let body = AuthzRequest {
            role: ctx.username(),
            rhost: ctx.remote_host().as_str(),
        };

        let resp = self
            .http
            .post(self.endpoint.clone())
            .bearer_auth(credential)
            .header(ACCEPT, "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| AuthError::transport(e.to_string()))?;

        let status = resp.status();
        match status {
            StatusCode::OK => {}
            StatusCode::NOT_ACCEPTABLE => return Err(AuthError::NotProvisioned),
            StatusCode::FORBIDDEN => return Err(AuthError::Forbidden),
            other => return Err(AuthError::UpstreamFailure(other.as_u16())),
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| AuthError::transport(e.to_string()))?;

        let perms = decode_permission_set(&bytes)?;
        tracing::debug!(
            subject = %perms.subject_id,
            roles = ?perms.role_names(),
            "fetched permission set"
        );
        Ok(perms)
    }
}

fn parse_endpoint(raw: &str) -> AuthResult<Url> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(AuthError::config("authorization endpoint is empty"));
    }

    let url = Url::parse(raw)
        .map_err(|e| AuthError::config(format!("invalid authorization endpoint '{raw}': {e}")))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(AuthError::config(format!(
            "unsupported authorization endpoint scheme '{other}'"
        ))),
    }
}
