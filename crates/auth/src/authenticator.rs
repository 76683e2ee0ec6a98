//! Authenticator dispatch: classify the credential, run the matching strategy,
//! return one decision.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use jitgate_core::{AuthError, AuthResult, EvaluationContext};

use crate::classify::{AuthenticatorStrategy, classify};
use crate::client::AuthorizationClient;
use crate::evaluate::evaluate;

/// Native account store check for plain passwords.
#[async_trait]
pub trait LocalVerifier: Send + Sync {
    async fn verify(&self, username: &str, password: &str) -> AuthResult<()>;
}

/// Decision engine entry point.
///
/// Holds configuration only; each call to [`Authenticator::authenticate`]
/// classifies, fetches and evaluates from scratch.
#[derive(Clone)]
pub struct Authenticator {
    api: Option<AuthorizationClient>,
    local: Arc<dyn LocalVerifier>,
}

impl Authenticator {
    /// `api` may be `None`, in which case only password logins can succeed.
    pub fn new(api: Option<AuthorizationClient>, local: Arc<dyn LocalVerifier>) -> Self {
        Self { api, local }
    }

    pub fn api(&self) -> Option<&AuthorizationClient> {
        self.api.as_ref()
    }

    /// Authenticate `ctx.username()` with `credential`.
    pub async fn authenticate(&self, ctx: &EvaluationContext, credential: &str) -> AuthResult<()> {
        let kind = classify(credential);
        tracing::debug!(user = %ctx.username(), method = %kind, "discovered authenticator");

        match kind.strategy() {
            AuthenticatorStrategy::Password => self.local.verify(ctx.username(), credential).await,
            AuthenticatorStrategy::DelegatedToken => {
                let api = self.api.as_ref().ok_or_else(|| {
                    AuthError::config(format!(
                        "{kind} credential presented but no apiUrl configured"
                    ))
                })?;
                let perms = api.fetch_permissions(credential, ctx).await?;
                evaluate(&perms, ctx.username(), ctx)
            }
        }
    }

    /// Like [`Authenticator::authenticate`], but gives up as soon as `abort`
    /// completes. The in-flight request is dropped and the attempt is reported as
    /// a transport failure.
    pub async fn authenticate_or_abort<F>(
        &self,
        ctx: &EvaluationContext,
        credential: &str,
        abort: F,
    ) -> AuthResult<()>
    where
        F: Future<Output = ()>,
    {
        tokio::select! {
            biased;
            _ = abort => {
                tracing::info!(user = %ctx.username(), "login attempt aborted");
                Err(AuthError::transport("login attempt aborted"))
            }
            result = self.authenticate(ctx, credential) => result,
        }
    }
}

impl core::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Authenticator")
            .field("api", &self.api.as_ref().map(|a| a.endpoint()))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingVerifier {
        calls: Mutex<Vec<(String, String)>>,
        reject: bool,
    }

    #[async_trait]
    impl LocalVerifier for RecordingVerifier {
        async fn verify(&self, username: &str, password: &str) -> AuthResult<()> {
            self.calls
                .lock()
                .unwrap()
                .push((username.to_string(), password.to_string()));
            if self.reject {
                Err(AuthError::invalid_credentials("password authentication failed"))
            } else {
                Ok(())
            }
        }
    }

    fn ctx(user: &str) -> EvaluationContext {
        EvaluationContext::now(user, "127.0.0.1")
    }

    #[tokio::test]
    async fn password_goes_to_local_verifier() {
        let local = Arc::new(RecordingVerifier::default());
        let auth = Authenticator::new(None, local.clone());

        assert_eq!(auth.authenticate(&ctx("postgres"), "hunter2").await, Ok(()));
        assert_eq!(
            *local.calls.lock().unwrap(),
            vec![("postgres".to_string(), "hunter2".to_string())]
        );
    }

    #[tokio::test]
    async fn local_rejection_is_returned_unchanged() {
        let local = Arc::new(RecordingVerifier {
            reject: true,
            ..Default::default()
        });
        let auth = Authenticator::new(None, local);

        assert_eq!(
            auth.authenticate(&ctx("postgres"), "wrong").await,
            Err(AuthError::invalid_credentials("password authentication failed"))
        );
    }

    #[tokio::test]
    async fn token_without_endpoint_is_config_error() {
        let local = Arc::new(RecordingVerifier::default());
        let auth = Authenticator::new(None, local.clone());

        let result = auth.authenticate(&ctx("postgres"), "sbp_abc123").await;
        assert!(matches!(result, Err(AuthError::Config(_))));
        assert!(local.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn abort_surfaces_as_transport_failure() {
        let auth = Authenticator::new(None, Arc::new(RecordingVerifier::default()));

        let result = auth
            .authenticate_or_abort(&ctx("postgres"), "hunter2", std::future::ready(()))
            .await;
        assert_eq!(result, Err(AuthError::transport("login attempt aborted")));
    }

    #[tokio::test]
    async fn pending_abort_lets_decision_through() {
        let auth = Authenticator::new(None, Arc::new(RecordingVerifier::default()));

        let result = auth
            .authenticate_or_abort(&ctx("postgres"), "hunter2", std::future::pending())
            .await;
        assert_eq!(result, Ok(()));
    }
}
