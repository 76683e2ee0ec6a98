//! Login event handling for the PAM `authenticate` hook.

use std::sync::Arc;

use jitgate_auth::{Authenticator, AuthorizationClient, LocalVerifier};
use jitgate_core::{AuthResult, EvaluationContext, RemoteHost};

use crate::config::ModuleConfig;
use crate::local::PostgresPasswordVerifier;

/// What the PAM stack hands us for one authentication event.
#[derive(Clone, PartialEq, Eq)]
pub struct LoginEvent {
    /// `PAM_USER`: database role the client wants to log in as.
    pub user: String,
    /// `PAM_AUTHTOK`: password, PAT or JWT.
    pub credential: String,
    /// `PAM_RHOST`.
    pub remote_host: String,
}

impl LoginEvent {
    pub fn new(
        user: impl Into<String>,
        credential: impl Into<String>,
        remote_host: impl Into<String>,
    ) -> Self {
        Self {
            user: user.into(),
            credential: credential.into(),
            remote_host: remote_host.into(),
        }
    }
}

impl core::fmt::Debug for LoginEvent {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LoginEvent")
            .field("user", &self.user)
            .field("credential", &"<redacted>")
            .field("remote_host", &self.remote_host)
            .finish()
    }
}

/// Subset of PAM return codes this module produces.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PamStatus {
    Success,
    AuthErr,
    ServiceErr,
    UserUnknown,
    /// The module has no opinion; the stack decides from its other modules.
    Ignore,
}

impl PamStatus {
    /// Linux-PAM numeric value.
    pub fn code(self) -> i32 {
        match self {
            PamStatus::Success => 0,
            PamStatus::ServiceErr => 3,
            PamStatus::AuthErr => 7,
            PamStatus::UserUnknown => 10,
            PamStatus::Ignore => 25,
        }
    }
}

/// A configured module instance.
#[derive(Debug, Clone)]
pub struct PamModule {
    config: ModuleConfig,
    authenticator: Authenticator,
}

impl PamModule {
    /// Build a module from PAM arguments, verifying passwords against the local
    /// PostgreSQL server.
    pub fn from_args<I, S>(args: I) -> AuthResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let config = ModuleConfig::from_args(args)?;
        Self::with_local_verifier(config, Arc::new(PostgresPasswordVerifier::default()))
    }

    pub fn with_local_verifier(
        config: ModuleConfig,
        local: Arc<dyn LocalVerifier>,
    ) -> AuthResult<Self> {
        let api = match &config.api_url {
            Some(url) => Some(AuthorizationClient::new(url.clone())?),
            None => {
                tracing::warn!("no apiUrl set, only password auth will work");
                None
            }
        };

        Ok(Self {
            authenticator: Authenticator::new(api, local),
            config,
        })
    }

    pub fn config(&self) -> &ModuleConfig {
        &self.config
    }

    /// Decide one login event.
    pub async fn handle(&self, event: &LoginEvent) -> PamStatus {
        let rhost = RemoteHost::new(event.remote_host.clone());
        tracing::info!(rhost = %rhost, "connection");

        if self.config.trust_local && rhost.is_loopback() {
            tracing::info!(user = %event.user, rhost = %rhost, "local connection trusted");
            return PamStatus::Success;
        }

        if event.user.is_empty() {
            tracing::warn!(rhost = %rhost, "empty user");
            return PamStatus::UserUnknown;
        }

        let ctx = EvaluationContext::now(event.user.clone(), rhost);

        match self.authenticator.authenticate(&ctx, &event.credential).await {
            Ok(()) => {
                tracing::info!(user = %event.user, "authenticated");
                PamStatus::Success
            }
            Err(e) if e.is_service_error() => {
                tracing::error!(
                    user = %event.user,
                    error_code = e.code(),
                    error = %e,
                    "module misconfigured"
                );
                PamStatus::ServiceErr
            }
            Err(e) => {
                tracing::warn!(
                    user = %event.user,
                    error_code = e.code(),
                    error = %e,
                    "failed to authenticate"
                );
                PamStatus::AuthErr
            }
        }
    }

    /// Blocking variant of [`PamModule::handle`] for the synchronous PAM hook.
    ///
    /// Each call runs on its own current-thread runtime; nothing is shared
    /// between login events.
    pub fn handle_blocking(&self, event: &LoginEvent) -> PamStatus {
        let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
            Ok(rt) => rt,
            Err(e) => {
                tracing::error!(error = %e, "failed to start runtime");
                return PamStatus::ServiceErr;
            }
        };
        runtime.block_on(self.handle(event))
    }

    /// `pam_sm_acct_mgmt`: account validity (role, expiry, origin) was already
    /// decided during authentication, moments earlier, so there is nothing left
    /// to check.
    pub fn acct_mgmt(&self, user: &str) -> PamStatus {
        tracing::debug!(user = %user, "account management");
        PamStatus::Success
    }

    /// `pam_sm_setcred`: no credentials are established beyond the login itself.
    pub fn setcred(&self) -> PamStatus {
        PamStatus::Ignore
    }

    /// `pam_sm_open_session`: sessions are not managed by this module.
    pub fn open_session(&self) -> PamStatus {
        PamStatus::Ignore
    }

    /// `pam_sm_close_session`.
    pub fn close_session(&self) -> PamStatus {
        PamStatus::Ignore
    }
}

/// One-shot entry point: parse arguments, decide the event.
pub fn authenticate<I, S>(args: I, event: &LoginEvent) -> PamStatus
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    jitgate_observability::init();

    match PamModule::from_args(args) {
        Ok(module) => module.handle_blocking(event),
        Err(e) => {
            tracing::error!(error = %e, "failed to parse config");
            PamStatus::ServiceErr
        }
    }
}
