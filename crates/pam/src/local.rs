//! Password logins against the local PostgreSQL server.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::Connection;
use sqlx::postgres::{PgConnectOptions, PgConnection, PgSslMode};

use jitgate_auth::LocalVerifier;
use jitgate_core::{AuthError, AuthResult};

/// SQLSTATE `invalid_catalog_name`: raised only after the server has accepted
/// the credentials, so it doubles as "password is correct".
const INVALID_CATALOG_NAME: &str = "3D000";

/// Verifies a username/password pair by logging into the local server.
///
/// The connection targets a database that must not exist; the server checks the
/// password first and then fails on the missing database, which tells us the
/// credentials are good without ever opening a session.
#[derive(Debug, Clone)]
pub struct PostgresPasswordVerifier {
    host: String,
    port: u16,
    sentinel_database: String,
    timeout: Duration,
}

impl Default for PostgresPasswordVerifier {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5432,
            sentinel_database: "authdbsupabase".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

impl PostgresPasswordVerifier {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Self::default()
        }
    }

    pub fn with_sentinel_database(mut self, name: impl Into<String>) -> Self {
        self.sentinel_database = name.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn connect_options(&self, username: &str, password: &str) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(username)
            .password(password)
            .database(&self.sentinel_database)
            .ssl_mode(PgSslMode::Disable)
    }
}

#[async_trait]
impl LocalVerifier for PostgresPasswordVerifier {
    async fn verify(&self, username: &str, password: &str) -> AuthResult<()> {
        let options = self.connect_options(username, password);

        let attempt = tokio::time::timeout(self.timeout, PgConnection::connect_with(&options))
            .await
            .map_err(|_| AuthError::transport("local database did not answer in time"))?;

        match attempt {
            Ok(conn) => {
                tracing::warn!(
                    database = %self.sentinel_database,
                    "sentinel database exists; password accepted anyway"
                );
                if let Err(e) = conn.close().await {
                    tracing::debug!(error = %e, "failed to close verification connection");
                }
                Ok(())
            }
            Err(sqlx::Error::Database(db))
                if db.code().as_deref() == Some(INVALID_CATALOG_NAME) =>
            {
                Ok(())
            }
            Err(sqlx::Error::Database(db)) => Err(AuthError::invalid_credentials(db.message())),
            Err(e) => Err(AuthError::transport(format!("local database: {e}"))),
        }
    }
}
