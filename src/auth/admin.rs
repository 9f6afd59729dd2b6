//! Admin login against the configured credentials.

use std::time::Duration;

use tracing::{info, warn};

use super::password::verify_password;
use super::session::{AdminSession, SessionStore};
use crate::config::AdminConfig;
use crate::{Result, SiteError};

/// The single admin account plus its sessions.
#[derive(Debug)]
pub struct AdminAuth {
    username: String,
    password_hash: String,
    sessions: SessionStore,
}

impl AdminAuth {
    pub fn new(config: &AdminConfig) -> Self {
        Self {
            username: config.username.clone(),
            password_hash: config.password_hash.clone(),
            sessions: SessionStore::new(Duration::from_secs(config.session_duration_secs)),
        }
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Check credentials and open a session.
    ///
    /// Without a configured hash every login fails.
    pub async fn login(&self, username: &str, password: &str) -> Result<AdminSession> {
        if self.password_hash.is_empty() {
            warn!("Login rejected: no admin password hash configured");
            return Err(invalid_credentials());
        }

        let password = password.to_string();
        let hash = self.password_hash.clone();
        let verified = tokio::task::spawn_blocking(move || verify_password(&password, &hash))
            .await
            .map_err(|e| SiteError::Auth(format!("password verification task failed: {e}")))?;

        // Compare the username after hashing so both failures cost the same.
        if username != self.username || verified.is_err() {
            warn!(username = %username, "Login failed: invalid credentials");
            return Err(invalid_credentials());
        }

        let session = self.sessions.create(username).await;
        info!(username = %username, "Admin logged in");
        Ok(session)
    }

    /// End a session, if it exists.
    pub async fn logout(&self, token: &str) {
        if self.sessions.remove(token).await {
            info!("Admin logged out");
        }
    }

    pub async fn authenticate(&self, token: &str) -> Option<AdminSession> {
        self.sessions.validate(token).await
    }
}

fn invalid_credentials() -> SiteError {
    SiteError::Auth("Invalid username or password".to_string())
}
