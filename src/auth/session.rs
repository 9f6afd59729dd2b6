//! Admin sessions.
//!
//! A session is a random token handed out as an HttpOnly cookie. Sessions
//! live in memory only, so a restart logs the admin out.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

/// A logged-in admin.
#[derive(Debug, Clone)]
pub struct AdminSession {
    /// Unique session token (UUID v4).
    pub token: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
    /// Absolute expiry; there is no idle timeout.
    pub expires_at: DateTime<Utc>,
}

impl AdminSession {
    pub fn new(username: impl Into<String>, duration: Duration) -> Self {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::from_std(duration).unwrap_or_default();
        Self {
            token: Uuid::new_v4().to_string(),
            username: username.into(),
            created_at: now,
            expires_at,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Active sessions by token.
#[derive(Debug)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, AdminSession>>,
    duration: Duration,
}

impl SessionStore {
    pub fn new(duration: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            duration,
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Open a session for the given admin.
    pub async fn create(&self, username: &str) -> AdminSession {
        let session = AdminSession::new(username, self.duration);
        self.sessions
            .write()
            .await
            .insert(session.token.clone(), session.clone());
        debug!(username = %username, "Admin session created");
        session
    }

    /// Look up a live session. Expired sessions are dropped on access.
    pub async fn validate(&self, token: &str) -> Option<AdminSession> {
        let session = self.sessions.read().await.get(token).cloned()?;
        if session.is_expired() {
            self.sessions.write().await.remove(token);
            debug!(username = %session.username, "Admin session expired");
            return None;
        }
        Some(session)
    }

    /// End a session. Returns `false` if the token was unknown.
    pub async fn remove(&self, token: &str) -> bool {
        self.sessions.write().await.remove(token).is_some()
    }

    /// Drop every expired session. Returns how many were removed.
    pub async fn purge_expired(&self) -> usize {
        self.purge_expired_at(Utc::now()).await
    }

    async fn purge_expired_at(&self, now: DateTime<Utc>) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired_at(now));
        before - sessions.len()
    }

    pub async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }
}
