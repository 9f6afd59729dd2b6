//! Admin session cookie handling.

use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

use crate::auth::AdminSession;
use crate::config::AdminConfig;
use crate::web::error::ApiError;
use crate::web::handlers::AppState;

/// Session cookie settings.
#[derive(Debug, Clone)]
pub struct CookieSettings {
    pub name: String,
    pub secure: bool,
    pub max_age_secs: u64,
}

impl CookieSettings {
    pub fn from_config(config: &AdminConfig) -> Self {
        Self {
            name: config.cookie_name.clone(),
            secure: config.secure_cookie,
            max_age_secs: config.session_duration_secs,
        }
    }

    /// The cookie carrying a freshly issued session token.
    pub fn session_cookie(&self, token: &str) -> Cookie<'static> {
        let max_age = i64::try_from(self.max_age_secs).unwrap_or(i64::MAX);
        let mut cookie = Cookie::build((self.name.clone(), token.to_string()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .max_age(Duration::seconds(max_age))
            .build();
        if self.secure {
            cookie.set_secure(true);
        }
        cookie
    }

    /// An expired cookie that clears the session in the browser.
    pub fn clear_cookie(&self) -> Cookie<'static> {
        Cookie::build((self.name.clone(), String::new()))
            .path("/")
            .http_only(true)
            .max_age(Duration::seconds(0))
            .build()
    }
}

/// Look up the live session referenced by the request's cookie.
pub async fn current_session(state: &AppState, jar: &CookieJar) -> Option<AdminSession> {
    let token = jar.get(&state.cookie.name)?.value().to_string();
    if token.is_empty() {
        return None;
    }
    state.auth.authenticate(&token).await
}

/// Extractor for an authenticated admin.
#[derive(Debug, Clone)]
pub struct AdminUser(pub AdminSession);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        if let Some(session) = parts.extensions.get::<AdminSession>() {
            return Ok(AdminUser(session.clone()));
        }

        let jar = CookieJar::from_headers(&parts.headers);
        current_session(state, &jar)
            .await
            .map(AdminUser)
            .ok_or_else(|| ApiError::unauthorized("Unauthorized"))
    }
}

/// Gate a route group behind a live admin session.
///
/// The session is stored in the request extensions for [`AdminUser`].
pub async fn require_admin(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let session = current_session(&state, &jar).await.ok_or_else(|| {
        tracing::debug!(path = %req.uri().path(), "Rejected request without admin session");
        ApiError::unauthorized("Unauthorized")
    })?;

    req.extensions_mut().insert(session);
    Ok(next.run(req).await)
}
