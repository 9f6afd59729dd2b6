//! Admin login, logout and session status.

use std::sync::Arc;

use axum::{extract::State, Json};
use axum_extra::extract::cookie::CookieJar;

use crate::web::dto::{ApiResponse, JsonBody, LoginRequest, MessageResponse, SessionStatus};
use crate::web::error::ApiError;
use crate::web::middleware::current_session;

use super::AppState;

/// POST /api/auth/login - Admin login.
///
/// Sets the session cookie on success.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in; session cookie set", body = MessageResponse),
        (status = 400, description = "Missing credentials"),
        (status = 401, description = "Invalid username or password"),
        (status = 429, description = "Too many login attempts")
    )
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    JsonBody(req): JsonBody<LoginRequest>,
) -> Result<(CookieJar, Json<MessageResponse>), ApiError> {
    if req.username.is_empty() || req.password.is_empty() {
        return Err(ApiError::bad_request("Username and password are required"));
    }

    let session = state.auth.login(&req.username, &req.password).await?;
    let jar = jar.add(state.cookie.session_cookie(&session.token));

    Ok((jar, Json(MessageResponse::new("Logged in successfully"))))
}

/// POST /api/auth/logout - End the admin session.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "auth",
    responses((status = 200, description = "Logged out; cookie cleared", body = MessageResponse))
)]
pub async fn logout(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> (CookieJar, Json<MessageResponse>) {
    if let Some(cookie) = jar.get(&state.cookie.name) {
        state.auth.logout(cookie.value()).await;
    }
    let jar = jar.add(state.cookie.clear_cookie());

    (jar, Json(MessageResponse::new("Logged out successfully")))
}

/// GET /api/auth/session - Whether the caller holds a live admin session.
#[utoipa::path(
    get,
    path = "/api/auth/session",
    tag = "auth",
    responses((status = 200, description = "Session status, wrapped in `data`", body = SessionStatus))
)]
pub async fn session_status(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Json<ApiResponse<SessionStatus>> {
    let authenticated = current_session(&state, &jar).await.is_some();
    Json(ApiResponse::new(SessionStatus { authenticated }))
}
