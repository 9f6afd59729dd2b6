//! Router configuration.

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, post, put},
    Json, Router,
};
use tower::ServiceBuilder;
use tower_http::{services::ServeDir, trace::TraceLayer};
use utoipa::OpenApi;

use super::handlers::{self, AppState};
use super::middleware::{create_cors_layer, login_rate_limit, require_admin, security_headers};
use super::openapi::ApiDoc;

/// Slack on top of the image limit for multipart framing, so a file just
/// over the limit gets the size message rather than a body-limit rejection.
const MULTIPART_OVERHEAD: usize = 1024 * 1024;

/// Create the main router: API, uploaded files, health and OpenAPI.
pub fn create_router(state: Arc<AppState>, cors_origins: &[String]) -> Router {
    let max_upload = usize::try_from(state.uploads().max_size()).unwrap_or(usize::MAX);
    let uploads_dir = state.uploads().uploads_dir().to_path_buf();

    let auth_routes = Router::new()
        .route(
            "/login",
            post(handlers::login).route_layer(middleware::from_fn_with_state(
                state.clone(),
                login_rate_limit,
            )),
        )
        .route("/logout", post(handlers::logout))
        .route("/session", get(handlers::session_status));

    let public_routes = Router::new()
        .route("/ctfs", get(handlers::list_ctfs))
        .route("/ctfs/:slug", get(handlers::get_ctf))
        .route("/challenges", get(handlers::list_challenges))
        .route("/challenges/:id", get(handlers::get_challenge))
        .route("/members", get(handlers::list_members));

    let body_limit = DefaultBodyLimit::max(max_upload.saturating_add(MULTIPART_OVERHEAD));

    let upload_routes = Router::new()
        .route("/temp", post(handlers::stage_upload))
        .route("/finalize", post(handlers::finalize_upload))
        .route("/delete", delete(handlers::delete_upload))
        .route(
            "/temp/cleanup",
            post(handlers::cleanup_temp_uploads).delete(handlers::delete_temp_upload),
        )
        .layer(body_limit);

    let admin_routes = Router::new()
        .route(
            "/ctfs",
            get(handlers::admin_list_ctfs).post(handlers::create_ctf),
        )
        .route(
            "/ctfs/:id",
            put(handlers::update_ctf).delete(handlers::delete_ctf),
        )
        .route(
            "/challenges",
            get(handlers::admin_list_challenges).post(handlers::create_challenge),
        )
        .route(
            "/challenges/:id",
            put(handlers::update_challenge).delete(handlers::delete_challenge),
        )
        .route(
            "/members",
            get(handlers::admin_list_members).post(handlers::create_member),
        )
        .route(
            "/members/:id",
            put(handlers::update_member).delete(handlers::delete_member),
        );

    let gated_routes = Router::new()
        .nest("/admin", admin_routes)
        .nest("/upload", upload_routes)
        .route(
            "/upload",
            post(handlers::direct_upload).layer(body_limit),
        )
        .route("/cleanup", post(handlers::cleanup_orphans))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    let api_routes = Router::new()
        .nest("/auth", auth_routes)
        .merge(public_routes)
        .merge(gated_routes)
        .route("/openapi.json", get(openapi_json));

    Router::new()
        .nest("/api", api_routes)
        .nest_service("/uploads", ServeDir::new(uploads_dir))
        .route("/health", get(handlers::health_check))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(cors_origins))
                .layer(middleware::from_fn(security_headers)),
        )
        .with_state(state)
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
