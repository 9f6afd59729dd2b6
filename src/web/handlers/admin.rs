//! Admin content management handlers.
//!
//! Every route here sits behind the admin session gate. Image fields may
//! carry staged upload URLs; the content service finalizes them before the
//! record is saved.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::content::{Challenge, ChallengeInput, Ctf, CtfInput, TeamMember, TeamMemberInput};
use crate::web::dto::{ApiResponse, ChallengeSearchQuery, MessageResponse, ValidatedJson};
use crate::web::error::ApiError;
use crate::web::middleware::AdminUser;

use super::AppState;

type Created<T> = (StatusCode, Json<ApiResponse<T>>);

fn created<T: serde::Serialize>(data: T) -> Created<T> {
    (StatusCode::CREATED, Json(ApiResponse::new(data)))
}

// ----------------------------------------------------------------------
// CTFs
// ----------------------------------------------------------------------

/// GET /api/admin/ctfs
#[utoipa::path(
    get,
    path = "/api/admin/ctfs",
    tag = "admin",
    responses(
        (status = 200, description = "All CTFs, wrapped in `data`", body = [Ctf]),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn admin_list_ctfs(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<Ctf>>>, ApiError> {
    Ok(Json(ApiResponse::new(state.content.list_ctfs().await?)))
}

/// POST /api/admin/ctfs
#[utoipa::path(
    post,
    path = "/api/admin/ctfs",
    tag = "admin",
    request_body = CtfInput,
    responses(
        (status = 201, description = "CTF created, wrapped in `data`", body = Ctf),
        (status = 400, description = "Validation failed or staged image expired"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Slug already in use")
    )
)]
pub async fn create_ctf(
    State(state): State<Arc<AppState>>,
    AdminUser(session): AdminUser,
    ValidatedJson(input): ValidatedJson<CtfInput>,
) -> Result<Created<Ctf>, ApiError> {
    let ctf = state.content.create_ctf(input).await?;
    tracing::debug!(admin = %session.username, id = %ctf.id, "CTF created via API");
    Ok(created(ctf))
}

/// PUT /api/admin/ctfs/{id}
#[utoipa::path(
    put,
    path = "/api/admin/ctfs/{id}",
    tag = "admin",
    params(("id" = String, Path, description = "CTF ID")),
    request_body = CtfInput,
    responses(
        (status = 200, description = "CTF updated, wrapped in `data`", body = Ctf),
        (status = 400, description = "Validation failed or staged image expired"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "CTF not found"),
        (status = 409, description = "Slug already in use")
    )
)]
pub async fn update_ctf(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ValidatedJson(input): ValidatedJson<CtfInput>,
) -> Result<Json<ApiResponse<Ctf>>, ApiError> {
    let ctf = state.content.update_ctf(&id, input).await?;
    Ok(Json(ApiResponse::new(ctf)))
}

/// DELETE /api/admin/ctfs/{id}
#[utoipa::path(
    delete,
    path = "/api/admin/ctfs/{id}",
    tag = "admin",
    params(("id" = String, Path, description = "CTF ID")),
    responses(
        (status = 200, description = "CTF and its challenges deleted", body = MessageResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "CTF not found")
    )
)]
pub async fn delete_ctf(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.content.delete_ctf(&id).await?;
    Ok(Json(MessageResponse::new("CTF deleted successfully")))
}

// ----------------------------------------------------------------------
// Challenges
// ----------------------------------------------------------------------

/// GET /api/admin/challenges?q=&ctf=&category=
#[utoipa::path(
    get,
    path = "/api/admin/challenges",
    tag = "admin",
    params(ChallengeSearchQuery),
    responses(
        (status = 200, description = "Matching challenges, wrapped in `data`", body = [Challenge]),
        (status = 400, description = "Unknown category"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn admin_list_challenges(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ChallengeSearchQuery>,
) -> Result<Json<ApiResponse<Vec<Challenge>>>, ApiError> {
    let filter = query.to_filter()?;
    let challenges = state.content.list_challenges(&filter).await?;
    Ok(Json(ApiResponse::new(challenges)))
}

/// POST /api/admin/challenges
#[utoipa::path(
    post,
    path = "/api/admin/challenges",
    tag = "admin",
    request_body = ChallengeInput,
    responses(
        (status = 201, description = "Challenge created, wrapped in `data`", body = Challenge),
        (status = 400, description = "Validation failed, unknown CTF, or staged image expired"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn create_challenge(
    State(state): State<Arc<AppState>>,
    ValidatedJson(input): ValidatedJson<ChallengeInput>,
) -> Result<Created<Challenge>, ApiError> {
    let challenge = state.content.create_challenge(input).await?;
    Ok(created(challenge))
}

/// PUT /api/admin/challenges/{id}
#[utoipa::path(
    put,
    path = "/api/admin/challenges/{id}",
    tag = "admin",
    params(("id" = String, Path, description = "Challenge ID")),
    request_body = ChallengeInput,
    responses(
        (status = 200, description = "Challenge updated, wrapped in `data`", body = Challenge),
        (status = 400, description = "Validation failed, unknown CTF, or staged image expired"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Challenge not found")
    )
)]
pub async fn update_challenge(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ValidatedJson(input): ValidatedJson<ChallengeInput>,
) -> Result<Json<ApiResponse<Challenge>>, ApiError> {
    let challenge = state.content.update_challenge(&id, input).await?;
    Ok(Json(ApiResponse::new(challenge)))
}

/// DELETE /api/admin/challenges/{id}
#[utoipa::path(
    delete,
    path = "/api/admin/challenges/{id}",
    tag = "admin",
    params(("id" = String, Path, description = "Challenge ID")),
    responses(
        (status = 200, description = "Challenge deleted", body = MessageResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Challenge not found")
    )
)]
pub async fn delete_challenge(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.content.delete_challenge(&id).await?;
    Ok(Json(MessageResponse::new("Challenge deleted successfully")))
}

/// POST /api/cleanup - Remove challenges whose CTF is gone.
#[utoipa::path(
    post,
    path = "/api/cleanup",
    tag = "admin",
    responses(
        (status = 200, description = "Orphaned challenges removed", body = MessageResponse),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn cleanup_orphans(
    State(state): State<Arc<AppState>>,
) -> Result<Json<MessageResponse>, ApiError> {
    let deleted_count = state
        .content
        .cleanup_orphaned_challenges()
        .await
        .map_err(|e| ApiError::with_context(e, "Failed to cleanup orphaned challenges"))?;

    Ok(Json(MessageResponse::with_count(
        format!("Cleaned up {} orphaned challenges", deleted_count),
        deleted_count,
    )))
}

// ----------------------------------------------------------------------
// Team members
// ----------------------------------------------------------------------

/// GET /api/admin/members
#[utoipa::path(
    get,
    path = "/api/admin/members",
    tag = "admin",
    responses(
        (status = 200, description = "Team members, wrapped in `data`", body = [TeamMember]),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn admin_list_members(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<TeamMember>>>, ApiError> {
    Ok(Json(ApiResponse::new(state.content.list_members().await?)))
}

/// POST /api/admin/members
#[utoipa::path(
    post,
    path = "/api/admin/members",
    tag = "admin",
    request_body = TeamMemberInput,
    responses(
        (status = 201, description = "Member created, wrapped in `data`", body = TeamMember),
        (status = 400, description = "Validation failed or staged image expired"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn create_member(
    State(state): State<Arc<AppState>>,
    ValidatedJson(input): ValidatedJson<TeamMemberInput>,
) -> Result<Created<TeamMember>, ApiError> {
    let member = state.content.create_member(input).await?;
    Ok(created(member))
}

/// PUT /api/admin/members/{id}
#[utoipa::path(
    put,
    path = "/api/admin/members/{id}",
    tag = "admin",
    params(("id" = String, Path, description = "Team member ID")),
    request_body = TeamMemberInput,
    responses(
        (status = 200, description = "Member updated, wrapped in `data`", body = TeamMember),
        (status = 400, description = "Validation failed or staged image expired"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Team member not found")
    )
)]
pub async fn update_member(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ValidatedJson(input): ValidatedJson<TeamMemberInput>,
) -> Result<Json<ApiResponse<TeamMember>>, ApiError> {
    let member = state.content.update_member(&id, input).await?;
    Ok(Json(ApiResponse::new(member)))
}

/// DELETE /api/admin/members/{id}
#[utoipa::path(
    delete,
    path = "/api/admin/members/{id}",
    tag = "admin",
    params(("id" = String, Path, description = "Team member ID")),
    responses(
        (status = 200, description = "Member deleted", body = MessageResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Team member not found")
    )
)]
pub async fn delete_member(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.content.delete_member(&id).await?;
    Ok(Json(MessageResponse::new("Team member deleted successfully")))
}
