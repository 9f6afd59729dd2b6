//! Public read-only content handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::content::{Challenge, ChallengeFilter, Ctf, TeamMember};
use crate::web::dto::{ApiResponse, ChallengeListQuery, CtfDetail};
use crate::web::error::ApiError;

use super::AppState;

/// GET /api/ctfs - List CTF events.
#[utoipa::path(
    get,
    path = "/api/ctfs",
    tag = "content",
    responses((status = 200, description = "All CTFs, wrapped in `data`", body = [Ctf]))
)]
pub async fn list_ctfs(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<Ctf>>>, ApiError> {
    let ctfs = state.content.list_ctfs().await?;
    Ok(Json(ApiResponse::new(ctfs)))
}

/// GET /api/ctfs/{slug} - A CTF with its challenges.
#[utoipa::path(
    get,
    path = "/api/ctfs/{slug}",
    tag = "content",
    params(("slug" = String, Path, description = "CTF slug")),
    responses(
        (status = 200, description = "CTF and its challenges, wrapped in `data`", body = CtfDetail),
        (status = 404, description = "CTF not found")
    )
)]
pub async fn get_ctf(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Json<ApiResponse<CtfDetail>>, ApiError> {
    let ctf = state.content.get_ctf_by_slug(&slug).await?;
    let challenges = state
        .content
        .list_challenges(&ChallengeFilter::for_ctf(ctf.id.as_str()))
        .await?;

    Ok(Json(ApiResponse::new(CtfDetail { ctf, challenges })))
}

/// GET /api/challenges[?ctf=] - List challenges, optionally for one CTF.
#[utoipa::path(
    get,
    path = "/api/challenges",
    tag = "content",
    params(ChallengeListQuery),
    responses((status = 200, description = "Challenges, wrapped in `data`", body = [Challenge]))
)]
pub async fn list_challenges(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ChallengeListQuery>,
) -> Result<Json<ApiResponse<Vec<Challenge>>>, ApiError> {
    let filter = match query.ctf.filter(|c| !c.is_empty()) {
        Some(ctf_id) => ChallengeFilter::for_ctf(ctf_id),
        None => ChallengeFilter::default(),
    };
    let challenges = state.content.list_challenges(&filter).await?;
    Ok(Json(ApiResponse::new(challenges)))
}

/// GET /api/challenges/{id} - A single challenge write-up.
#[utoipa::path(
    get,
    path = "/api/challenges/{id}",
    tag = "content",
    params(("id" = String, Path, description = "Challenge ID")),
    responses(
        (status = 200, description = "Challenge, wrapped in `data`", body = Challenge),
        (status = 404, description = "Challenge not found")
    )
)]
pub async fn get_challenge(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Challenge>>, ApiError> {
    let challenge = state.content.get_challenge(&id).await?;
    Ok(Json(ApiResponse::new(challenge)))
}

/// GET /api/members - List team members.
#[utoipa::path(
    get,
    path = "/api/members",
    tag = "content",
    responses((status = 200, description = "Team members, wrapped in `data`", body = [TeamMember]))
)]
pub async fn list_members(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<TeamMember>>>, ApiError> {
    let members = state.content.list_members().await?;
    Ok(Json(ApiResponse::new(members)))
}
