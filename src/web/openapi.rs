//! OpenAPI document for the HTTP API.

use utoipa::OpenApi;

use super::dto;
use super::handlers;
use crate::content;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health::health_check,
        handlers::auth::login,
        handlers::auth::logout,
        handlers::auth::session_status,
        handlers::upload::stage_upload,
        handlers::upload::direct_upload,
        handlers::upload::finalize_upload,
        handlers::upload::delete_upload,
        handlers::upload::delete_temp_upload,
        handlers::upload::cleanup_temp_uploads,
        handlers::content::list_ctfs,
        handlers::content::get_ctf,
        handlers::content::list_challenges,
        handlers::content::get_challenge,
        handlers::content::list_members,
        handlers::admin::admin_list_ctfs,
        handlers::admin::create_ctf,
        handlers::admin::update_ctf,
        handlers::admin::delete_ctf,
        handlers::admin::admin_list_challenges,
        handlers::admin::create_challenge,
        handlers::admin::update_challenge,
        handlers::admin::delete_challenge,
        handlers::admin::cleanup_orphans,
        handlers::admin::admin_list_members,
        handlers::admin::create_member,
        handlers::admin::update_member,
        handlers::admin::delete_member,
    ),
    components(
        schemas(
            content::Ctf,
            content::CtfInput,
            content::Category,
            content::Challenge,
            content::ChallengeInput,
            content::Social,
            content::TeamMember,
            content::TeamMemberInput,
            dto::LoginRequest,
            dto::FinalizeBody,
            dto::UploadResponse,
            dto::MessageResponse,
            dto::CtfDetail,
            dto::SessionStatus,
            dto::HealthStatus,
        )
    ),
    tags(
        (name = "upload", description = "Image staging and permanent storage"),
        (name = "content", description = "Public CTF, challenge and member listings"),
        (name = "admin", description = "Content management, admin session required"),
        (name = "auth", description = "Admin session endpoints"),
        (name = "health", description = "Liveness")
    )
)]
pub struct ApiDoc;
