//! Image upload handlers.
//!
//! Uploads are staged under `/uploads/temp/` and promoted by finalize.
//! The direct endpoint writes straight to permanent storage.

use std::sync::Arc;

use axum::{
    extract::{Multipart, Query, State},
    Json,
};

use crate::upload::{FinalizeRequest, ImageUpload};
use crate::web::dto::{FilenameQuery, FinalizeBody, JsonBody, MessageResponse, UploadResponse};
use crate::web::error::ApiError;

use super::AppState;

/// Read the `file` field of a multipart form.
async fn read_image(mut multipart: Multipart, max_size: u64) -> Result<ImageUpload, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::from_multipart(e, max_size))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let original_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::from_multipart(e, max_size))?
            .to_vec();

        return Ok(ImageUpload {
            original_name,
            content_type,
            data,
        });
    }

    Err(ApiError::bad_request("No file uploaded"))
}

fn require_filename(query: &FilenameQuery) -> Result<&str, ApiError> {
    query
        .filename()
        .ok_or_else(|| ApiError::bad_request("No filename provided"))
}

/// POST /api/upload/temp - Stage an image.
///
/// Request body: multipart/form-data with the image in the `file` field.
#[utoipa::path(
    post,
    path = "/api/upload/temp",
    tag = "upload",
    responses(
        (status = 200, description = "Image staged", body = UploadResponse),
        (status = 400, description = "Missing file, not an image, or too large"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn stage_upload(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let store = state.uploads();
    let upload = read_image(multipart, store.max_size()).await?;

    let stored = store
        .stage(&upload)
        .await
        .map_err(|e| ApiError::with_context(e, "Failed to upload file"))?;

    Ok(Json(UploadResponse::staged(stored)))
}

/// POST /api/upload - Store an image permanently without staging.
///
/// Request body: multipart/form-data with the image in the `file` field.
#[utoipa::path(
    post,
    path = "/api/upload",
    tag = "upload",
    responses(
        (status = 200, description = "Image stored", body = UploadResponse),
        (status = 400, description = "Missing file, not an image, or too large"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn direct_upload(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let store = state.uploads();
    let upload = read_image(multipart, store.max_size()).await?;

    let stored = store
        .store_direct(&upload)
        .await
        .map_err(|e| ApiError::with_context(e, "Failed to upload file"))?;

    Ok(Json(UploadResponse::permanent(stored)))
}

/// POST /api/upload/finalize - Promote a staged image.
#[utoipa::path(
    post,
    path = "/api/upload/finalize",
    tag = "upload",
    request_body = FinalizeBody,
    responses(
        (status = 200, description = "Image finalized", body = UploadResponse),
        (status = 400, description = "Missing or unsafe filename"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Temporary file not found")
    )
)]
pub async fn finalize_upload(
    State(state): State<Arc<AppState>>,
    JsonBody(body): JsonBody<FinalizeBody>,
) -> Result<Json<UploadResponse>, ApiError> {
    let request = FinalizeRequest::from(body);

    let stored = state
        .uploads()
        .finalize(&request)
        .await
        .map_err(|e| ApiError::with_context(e, "Failed to finalize upload"))?;

    Ok(Json(UploadResponse::permanent(stored)))
}

/// DELETE /api/upload/delete?filename= - Delete a permanent image.
#[utoipa::path(
    delete,
    path = "/api/upload/delete",
    tag = "upload",
    params(FilenameQuery),
    responses(
        (status = 200, description = "File deleted", body = MessageResponse),
        (status = 400, description = "No filename provided"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "File not found")
    )
)]
pub async fn delete_upload(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FilenameQuery>,
) -> Result<Json<MessageResponse>, ApiError> {
    let filename = require_filename(&query)?;

    state
        .uploads()
        .delete_permanent(filename)
        .await
        .map_err(|e| ApiError::with_context(e, "Failed to delete file"))?;

    Ok(Json(MessageResponse::new("File deleted successfully")))
}

async fn discard_staged(state: &AppState, filename: &str) -> Result<MessageResponse, ApiError> {
    state
        .uploads()
        .discard_staged(filename)
        .await
        .map_err(|e| ApiError::with_context(e, "Failed to delete temporary file"))?;

    Ok(MessageResponse::new("Temporary file deleted successfully"))
}

/// DELETE /api/upload/temp/cleanup?filename= - Discard one staged image.
#[utoipa::path(
    delete,
    path = "/api/upload/temp/cleanup",
    tag = "upload",
    params(FilenameQuery),
    responses(
        (status = 200, description = "Staged file deleted", body = MessageResponse),
        (status = 400, description = "No filename provided"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Temporary file not found")
    )
)]
pub async fn delete_temp_upload(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FilenameQuery>,
) -> Result<Json<MessageResponse>, ApiError> {
    let filename = require_filename(&query)?;
    Ok(Json(discard_staged(&state, filename).await?))
}

/// POST /api/upload/temp/cleanup[?filename=] - Discard one staged image, or
/// sweep every staged image past the retention window.
#[utoipa::path(
    post,
    path = "/api/upload/temp/cleanup",
    tag = "upload",
    params(FilenameQuery),
    responses(
        (status = 200, description = "Staged file deleted or sweep finished", body = MessageResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Temporary file not found")
    )
)]
pub async fn cleanup_temp_uploads(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FilenameQuery>,
) -> Result<Json<MessageResponse>, ApiError> {
    if let Some(filename) = query.filename() {
        return Ok(Json(discard_staged(&state, filename).await?));
    }

    if !state.uploads().has_staging_dir().await {
        return Ok(Json(MessageResponse::with_count(
            "No temp directory to clean",
            0,
        )));
    }

    let deleted_count = state
        .uploads()
        .sweep()
        .await
        .map_err(|e| ApiError::with_context(e, "Failed to clean up temporary files"))?;

    Ok(Json(MessageResponse::with_count(
        format!("Cleaned up {} old temporary files", deleted_count),
        deleted_count,
    )))
}
