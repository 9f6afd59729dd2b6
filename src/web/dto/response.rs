//! Response DTOs.

use serde::Serialize;
use utoipa::ToSchema;

use crate::content::{Challenge, Ctf};
use crate::upload::StoredUpload;

/// `{ success: true, data }` wrapper for content endpoints.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Result of a stage, direct upload or finalize.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub success: bool,
    pub url: String,
    pub filename: String,
    /// On-disk path, returned by the stage endpoint only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temp_path: Option<String>,
}

impl UploadResponse {
    pub fn staged(stored: StoredUpload) -> Self {
        Self {
            success: true,
            temp_path: Some(stored.path.to_string_lossy().into_owned()),
            url: stored.url,
            filename: stored.filename,
        }
    }

    pub fn permanent(stored: StoredUpload) -> Self {
        Self {
            success: true,
            url: stored.url,
            filename: stored.filename,
            temp_path: None,
        }
    }
}

/// `{ success, message }` for delete and cleanup operations.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
    /// Number of files or records removed, for bulk cleanups.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_count: Option<usize>,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            deleted_count: None,
        }
    }

    pub fn with_count(message: impl Into<String>, deleted_count: usize) -> Self {
        Self {
            success: true,
            message: message.into(),
            deleted_count: Some(deleted_count),
        }
    }
}

/// A CTF together with its challenges.
#[derive(Debug, Serialize, ToSchema)]
pub struct CtfDetail {
    pub ctf: Ctf,
    pub challenges: Vec<Challenge>,
}

/// Session status.
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionStatus {
    pub authenticated: bool,
}

/// Health check payload.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
}
