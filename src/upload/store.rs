//! Filesystem store for uploaded images.
//!
//! Layout below the public root:
//! ```text
//! {public_root}/uploads/
//! ├── 1700000000000.png          permanent
//! └── temp/
//!     └── temp_1700000000000.png staged
//! ```
//!
//! The filesystem is the only shared state; every operation is a short
//! sequence of async syscalls with no locking.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Utc;
use tokio::fs;

use super::naming::{
    default_final_name, permanent_name, permanent_url, staged_name, staged_timestamp, staged_url,
    validate_filename, TEMP_DIR_NAME,
};
use crate::config::UploadsConfig;
use crate::{Result, SiteError};

/// An image received from a client, not yet written anywhere.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    /// Filename as sent by the client (only its extension is used).
    pub original_name: String,
    /// Declared MIME type.
    pub content_type: String,
    /// File content.
    pub data: Vec<u8>,
}

/// A file written by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredUpload {
    pub filename: String,
    pub url: String,
    pub path: PathBuf,
}

/// Parameters of a finalize operation.
#[derive(Debug, Clone, Default)]
pub struct FinalizeRequest {
    /// Staged filename to promote.
    pub temp_filename: String,
    /// Permanent name; defaults to the staged name without its prefix.
    pub final_filename: Option<String>,
    /// Permanent file to retire before the move.
    pub delete_old_file: Option<String>,
}

impl FinalizeRequest {
    pub fn new(temp_filename: impl Into<String>) -> Self {
        Self {
            temp_filename: temp_filename.into(),
            ..Default::default()
        }
    }

    pub fn final_filename(mut self, name: impl Into<String>) -> Self {
        self.final_filename = Some(name.into());
        self
    }

    pub fn delete_old_file(mut self, name: impl Into<String>) -> Self {
        self.delete_old_file = Some(name.into());
        self
    }
}

/// Upload store rooted at `{public_root}/uploads`.
#[derive(Debug, Clone)]
pub struct UploadStore {
    uploads_dir: PathBuf,
    temp_dir: PathBuf,
    max_size: u64,
    temp_max_age: Duration,
}

impl UploadStore {
    /// Create a store for the given uploads directory.
    ///
    /// Directories are created lazily on first write.
    pub fn new(uploads_dir: impl Into<PathBuf>, max_size: u64, temp_max_age: Duration) -> Self {
        let uploads_dir = uploads_dir.into();
        let temp_dir = uploads_dir.join(TEMP_DIR_NAME);
        Self {
            uploads_dir,
            temp_dir,
            max_size,
            temp_max_age,
        }
    }

    pub fn from_config(config: &UploadsConfig) -> Self {
        Self::new(
            config.uploads_dir(),
            config.max_upload_bytes(),
            Duration::from_secs(config.temp_max_age_secs),
        )
    }

    pub fn uploads_dir(&self) -> &Path {
        &self.uploads_dir
    }

    pub fn temp_dir(&self) -> &Path {
        &self.temp_dir
    }

    pub fn max_size(&self) -> u64 {
        self.max_size
    }

    /// Check the declared type and size of an upload before touching disk.
    pub fn check_upload(&self, content_type: &str, size: u64) -> Result<()> {
        if !content_type.starts_with("image/") {
            return Err(SiteError::Validation(
                "Only image files are allowed".to_string(),
            ));
        }
        if size > self.max_size {
            return Err(SiteError::Validation(format!(
                "File size too large (max {}MB)",
                self.max_size / (1024 * 1024)
            )));
        }
        Ok(())
    }

    /// Write an image into the staging directory as `temp_<millis>.<ext>`.
    pub async fn stage(&self, upload: &ImageUpload) -> Result<StoredUpload> {
        self.check_upload(&upload.content_type, upload.data.len() as u64)?;

        let filename = staged_name(Utc::now().timestamp_millis(), &upload.original_name);
        fs::create_dir_all(&self.temp_dir).await?;
        let path = self.temp_dir.join(&filename);
        fs::write(&path, &upload.data).await?;

        tracing::info!(filename = %filename, size = upload.data.len(), "Staged upload");
        Ok(StoredUpload {
            url: staged_url(&filename),
            filename,
            path,
        })
    }

    /// Write an image straight into the permanent directory.
    pub async fn store_direct(&self, upload: &ImageUpload) -> Result<StoredUpload> {
        self.check_upload(&upload.content_type, upload.data.len() as u64)?;

        let filename = permanent_name(Utc::now().timestamp_millis(), &upload.original_name);
        fs::create_dir_all(&self.uploads_dir).await?;
        let path = self.uploads_dir.join(&filename);
        fs::write(&path, &upload.data).await?;

        tracing::info!(filename = %filename, size = upload.data.len(), "Stored upload");
        Ok(StoredUpload {
            url: permanent_url(&filename),
            filename,
            path,
        })
    }

    /// Promote a staged file into the permanent directory.
    ///
    /// The old file, when given and different from the final name, is removed
    /// before the move. Its removal is best-effort.
    pub async fn finalize(&self, request: &FinalizeRequest) -> Result<StoredUpload> {
        let temp_filename = request.temp_filename.as_str();
        if temp_filename.is_empty() {
            return Err(SiteError::Validation(
                "No temp filename provided".to_string(),
            ));
        }
        validate_filename(temp_filename)?;

        let final_filename = match request.final_filename.as_deref() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => default_final_name(temp_filename),
        };
        validate_filename(&final_filename)?;

        let old_file = request
            .delete_old_file
            .as_deref()
            .filter(|name| !name.is_empty());
        if let Some(old) = old_file {
            validate_filename(old)?;
        }

        let temp_path = self.temp_dir.join(temp_filename);
        if !is_file(&temp_path).await {
            return Err(SiteError::NotFound("Temporary file".to_string()));
        }

        if let Some(old) = old_file.filter(|old| *old != final_filename) {
            match remove_file_if_present(&self.uploads_dir.join(old)).await {
                Ok(true) => tracing::info!(filename = %old, "Deleted replaced upload"),
                Ok(false) => {}
                Err(e) => tracing::warn!(filename = %old, "Failed to delete replaced upload: {e}"),
            }
        }

        fs::create_dir_all(&self.uploads_dir).await?;
        let final_path = self.uploads_dir.join(&final_filename);
        fs::rename(&temp_path, &final_path).await?;

        tracing::info!(
            temp_filename = %temp_filename,
            filename = %final_filename,
            "Finalized upload"
        );
        Ok(StoredUpload {
            url: permanent_url(&final_filename),
            filename: final_filename,
            path: final_path,
        })
    }

    /// Delete one staged file.
    pub async fn discard_staged(&self, filename: &str) -> Result<()> {
        validate_filename(filename)?;
        if remove_file_if_present(&self.temp_dir.join(filename)).await? {
            tracing::info!(filename = %filename, "Discarded staged upload");
            Ok(())
        } else {
            Err(SiteError::NotFound("Temporary file".to_string()))
        }
    }

    /// Delete one permanent file.
    pub async fn delete_permanent(&self, filename: &str) -> Result<()> {
        validate_filename(filename)?;
        if remove_file_if_present(&self.uploads_dir.join(filename)).await? {
            tracing::info!(filename = %filename, "Deleted upload");
            Ok(())
        } else {
            Err(SiteError::NotFound("File".to_string()))
        }
    }

    /// Whether a staged file exists.
    pub async fn staged_exists(&self, filename: &str) -> bool {
        validate_filename(filename).is_ok() && is_file(&self.temp_dir.join(filename)).await
    }

    /// Whether a permanent file exists.
    pub async fn permanent_exists(&self, filename: &str) -> bool {
        validate_filename(filename).is_ok() && is_file(&self.uploads_dir.join(filename)).await
    }

    /// Whether the staging directory exists.
    pub async fn has_staging_dir(&self) -> bool {
        fs::metadata(&self.temp_dir)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false)
    }

    /// Remove staged files older than the retention window.
    pub async fn sweep(&self) -> Result<usize> {
        self.sweep_at(Utc::now().timestamp_millis()).await
    }

    /// Sweep relative to the given epoch-millisecond clock.
    ///
    /// Files whose age is strictly greater than the window are removed.
    /// Entries without a parseable `temp_<millis>` name are left alone, and a
    /// missing staging directory counts as nothing to do.
    pub async fn sweep_at(&self, now_millis: i64) -> Result<usize> {
        let mut entries = match fs::read_dir(&self.temp_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };

        let max_age_millis = i64::try_from(self.temp_max_age.as_millis()).unwrap_or(i64::MAX);
        let mut deleted_count = 0;

        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            let Some(created) = staged_timestamp(name) else {
                continue;
            };
            if now_millis.saturating_sub(created) <= max_age_millis {
                continue;
            }

            match remove_file_if_present(&entry.path()).await {
                Ok(true) => deleted_count += 1,
                Ok(false) => {}
                Err(e) => tracing::warn!(filename = %name, "Failed to sweep staged upload: {e}"),
            }
        }

        if deleted_count > 0 {
            tracing::info!(deleted_count, "Swept expired staged uploads");
        }
        Ok(deleted_count)
    }
}

async fn is_file(path: &Path) -> bool {
    fs::metadata(path)
        .await
        .map(|m| m.is_file())
        .unwrap_or(false)
}

/// Remove a regular file.
///
/// Returns `false` when nothing (or something other than a file) is at the
/// path.
async fn remove_file_if_present(path: &Path) -> Result<bool> {
    if !is_file(path).await {
        return Ok(false);
    }
    match fs::remove_file(path).await {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}
