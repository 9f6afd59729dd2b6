//! Filename and URL conventions for uploaded images.
//!
//! Whether a file is staged, and how old it is, is answered purely by its
//! name: staged files are `temp_<epochMillis>.<ext>` under `uploads/temp/`,
//! permanent files live directly under `uploads/`.

use std::path::Path;

use crate::{Result, SiteError};

/// Prefix of every staged filename.
pub const TEMP_PREFIX: &str = "temp_";

/// Name of the staging directory below the uploads directory.
pub const TEMP_DIR_NAME: &str = "temp";

/// Public URL prefix of permanent uploads.
pub const UPLOADS_URL_PREFIX: &str = "/uploads/";

/// Public URL prefix of staged uploads.
pub const TEMP_URL_PREFIX: &str = "/uploads/temp/";

/// Extension used when the original filename has none.
const DEFAULT_EXTENSION: &str = "bin";

/// A reference to a file managed by the upload store, parsed from a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadRef {
    /// `/uploads/temp/<name>`
    Staged(String),
    /// `/uploads/<name>`
    Permanent(String),
}

impl UploadRef {
    /// Parse a public URL into an upload reference.
    ///
    /// Returns `None` for anything that is not a single-component path below
    /// `/uploads/` (external URLs, empty strings, nested paths).
    pub fn from_url(url: &str) -> Option<Self> {
        if let Some(name) = url.strip_prefix(TEMP_URL_PREFIX) {
            return is_safe_filename(name).then(|| UploadRef::Staged(name.to_string()));
        }
        let name = url.strip_prefix(UPLOADS_URL_PREFIX)?;
        is_safe_filename(name).then(|| UploadRef::Permanent(name.to_string()))
    }
}

/// Extract the extension of an uploaded file's original name.
///
/// Only ASCII alphanumerics survive; anything else falls back to `bin`.
pub fn extract_extension(original_name: &str) -> &str {
    Path::new(original_name)
        .extension()
        .and_then(|s| s.to_str())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or(DEFAULT_EXTENSION)
}

/// Build a staged filename: `temp_<millis>.<ext>`.
pub fn staged_name(timestamp_millis: i64, original_name: &str) -> String {
    format!(
        "{TEMP_PREFIX}{timestamp_millis}.{}",
        extract_extension(original_name)
    )
}

/// Build a permanent filename: `<millis>.<ext>`.
pub fn permanent_name(timestamp_millis: i64, original_name: &str) -> String {
    format!("{timestamp_millis}.{}", extract_extension(original_name))
}

/// The final name a staged file receives when the caller does not pick one.
pub fn default_final_name(temp_filename: &str) -> String {
    temp_filename
        .strip_prefix(TEMP_PREFIX)
        .unwrap_or(temp_filename)
        .to_string()
}

/// Parse the creation timestamp (epoch millis) embedded in a staged filename.
///
/// The digits directly after the prefix are used, so `temp_1700000000000.png`
/// yields `1700000000000`. Names without the prefix or without leading digits
/// yield `None`.
pub fn staged_timestamp(filename: &str) -> Option<i64> {
    let rest = filename.strip_prefix(TEMP_PREFIX)?;
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    rest[..end].parse().ok()
}

/// Public URL of a permanent file.
pub fn permanent_url(filename: &str) -> String {
    format!("{UPLOADS_URL_PREFIX}{filename}")
}

/// Public URL of a staged file.
pub fn staged_url(filename: &str) -> String {
    format!("{TEMP_URL_PREFIX}{filename}")
}

/// Whether a client-supplied name is a plain single path component.
pub fn is_safe_filename(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && !name.contains(&['/', '\\'][..])
        && !name.chars().any(|c| c.is_control())
}

/// Reject client-supplied names that could escape the upload directories.
pub fn validate_filename(name: &str) -> Result<()> {
    if is_safe_filename(name) {
        Ok(())
    } else {
        Err(SiteError::Validation(format!("Invalid filename: {name:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_extension() {
        assert_eq!(extract_extension("photo.jpg"), "jpg");
        assert_eq!(extract_extension("banner.PNG"), "PNG");
        assert_eq!(extract_extension("archive.tar.gz"), "gz");
        assert_eq!(extract_extension("no_extension"), "bin");
        assert_eq!(extract_extension(".hidden"), "bin");
        assert_eq!(extract_extension("weird.p ng"), "bin");
        assert_eq!(extract_extension("../../escape.webp"), "webp");
    }

    #[test]
    fn test_staged_and_permanent_names() {
        assert_eq!(staged_name(1700000000000, "photo.jpg"), "temp_1700000000000.jpg");
        assert_eq!(permanent_name(1700000000000, "photo.jpg"), "1700000000000.jpg");
    }

    #[test]
    fn test_default_final_name() {
        assert_eq!(default_final_name("temp_1700000000000.png"), "1700000000000.png");
        assert_eq!(default_final_name("already.png"), "already.png");
    }

    #[test]
    fn test_staged_timestamp() {
        assert_eq!(staged_timestamp("temp_1700000000000.png"), Some(1700000000000));
        assert_eq!(staged_timestamp("temp_42"), Some(42));
        assert_eq!(staged_timestamp("temp_.png"), None);
        assert_eq!(staged_timestamp("temp_abc.png"), None);
        assert_eq!(staged_timestamp("1700000000000.png"), None);
        assert_eq!(staged_timestamp(".gitkeep"), None);
    }

    #[test]
    fn test_urls() {
        assert_eq!(permanent_url("a.png"), "/uploads/a.png");
        assert_eq!(staged_url("temp_1.png"), "/uploads/temp/temp_1.png");
    }

    #[test]
    fn test_upload_ref_from_url() {
        assert_eq!(
            UploadRef::from_url("/uploads/temp/temp_1.png"),
            Some(UploadRef::Staged("temp_1.png".to_string()))
        );
        assert_eq!(
            UploadRef::from_url("/uploads/1.png"),
            Some(UploadRef::Permanent("1.png".to_string()))
        );
        assert_eq!(UploadRef::from_url("https://picsum.photos/200/200"), None);
        assert_eq!(UploadRef::from_url(""), None);
        assert_eq!(UploadRef::from_url("/uploads/"), None);
        assert_eq!(UploadRef::from_url("/uploads/temp/"), None);
        assert_eq!(UploadRef::from_url("/uploads/a/b.png"), None);
        assert_eq!(UploadRef::from_url("/uploads/../secret"), None);
        assert_eq!(UploadRef::from_url("/uploads/temp/sub/temp_1.png"), None);
        assert_eq!(UploadRef::from_url("/uploads/temp/.temp_1.png"), None);
    }

    #[test]
    fn test_validate_filename() {
        assert!(validate_filename("temp_1.png").is_ok());
        assert!(validate_filename("banner1.jpg").is_ok());
        assert!(validate_filename("").is_err());
        assert!(validate_filename("..").is_err());
        assert!(validate_filename("../x.png").is_err());
        assert!(validate_filename("a/b.png").is_err());
        assert!(validate_filename("a\\b.png").is_err());
        assert!(validate_filename(".env").is_err());
        assert!(validate_filename("bad\nname.png").is_err());
    }
}
