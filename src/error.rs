//! Error types for the CTF site backend.

use thiserror::Error;

/// Common error type for the site.
#[derive(Error, Debug)]
pub enum SiteError {
    /// Database error.
    ///
    /// Errors from sqlx are converted into this variant.
    #[error("database error: {0}")]
    Database(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Authentication error.
    #[error("authentication error: {0}")]
    Auth(String),

    /// Validation error for user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Resource already exists (e.g. duplicate slug).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Document (de)serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<sqlx::Error> for SiteError {
    fn from(e: sqlx::Error) -> Self {
        SiteError::Database(e.to_string())
    }
}

/// Result type alias for site operations.
pub type Result<T> = std::result::Result<T, SiteError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let err = SiteError::Validation("Only image files are allowed".to_string());
        assert_eq!(
            err.to_string(),
            "validation error: Only image files are allowed"
        );
    }

    #[test]
    fn test_not_found_error_display() {
        let err = SiteError::NotFound("Temporary file".to_string());
        assert_eq!(err.to_string(), "Temporary file not found");
    }

    #[test]
    fn test_conflict_error_display() {
        let err = SiteError::Conflict("slug already in use".to_string());
        assert_eq!(err.to_string(), "conflict: slug already in use");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err: SiteError = io_err.into();
        assert!(matches!(err, SiteError::Io(_)));
        assert!(err.to_string().contains("read-only"));
    }

    #[test]
    fn test_serde_error_conversion() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: SiteError = parse_err.into();
        assert!(matches!(err, SiteError::Serialization(_)));
    }
}
