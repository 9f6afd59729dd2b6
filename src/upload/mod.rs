//! Image upload staging.
//!
//! Uploads land in a staging directory first and are promoted to permanent
//! storage only when the content that references them is saved. Abandoned
//! staged files are swept after a retention window.

mod naming;
mod store;

pub use naming::{
    extract_extension, is_safe_filename, staged_timestamp, validate_filename, UploadRef,
    TEMP_PREFIX, TEMP_URL_PREFIX, UPLOADS_URL_PREFIX,
};
pub use store::{FinalizeRequest, ImageUpload, StoredUpload, UploadStore};
