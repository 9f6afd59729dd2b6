//! Backend for a CTF team website.
//!
//! Serves CTF events, challenge write-ups and team member profiles, with an
//! admin area for managing them. Images are uploaded into a staging area
//! and promoted to permanent storage only when the record that uses them is
//! saved.

pub mod auth;
pub mod config;
pub mod content;
pub mod db;
pub mod error;
pub mod logging;
pub mod upload;
pub mod web;

pub use auth::{hash_password, verify_password, AdminAuth, AdminSession, PasswordError};
pub use config::Config;
pub use content::{ContentService, MemoryRepository, Repository, SqliteRepository};
pub use db::Database;
pub use error::{Result, SiteError};
pub use upload::{FinalizeRequest, ImageUpload, StoredUpload, UploadStore};
pub use web::WebServer;
