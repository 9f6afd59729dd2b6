//! Shared helpers for the HTTP integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use axum_extra::extract::cookie::Cookie;
use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use serde_json::json;
use tempfile::TempDir;

use ctf_site::config::Config;
use ctf_site::web::{create_router, AppState};
use ctf_site::{hash_password, ContentService, UploadStore};

pub const ADMIN_USER: &str = "admin";
pub const ADMIN_PASSWORD: &str = "correct-horse-battery";
pub const COOKIE_NAME: &str = "r00t-r3b3lz-auth";

/// Argon2 is slow; hash the test password once per test binary.
fn admin_hash() -> &'static str {
    static HASH: OnceLock<String> = OnceLock::new();
    HASH.get_or_init(|| hash_password(ADMIN_PASSWORD).expect("hash test password"))
}

/// A router over in-memory repositories and a temporary public root.
pub struct TestApp {
    pub server: TestServer,
    pub state: Arc<AppState>,
    pub dir: TempDir,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(|_| {})
    }

    pub fn with_config(adjust: impl FnOnce(&mut Config)) -> Self {
        let dir = TempDir::new().expect("temp dir");

        let mut config = Config::default();
        config.uploads.public_root = dir.path().to_string_lossy().into_owned();
        config.admin.username = ADMIN_USER.to_string();
        config.admin.password_hash = admin_hash().to_string();
        config.web.login_rate_limit = 100;
        adjust(&mut config);

        let content = ContentService::in_memory(UploadStore::from_config(&config.uploads));
        let state = Arc::new(AppState::new(content, &config));
        let router = create_router(state.clone(), &config.web.cors_origins);
        let server = TestServer::new(router).expect("test server");

        Self { server, state, dir }
    }

    pub fn uploads_dir(&self) -> PathBuf {
        self.dir.path().join("uploads")
    }

    pub fn temp_dir(&self) -> PathBuf {
        self.uploads_dir().join("temp")
    }

    /// Log in through the real endpoint and return the session cookie.
    pub async fn login(&self) -> Cookie<'static> {
        let response = self
            .server
            .post("/api/auth/login")
            .json(&json!({ "username": ADMIN_USER, "password": ADMIN_PASSWORD }))
            .await;
        response.assert_status_ok();
        response.cookie(COOKIE_NAME)
    }
}

/// A multipart form carrying one file in the `file` field.
pub fn file_form(name: &str, mime: &str, data: Vec<u8>) -> MultipartForm {
    MultipartForm::new().add_part("file", Part::bytes(data).file_name(name).mime_type(mime))
}

/// A few bytes that look like a PNG.
pub fn png_bytes() -> Vec<u8> {
    vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0, 0, 0, 0]
}

pub fn exists(path: impl AsRef<Path>) -> bool {
    path.as_ref().is_file()
}
