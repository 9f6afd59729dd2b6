//! Configuration module for the CTF site backend.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::{Result, SiteError};

/// Web server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    /// Host address to bind.
    #[serde(default = "default_web_host")]
    pub host: String,
    /// Port number for the HTTP API.
    #[serde(default = "default_web_port")]
    pub port: u16,
    /// CORS allowed origins.
    #[serde(default)]
    pub cors_origins: Vec<String>,
    /// Rate limit for the login endpoint (requests per minute per IP).
    #[serde(default = "default_login_rate_limit")]
    pub login_rate_limit: u32,
}

fn default_web_host() -> String {
    "0.0.0.0".to_string()
}

fn default_web_port() -> u16 {
    3000
}

fn default_login_rate_limit() -> u32 {
    10
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: default_web_host(),
            port: default_web_port(),
            cors_origins: vec![],
            login_rate_limit: default_login_rate_limit(),
        }
    }
}

/// Which repository implementation backs the content store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// SQLite document table.
    Sqlite,
    /// Process-local, lost on restart.
    Memory,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Repository backend.
    #[serde(default = "default_backend")]
    pub backend: StorageBackend,
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,
    /// Insert the demo content when the store is empty.
    #[serde(default = "default_seed")]
    pub seed_defaults: bool,
}

fn default_backend() -> StorageBackend {
    StorageBackend::Sqlite
}

fn default_db_path() -> String {
    "data/ctf-site.db".to_string()
}

fn default_seed() -> bool {
    true
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            path: default_db_path(),
            seed_defaults: default_seed(),
        }
    }
}

/// Image upload configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadsConfig {
    /// Public static root; images live under `{public_root}/uploads`.
    #[serde(default = "default_public_root")]
    pub public_root: String,
    /// Maximum upload size in megabytes.
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size_mb: u64,
    /// Age after which a staged file is swept.
    #[serde(default = "default_temp_max_age")]
    pub temp_max_age_secs: u64,
    /// Interval of the background sweep.
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,
}

fn default_public_root() -> String {
    "public".to_string()
}

fn default_max_upload_size() -> u64 {
    5
}

fn default_temp_max_age() -> u64 {
    3600 // 1 hour
}

fn default_sweep_interval() -> u64 {
    900 // 15 minutes
}

impl Default for UploadsConfig {
    fn default() -> Self {
        Self {
            public_root: default_public_root(),
            max_upload_size_mb: default_max_upload_size(),
            temp_max_age_secs: default_temp_max_age(),
            sweep_interval_secs: default_sweep_interval(),
        }
    }
}

impl UploadsConfig {
    /// Directory holding permanent images.
    pub fn uploads_dir(&self) -> PathBuf {
        Path::new(&self.public_root).join("uploads")
    }

    /// Maximum upload size in bytes.
    pub fn max_upload_bytes(&self) -> u64 {
        self.max_upload_size_mb * 1024 * 1024
    }
}

/// Admin panel configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminConfig {
    /// Admin login name.
    #[serde(default = "default_admin_username")]
    pub username: String,
    /// Argon2 PHC hash of the admin password. Login is disabled while empty.
    #[serde(default)]
    pub password_hash: String,
    /// Name of the session cookie.
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    /// Session lifetime in seconds.
    #[serde(default = "default_session_duration")]
    pub session_duration_secs: u64,
    /// Set the `Secure` attribute on the session cookie.
    #[serde(default)]
    pub secure_cookie: bool,
}

fn default_admin_username() -> String {
    "admin".to_string()
}

fn default_cookie_name() -> String {
    "r00t-r3b3lz-auth".to_string()
}

fn default_session_duration() -> u64 {
    24 * 60 * 60
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            username: default_admin_username(),
            password_hash: String::new(),
            cookie_name: default_cookie_name(),
            session_duration_secs: default_session_duration(),
            secure_cookie: false,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/ctf-site.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Web server configuration.
    #[serde(default)]
    pub web: WebConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Upload configuration.
    #[serde(default)]
    pub uploads: UploadsConfig,
    /// Admin configuration.
    #[serde(default)]
    pub admin: AdminConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(SiteError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| SiteError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `CTF_SITE_ADMIN_PASSWORD_HASH`: Override the admin password hash
    pub fn apply_env_overrides(&mut self) {
        if let Ok(hash) = std::env::var("CTF_SITE_ADMIN_PASSWORD_HASH") {
            if !hash.is_empty() {
                self.admin.password_hash = hash;
            }
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.uploads.max_upload_size_mb == 0 {
            return Err(SiteError::Config(
                "uploads.max_upload_size_mb must be greater than 0".to_string(),
            ));
        }
        if self.admin.cookie_name.is_empty() {
            return Err(SiteError::Config(
                "admin.cookie_name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
