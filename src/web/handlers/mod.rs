//! API handlers.

pub mod admin;
pub mod auth;
pub mod content;
pub mod health;
pub mod upload;

pub use admin::*;
pub use auth::*;
pub use content::*;
pub use health::*;
pub use upload::*;

use crate::auth::AdminAuth;
use crate::config::Config;
use crate::content::ContentService;
use crate::upload::UploadStore;
use crate::web::middleware::{CookieSettings, LoginRateLimiter};

/// Shared state for every handler.
pub struct AppState {
    /// Content records and their images.
    pub content: ContentService,
    /// Admin credentials and live sessions.
    pub auth: AdminAuth,
    /// Session cookie attributes.
    pub cookie: CookieSettings,
    /// Per-IP login throttle.
    pub login_limiter: LoginRateLimiter,
}

impl AppState {
    pub fn new(content: ContentService, config: &Config) -> Self {
        Self {
            content,
            auth: AdminAuth::new(&config.admin),
            cookie: CookieSettings::from_config(&config.admin),
            login_limiter: LoginRateLimiter::new(config.web.login_rate_limit),
        }
    }

    pub fn uploads(&self) -> &UploadStore {
        self.content.uploads()
    }
}
