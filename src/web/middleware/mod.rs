//! Middleware for the web API.

pub mod auth;
pub mod cors;
pub mod rate_limit;
pub mod security;

pub use auth::{current_session, require_admin, AdminUser, CookieSettings};
pub use cors::create_cors_layer;
pub use rate_limit::{login_rate_limit, LoginRateLimiter};
pub use security::security_headers;
