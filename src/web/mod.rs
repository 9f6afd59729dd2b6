//! HTTP API for the team site.
//!
//! Public read endpoints, admin content management, the upload staging
//! endpoints and static serving of uploaded images.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use handlers::AppState;
pub use router::create_router;
pub use server::WebServer;
