//! Admin authentication.

mod admin;
mod password;
mod session;

pub use admin::AdminAuth;
pub use password::{
    hash_password, validate_password, verify_password, PasswordError, MAX_PASSWORD_LENGTH,
    MIN_PASSWORD_LENGTH,
};
pub use session::{AdminSession, SessionStore};
