//! Authentication and authorization for Aula.
//!
//! - `password`: Argon2id hashing and the password composition policy
//! - `session`: the sealed-cookie session store
//! - `guard`: axum extractors enforcing authentication and the admin role

pub mod guard;
pub mod password;
pub mod session;

pub use guard::{AdminUser, CurrentUser};
pub use password::{
    hash_password, validate_password, verify_password, PasswordError, MAX_PASSWORD_LENGTH,
    MIN_PASSWORD_LENGTH,
};
pub use session::{SessionData, SessionStore, SESSION_COOKIE};
