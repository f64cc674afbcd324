//! API handlers for the Aula Web API.

pub mod assignments;
pub mod auth;
pub mod courses;
pub mod dashboard;
pub mod enrollments;
pub mod submissions;
pub mod upload;
pub mod users;

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;

use crate::auth::SessionStore;
use crate::db::Database;
use crate::upload::UploadStorage;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database handle.
    pub db: Database,
    /// Cookie sealing key, derived from the session secret.
    pub key: Key,
    /// Session cookie issuer.
    pub sessions: SessionStore,
    /// Upload storage.
    pub uploads: UploadStorage,
}

impl AppState {
    /// Create the application state.
    ///
    /// The session secret must be at least 32 bytes (enforced by
    /// `Config::validate`); the sealing key is derived from it.
    pub fn new(
        db: Database,
        session_secret: &str,
        secure_cookies: bool,
        session_ttl_days: u64,
        uploads: UploadStorage,
    ) -> Self {
        Self {
            db,
            key: Key::derive_from(session_secret.as_bytes()),
            sessions: SessionStore::new(secure_cookies, session_ttl_days),
            uploads,
        }
    }
}

// PrivateCookieJar extraction pulls its key out of the router state.
impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Key {
        state.key.clone()
    }
}
