//! Cookie session store for Aula.
//!
//! The session record lives entirely client-side, sealed inside an
//! encrypted and authenticated cookie (`PrivateCookieJar`). A cookie that
//! is absent, malformed, or fails authentication loads as the anonymous
//! record rather than an error.

use axum_extra::extract::cookie::{Cookie, PrivateCookieJar, SameSite};
use serde::{Deserialize, Serialize};
use time::Duration;

use crate::db::Role;
use crate::{AulaError, Result};

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "student_portal_session";

/// Decrypted payload of the session cookie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionData {
    /// ID of the logged-in user.
    #[serde(default)]
    pub user_id: Option<String>,
    /// Email of the logged-in user.
    #[serde(default)]
    pub email: Option<String>,
    /// Role of the logged-in user.
    #[serde(default)]
    pub role: Option<Role>,
    /// Whether this record represents a live login.
    #[serde(default)]
    pub is_logged_in: bool,
}

impl SessionData {
    /// The logged-out record.
    pub fn anonymous() -> Self {
        Self {
            user_id: None,
            email: None,
            role: None,
            is_logged_in: false,
        }
    }

    /// Record for a freshly authenticated user.
    pub fn authenticated(user_id: impl Into<String>, email: impl Into<String>, role: Role) -> Self {
        Self {
            user_id: Some(user_id.into()),
            email: Some(email.into()),
            role: Some(role),
            is_logged_in: true,
        }
    }

    /// Load the session record from a decrypted cookie jar.
    ///
    /// Fails open: any missing or undecodable cookie yields the anonymous
    /// record. The jar itself rejects cookies whose authentication tag does
    /// not verify, so a tampered cookie also lands here.
    pub fn from_jar(jar: &PrivateCookieJar) -> Self {
        let Some(cookie) = jar.get(SESSION_COOKIE) else {
            return Self::anonymous();
        };

        match serde_json::from_str::<SessionData>(cookie.value()) {
            Ok(data) if data.is_logged_in && data.user_id.is_some() => data,
            _ => Self::anonymous(),
        }
    }
}

/// Issues and clears session cookies with the configured attributes.
#[derive(Debug, Clone)]
pub struct SessionStore {
    /// Whether cookies carry the Secure attribute.
    secure: bool,
    /// Session lifetime in days.
    ttl_days: i64,
}

impl SessionStore {
    /// Create a session store.
    pub fn new(secure: bool, ttl_days: u64) -> Self {
        Self {
            secure,
            ttl_days: ttl_days as i64,
        }
    }

    /// Seal the record into the jar as the session cookie.
    ///
    /// The cookie is HttpOnly, SameSite=Strict, scoped to the root path,
    /// and expires after the configured TTL.
    pub fn establish(&self, jar: PrivateCookieJar, data: &SessionData) -> Result<PrivateCookieJar> {
        let value = serde_json::to_string(data)
            .map_err(|e| AulaError::Auth(format!("session serialization failed: {e}")))?;

        let cookie = Cookie::build((SESSION_COOKIE, value))
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(self.secure)
            .path("/")
            .max_age(Duration::days(self.ttl_days));

        Ok(jar.add(cookie))
    }

    /// Clear the session cookie immediately.
    pub fn destroy(&self, jar: PrivateCookieJar) -> PrivateCookieJar {
        jar.remove(Cookie::build(SESSION_COOKIE).path("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum_extra::extract::cookie::Key;

    fn test_key() -> Key {
        Key::derive_from(b"an-adequately-long-test-session-secret-value")
    }

    #[test]
    fn test_anonymous_record() {
        let data = SessionData::anonymous();
        assert!(!data.is_logged_in);
        assert!(data.user_id.is_none());
        assert!(data.email.is_none());
        assert!(data.role.is_none());
    }

    #[test]
    fn test_establish_then_load_round_trips() {
        let store = SessionStore::new(false, 7);
        let jar = PrivateCookieJar::new(test_key());

        let data = SessionData::authenticated("user-1", "a@x.com", Role::Student);
        let jar = store.establish(jar, &data).unwrap();

        let loaded = SessionData::from_jar(&jar);
        assert!(loaded.is_logged_in);
        assert_eq!(loaded.user_id.as_deref(), Some("user-1"));
        assert_eq!(loaded.email.as_deref(), Some("a@x.com"));
        assert_eq!(loaded.role, Some(Role::Student));
    }

    #[test]
    fn test_destroy_yields_anonymous() {
        let store = SessionStore::new(false, 7);
        let jar = PrivateCookieJar::new(test_key());

        let data = SessionData::authenticated("user-1", "a@x.com", Role::Admin);
        let jar = store.establish(jar, &data).unwrap();
        let jar = store.destroy(jar);

        let loaded = SessionData::from_jar(&jar);
        assert!(!loaded.is_logged_in);
        assert!(loaded.user_id.is_none());
    }

    #[test]
    fn test_empty_jar_is_anonymous() {
        let jar = PrivateCookieJar::new(test_key());
        let loaded = SessionData::from_jar(&jar);
        assert!(!loaded.is_logged_in);
    }

    #[test]
    fn test_cookie_attributes() {
        let store = SessionStore::new(true, 7);
        let jar = PrivateCookieJar::new(test_key());

        let data = SessionData::authenticated("user-1", "a@x.com", Role::Student);
        let jar = store.establish(jar, &data).unwrap();

        let cookie = jar.get(SESSION_COOKIE).unwrap();
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Strict));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(Duration::days(7)));
    }

    #[test]
    fn test_logged_out_payload_is_anonymous() {
        // A sealed record with is_logged_in=false must not authenticate
        let store = SessionStore::new(false, 7);
        let jar = PrivateCookieJar::new(test_key());

        let jar = store.establish(jar, &SessionData::anonymous()).unwrap();
        let loaded = SessionData::from_jar(&jar);
        assert!(!loaded.is_logged_in);
    }
}
