//! Authorization guards for route handlers.
//!
//! `CurrentUser` rejects anonymous requests with 401; `AdminUser` layers a
//! role check on top and rejects non-admins with 403. Resource-level
//! ownership checks (enrollment, own-submission) stay with the individual
//! handlers.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::extract::cookie::{Key, PrivateCookieJar};

use crate::auth::session::SessionData;
use crate::db::Role;
use crate::web::error::ApiError;

/// Extractor for any authenticated user.
///
/// Rejects with 401 when no valid session cookie accompanies the request.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub SessionData);

impl CurrentUser {
    /// ID of the authenticated user.
    pub fn user_id(&self) -> &str {
        self.0.user_id.as_deref().unwrap_or_default()
    }

    /// Role of the authenticated user.
    pub fn role(&self) -> Role {
        self.0.role.unwrap_or(Role::Student)
    }

    /// Whether the authenticated user is an admin.
    pub fn is_admin(&self) -> bool {
        self.role() == Role::Admin
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
    Key: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = PrivateCookieJar::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::internal("Cookie jar unavailable"))?;

        let session = SessionData::from_jar(&jar);
        if !session.is_logged_in {
            return Err(ApiError::unauthorized("Authentication required"));
        }

        Ok(CurrentUser(session))
    }
}

/// Extractor for admin-only routes.
///
/// Rejects with 401 when anonymous, 403 when the session role is not ADMIN.
#[derive(Debug, Clone)]
pub struct AdminUser(pub SessionData);

impl AdminUser {
    /// ID of the authenticated admin.
    pub fn user_id(&self) -> &str {
        self.0.user_id.as_deref().unwrap_or_default()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
    Key: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let CurrentUser(session) = CurrentUser::from_request_parts(parts, state).await?;

        if session.role != Some(Role::Admin) {
            return Err(ApiError::forbidden("Admin access required"));
        }

        Ok(AdminUser(session))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_user_accessors() {
        let user = CurrentUser(SessionData::authenticated("u-1", "a@x.com", Role::Student));
        assert_eq!(user.user_id(), "u-1");
        assert_eq!(user.role(), Role::Student);
        assert!(!user.is_admin());
    }

    #[test]
    fn test_current_user_admin() {
        let user = CurrentUser(SessionData::authenticated("u-2", "b@x.com", Role::Admin));
        assert!(user.is_admin());
    }

    #[test]
    fn test_admin_user_accessor() {
        let admin = AdminUser(SessionData::authenticated("u-3", "c@x.com", Role::Admin));
        assert_eq!(admin.user_id(), "u-3");
    }
}
