//! Authentication handlers: register, login, logout, whoami.

use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::cookie::PrivateCookieJar;

use crate::auth::{hash_password, verify_password, CurrentUser, SessionData};
use crate::db::{NewUser, UserRepository};
use crate::web::dto::{
    AuthResponse, LoginRequest, MessageResponse, RegisterRequest, UserEnvelope, ValidatedJson,
};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;

/// POST /api/auth/register - Self-service student registration.
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let repo = UserRepository::new(state.db.pool());

    if repo.get_by_email(&req.email).await?.is_some() {
        tracing::info!(email = %req.email, "Registration attempt with existing email");
        return Err(ApiError::conflict("Email already registered"));
    }

    let password_hash = hash_password(&req.password).map_err(|e| {
        tracing::error!(error = %e, "Password hashing failed");
        ApiError::internal("Failed to process registration")
    })?;

    let user = repo
        .create(&NewUser::new(&req.name, &req.email, password_hash))
        .await?;

    tracing::info!(user_id = %user.id, email = %user.email, "New user registered");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "Registration successful".to_string(),
            user: user.into(),
        }),
    ))
}

/// POST /api/auth/login - Establish a session cookie.
pub async fn login(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<(PrivateCookieJar, Json<AuthResponse>), ApiError> {
    let repo = UserRepository::new(state.db.pool());

    // Unknown email and wrong password are indistinguishable to the client
    let Some(user) = repo.get_by_email(&req.email).await? else {
        tracing::info!(email = %req.email, "Login attempt with unknown email");
        return Err(ApiError::unauthorized("Invalid credentials"));
    };

    if verify_password(&req.password, &user.password_hash).is_err() {
        tracing::info!(user_id = %user.id, "Failed login attempt");
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    let session = SessionData::authenticated(&user.id, &user.email, user.role);
    let jar = state.sessions.establish(jar, &session)?;

    tracing::info!(user_id = %user.id, role = %user.role, "Successful login");

    Ok((
        jar,
        Json(AuthResponse {
            message: "Login successful".to_string(),
            user: user.into(),
        }),
    ))
}

/// POST /api/auth/logout - Destroy the session cookie.
pub async fn logout(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
) -> (PrivateCookieJar, Json<MessageResponse>) {
    let session = SessionData::from_jar(&jar);
    if let Some(user_id) = session.user_id {
        tracing::info!(user_id = %user_id, "User logged out");
    }

    let jar = state.sessions.destroy(jar);

    (jar, Json(MessageResponse::new("Logout successful")))
}

/// GET /api/auth/me - Current user info.
pub async fn me(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<UserEnvelope>, ApiError> {
    let repo = UserRepository::new(state.db.pool());

    let record = repo
        .get_by_id(user.user_id())
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(Json(UserEnvelope {
        user: record.into(),
    }))
}
