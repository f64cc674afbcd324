//! Admin user-management handlers.

use std::str::FromStr;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::auth::{hash_password, AdminUser};
use crate::db::{NewUser, Role, UserRepository, UserUpdate};
use crate::web::dto::{
    CreateUserRequest, MessageResponse, UserEnvelope, UserUpdateRequest, UsersEnvelope,
    ValidatedJson,
};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;

/// Query parameters for the user listing.
#[derive(Debug, Deserialize)]
pub struct ListUsersQuery {
    /// Optional role filter (STUDENT or ADMIN).
    pub role: Option<String>,
}

/// GET /api/users - List users with activity counts (admin).
pub async fn list_users(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(query): Query<ListUsersQuery>,
) -> Result<Json<UsersEnvelope>, ApiError> {
    let role = match query.role {
        Some(ref s) => Some(
            Role::from_str(s).map_err(|_| ApiError::bad_request(format!("Invalid role: {s}")))?,
        ),
        None => None,
    };

    let repo = UserRepository::new(state.db.pool());
    let users = repo.list_with_counts(role).await?;

    Ok(Json(UsersEnvelope {
        users: users.into_iter().map(Into::into).collect(),
    }))
}

/// POST /api/users - Create a user with an explicit role (admin).
pub async fn create_user(
    State(state): State<AppState>,
    admin: AdminUser,
    ValidatedJson(req): ValidatedJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserEnvelope>), ApiError> {
    let repo = UserRepository::new(state.db.pool());

    if repo.get_by_email(&req.email).await?.is_some() {
        return Err(ApiError::conflict("Email already registered"));
    }

    let password_hash = hash_password(&req.password).map_err(|e| {
        tracing::error!(error = %e, "Password hashing failed");
        ApiError::internal("Failed to create user")
    })?;

    let user = repo
        .create(
            &NewUser::new(&req.name, &req.email, password_hash)
                .with_role(req.role.unwrap_or_default()),
        )
        .await?;

    tracing::info!(
        user_id = %user.id,
        role = %user.role,
        admin_id = %admin.user_id(),
        "User created by admin"
    );

    Ok((
        StatusCode::CREATED,
        Json(UserEnvelope { user: user.into() }),
    ))
}

/// PATCH /api/users/:id - Partially update a user (admin).
pub async fn update_user(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(user_id): Path<String>,
    ValidatedJson(req): ValidatedJson<UserUpdateRequest>,
) -> Result<Json<UserEnvelope>, ApiError> {
    let repo = UserRepository::new(state.db.pool());

    let mut update = UserUpdate::new();
    if let Some(name) = req.name {
        update = update.name(name);
    }
    if let Some(email) = req.email {
        update = update.email(email);
    }
    if let Some(role) = req.role {
        update = update.role(role);
    }

    let user = repo
        .update(&user_id, &update)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    tracing::info!(user_id = %user.id, admin_id = %admin.user_id(), "User updated by admin");

    Ok(Json(UserEnvelope { user: user.into() }))
}

/// DELETE /api/users/:id - Delete a user (admin).
pub async fn delete_user(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(user_id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let repo = UserRepository::new(state.db.pool());

    if !repo.delete(&user_id).await? {
        return Err(ApiError::not_found("User not found"));
    }

    tracing::info!(user_id = %user_id, admin_id = %admin.user_id(), "User deleted by admin");

    Ok(Json(MessageResponse::new("User deleted successfully")))
}
