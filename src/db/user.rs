//! User model and repository for Aula.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, QueryBuilder, SqlitePool};
use uuid::Uuid;

use crate::{AulaError, Result};

/// User role for permission management.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum Role {
    /// Regular student.
    #[default]
    Student,
    /// Portal administrator.
    Admin,
}

impl Role {
    /// Convert role to its database/JSON string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "STUDENT",
            Role::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "STUDENT" => Ok(Role::Student),
            "ADMIN" => Ok(Role::Admin),
            _ => Err(format!("unknown role: {s}")),
        }
    }
}

/// User entity representing a registered account.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    /// Unique user ID (UUID).
    pub id: String,
    /// Display name.
    pub name: String,
    /// Email address (unique, case-insensitive).
    pub email: String,
    /// Password hash (Argon2).
    pub password_hash: String,
    /// User role for permissions.
    pub role: Role,
    /// Account creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Check if this user is an administrator.
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// User row with enrollment and submission counts.
#[derive(Debug, Clone, FromRow)]
pub struct UserWithCounts {
    /// The user record.
    #[sqlx(flatten)]
    pub user: User,
    /// Number of enrollments held by this user.
    pub enrollment_count: i64,
    /// Number of submissions made by this user.
    pub submission_count: i64,
}

/// Data for creating a new user.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Password hash (pre-hashed with Argon2).
    pub password_hash: String,
    /// User role (defaults to Student).
    pub role: Role,
}

impl NewUser {
    /// Create a new user with the default student role.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password_hash: password_hash.into(),
            role: Role::Student,
        }
    }

    /// Set the role.
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }
}

/// Data for updating an existing user.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    /// New display name.
    pub name: Option<String>,
    /// New email address.
    pub email: Option<String>,
    /// New role.
    pub role: Option<Role>,
}

impl UserUpdate {
    /// Create an empty update.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a new name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set a new email.
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Set a new role.
    pub fn role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    /// Check if any fields are set.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.role.is_none()
    }
}

/// Repository for user CRUD operations.
pub struct UserRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    /// Create a new UserRepository with the given pool reference.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new user.
    ///
    /// Returns the created user with its assigned ID. A duplicate email
    /// surfaces as `AulaError::Conflict`.
    pub async fn create(&self, new_user: &NewUser) -> Result<User> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO users (id, name, email, password_hash, role, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(&new_user.name)
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .bind(new_user.role)
        .bind(now)
        .bind(now)
        .execute(self.pool)
        .await?;

        self.get_by_id(&id)
            .await?
            .ok_or_else(|| AulaError::NotFound("user".to_string()))
    }

    /// Get a user by ID.
    pub async fn get_by_id(&self, id: &str) -> Result<Option<User>> {
        let result = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password_hash, role, created_at, updated_at
             FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(result)
    }

    /// Get a user by email (case-insensitive).
    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>> {
        let result = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password_hash, role, created_at, updated_at
             FROM users WHERE email = ? COLLATE NOCASE",
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        Ok(result)
    }

    /// List users with enrollment/submission counts, newest first.
    ///
    /// An optional role narrows the listing.
    pub async fn list_with_counts(&self, role: Option<Role>) -> Result<Vec<UserWithCounts>> {
        let mut query: QueryBuilder<sqlx::Sqlite> = QueryBuilder::new(
            "SELECT u.id, u.name, u.email, u.password_hash, u.role, u.created_at, u.updated_at,
                    (SELECT COUNT(*) FROM enrollments e WHERE e.user_id = u.id) AS enrollment_count,
                    (SELECT COUNT(*) FROM submissions s WHERE s.student_id = u.id) AS submission_count
             FROM users u",
        );

        if let Some(role) = role {
            query.push(" WHERE u.role = ");
            query.push_bind(role);
        }
        query.push(" ORDER BY u.created_at DESC");

        let rows = query
            .build_query_as::<UserWithCounts>()
            .fetch_all(self.pool)
            .await?;

        Ok(rows)
    }

    /// Update a user by ID.
    ///
    /// Only fields set in the update are modified. Returns the updated
    /// user, or None if not found.
    pub async fn update(&self, id: &str, update: &UserUpdate) -> Result<Option<User>> {
        if update.is_empty() {
            return self.get_by_id(id).await;
        }

        let mut query: QueryBuilder<sqlx::Sqlite> = QueryBuilder::new("UPDATE users SET ");
        let mut separated = query.separated(", ");

        if let Some(ref name) = update.name {
            separated.push("name = ");
            separated.push_bind_unseparated(name);
        }
        if let Some(ref email) = update.email {
            separated.push("email = ");
            separated.push_bind_unseparated(email);
        }
        if let Some(role) = update.role {
            separated.push("role = ");
            separated.push_bind_unseparated(role);
        }
        separated.push("updated_at = ");
        separated.push_bind_unseparated(Utc::now());

        query.push(" WHERE id = ");
        query.push_bind(id);

        let result = query.build().execute(self.pool).await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get_by_id(id).await
    }

    /// Delete a user by ID. Returns true if a row was removed.
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Count users holding the given role.
    pub async fn count_by_role(&self, role: Role) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE role = ?")
            .bind(role)
            .fetch_one(self.pool)
            .await?;

        Ok(count)
    }
}
