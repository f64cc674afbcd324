//! Course model and repository for Aula.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, QueryBuilder, SqlitePool};
use uuid::Uuid;

use crate::{AulaError, Result};

/// Course entity.
#[derive(Debug, Clone, FromRow)]
pub struct Course {
    /// Unique course ID (UUID).
    pub id: String,
    /// Course code (unique), e.g. "CS101".
    pub code: String,
    /// Course name.
    pub name: String,
    /// Optional free-form description.
    pub description: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Course row with enrollment and assignment counts.
#[derive(Debug, Clone, FromRow)]
pub struct CourseWithCounts {
    /// The course record.
    #[sqlx(flatten)]
    pub course: Course,
    /// Number of enrollments in this course.
    pub enrollment_count: i64,
    /// Number of assignments in this course.
    pub assignment_count: i64,
}

/// Data for creating a new course.
#[derive(Debug, Clone)]
pub struct NewCourse {
    /// Course code.
    pub code: String,
    /// Course name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
}

impl NewCourse {
    /// Create a new course definition.
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            description: None,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Data for updating an existing course.
#[derive(Debug, Clone, Default)]
pub struct CourseUpdate {
    /// New course code.
    pub code: Option<String>,
    /// New course name.
    pub name: Option<String>,
    /// New description (Some(None) clears it).
    pub description: Option<Option<String>>,
}

impl CourseUpdate {
    /// Create an empty update.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a new code.
    pub fn code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Set a new name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set a new description.
    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = Some(description);
        self
    }

    /// Check if any fields are set.
    pub fn is_empty(&self) -> bool {
        self.code.is_none() && self.name.is_none() && self.description.is_none()
    }
}

/// Repository for course CRUD operations.
pub struct CourseRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CourseRepository<'a> {
    /// Create a new CourseRepository with the given pool reference.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new course. A duplicate code surfaces as `AulaError::Conflict`.
    pub async fn create(&self, new_course: &NewCourse) -> Result<Course> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO courses (id, code, name, description, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(&new_course.code)
        .bind(&new_course.name)
        .bind(&new_course.description)
        .bind(now)
        .bind(now)
        .execute(self.pool)
        .await?;

        self.get_by_id(&id)
            .await?
            .ok_or_else(|| AulaError::NotFound("course".to_string()))
    }

    /// Get a course by ID.
    pub async fn get_by_id(&self, id: &str) -> Result<Option<Course>> {
        let result = sqlx::query_as::<_, Course>(
            "SELECT id, code, name, description, created_at, updated_at
             FROM courses WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(result)
    }

    /// Get a course by its unique code.
    pub async fn get_by_code(&self, code: &str) -> Result<Option<Course>> {
        let result = sqlx::query_as::<_, Course>(
            "SELECT id, code, name, description, created_at, updated_at
             FROM courses WHERE code = ?",
        )
        .bind(code)
        .fetch_optional(self.pool)
        .await?;

        Ok(result)
    }

    /// List all courses with enrollment/assignment counts, newest first.
    pub async fn list_with_counts(&self) -> Result<Vec<CourseWithCounts>> {
        let rows = sqlx::query_as::<_, CourseWithCounts>(
            "SELECT c.id, c.code, c.name, c.description, c.created_at, c.updated_at,
                    (SELECT COUNT(*) FROM enrollments e WHERE e.course_id = c.id) AS enrollment_count,
                    (SELECT COUNT(*) FROM assignments a WHERE a.course_id = c.id) AS assignment_count
             FROM courses c
             ORDER BY c.created_at DESC",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Update a course by ID.
    ///
    /// Only fields set in the update are modified. Returns the updated
    /// course, or None if not found.
    pub async fn update(&self, id: &str, update: &CourseUpdate) -> Result<Option<Course>> {
        if update.is_empty() {
            return self.get_by_id(id).await;
        }

        let mut query: QueryBuilder<sqlx::Sqlite> = QueryBuilder::new("UPDATE courses SET ");
        let mut separated = query.separated(", ");

        if let Some(ref code) = update.code {
            separated.push("code = ");
            separated.push_bind_unseparated(code);
        }
        if let Some(ref name) = update.name {
            separated.push("name = ");
            separated.push_bind_unseparated(name);
        }
        if let Some(ref description) = update.description {
            separated.push("description = ");
            separated.push_bind_unseparated(description.clone());
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

    /// Delete a course by ID. Returns true if a row was removed.
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM courses WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Count all courses.
    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM courses")
            .fetch_one(self.pool)
            .await?;

        Ok(count)
    }
}
