//! Assignment model and repository for Aula.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, QueryBuilder, SqlitePool};
use uuid::Uuid;

use super::submission::SubmissionStatus;
use crate::{AulaError, Result};

/// Assignment entity, belonging to one course.
#[derive(Debug, Clone, FromRow)]
pub struct Assignment {
    /// Unique assignment ID (UUID).
    pub id: String,
    /// Owning course.
    pub course_id: String,
    /// Assignment title.
    pub title: String,
    /// Optional instructions.
    pub description: Option<String>,
    /// Optional due date.
    pub due_date: Option<DateTime<Utc>>,
    /// Optional attached file URL.
    pub file_url: Option<String>,
    /// Optional attached file name.
    pub file_name: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Assignment joined with a course summary.
#[derive(Debug, Clone, FromRow)]
pub struct AssignmentWithCourse {
    /// The assignment record.
    #[sqlx(flatten)]
    pub assignment: Assignment,
    /// Course code.
    pub course_code: String,
    /// Course name.
    pub course_name: String,
}

/// Upcoming assignment row for the student dashboard.
///
/// Carries the course summary and the requesting student's own submission
/// when one exists.
#[derive(Debug, Clone, FromRow)]
pub struct UpcomingAssignment {
    /// The assignment record.
    #[sqlx(flatten)]
    pub assignment: Assignment,
    /// Course code.
    pub course_code: String,
    /// Course name.
    pub course_name: String,
    /// The student's submission ID, if submitted.
    pub submission_id: Option<String>,
    /// The student's submission status, if submitted.
    pub submission_status: Option<SubmissionStatus>,
    /// The student's grade, if graded.
    pub submission_grade: Option<i64>,
}

/// Data for creating a new assignment.
#[derive(Debug, Clone)]
pub struct NewAssignment {
    /// Owning course.
    pub course_id: String,
    /// Assignment title.
    pub title: String,
    /// Optional instructions.
    pub description: Option<String>,
    /// Optional due date.
    pub due_date: Option<DateTime<Utc>>,
    /// Optional attached file URL.
    pub file_url: Option<String>,
    /// Optional attached file name.
    pub file_name: Option<String>,
}

impl NewAssignment {
    /// Create a new assignment definition.
    pub fn new(course_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            course_id: course_id.into(),
            title: title.into(),
            description: None,
            due_date: None,
            file_url: None,
            file_name: None,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the due date.
    pub fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Set the attached file.
    pub fn with_file(mut self, url: impl Into<String>, name: impl Into<String>) -> Self {
        self.file_url = Some(url.into());
        self.file_name = Some(name.into());
        self
    }
}

/// Data for updating an existing assignment.
///
/// Title, description and due date are mutable; the attachment is
/// replaced by re-upload, not by update.
#[derive(Debug, Clone, Default)]
pub struct AssignmentUpdate {
    /// New title.
    pub title: Option<String>,
    /// New description (Some(None) clears it).
    pub description: Option<Option<String>>,
    /// New due date (Some(None) clears it).
    pub due_date: Option<Option<DateTime<Utc>>>,
}

impl AssignmentUpdate {
    /// Create an empty update.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a new title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set a new description.
    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = Some(description);
        self
    }

    /// Set a new due date.
    pub fn due_date(mut self, due_date: Option<DateTime<Utc>>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Check if any fields are set.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.due_date.is_none()
    }
}

/// Repository for assignment CRUD operations.
pub struct AssignmentRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> AssignmentRepository<'a> {
    /// Create a new AssignmentRepository with the given pool reference.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new assignment.
    pub async fn create(&self, new_assignment: &NewAssignment) -> Result<Assignment> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO assignments
               (id, course_id, title, description, due_date, file_url, file_name,
                created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(&new_assignment.course_id)
        .bind(&new_assignment.title)
        .bind(&new_assignment.description)
        .bind(new_assignment.due_date)
        .bind(&new_assignment.file_url)
        .bind(&new_assignment.file_name)
        .bind(now)
        .bind(now)
        .execute(self.pool)
        .await?;

        self.get_by_id(&id)
            .await?
            .ok_or_else(|| AulaError::NotFound("assignment".to_string()))
    }

    /// Get an assignment by ID.
    pub async fn get_by_id(&self, id: &str) -> Result<Option<Assignment>> {
        let result = sqlx::query_as::<_, Assignment>(
            "SELECT id, course_id, title, description, due_date, file_url, file_name,
                    created_at, updated_at
             FROM assignments WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(result)
    }

    /// List all assignments with course summaries, newest first.
    pub async fn list_all(&self) -> Result<Vec<AssignmentWithCourse>> {
        let rows = sqlx::query_as::<_, AssignmentWithCourse>(
            "SELECT a.id, a.course_id, a.title, a.description, a.due_date,
                    a.file_url, a.file_name, a.created_at, a.updated_at,
                    c.code AS course_code, c.name AS course_name
             FROM assignments a
             JOIN courses c ON c.id = a.course_id
             ORDER BY a.created_at DESC",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// List a course's assignments, earliest due date first.
    pub async fn list_for_course(&self, course_id: &str) -> Result<Vec<AssignmentWithCourse>> {
        let rows = sqlx::query_as::<_, AssignmentWithCourse>(
            "SELECT a.id, a.course_id, a.title, a.description, a.due_date,
                    a.file_url, a.file_name, a.created_at, a.updated_at,
                    c.code AS course_code, c.name AS course_name
             FROM assignments a
             JOIN courses c ON c.id = a.course_id
             WHERE a.course_id = ?
             ORDER BY a.due_date IS NULL, a.due_date ASC",
        )
        .bind(course_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// List upcoming assignments for a student's dashboard.
    ///
    /// Covers every course the student is enrolled in; keeps assignments
    /// that are undated or due at/after `now`, soonest first, capped at
    /// `limit`. Each row carries the student's own submission when one
    /// exists.
    pub async fn list_upcoming_for_student(
        &self,
        student_id: &str,
        now: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<UpcomingAssignment>> {
        let rows = sqlx::query_as::<_, UpcomingAssignment>(
            "SELECT a.id, a.course_id, a.title, a.description, a.due_date,
                    a.file_url, a.file_name, a.created_at, a.updated_at,
                    c.code AS course_code, c.name AS course_name,
                    s.id AS submission_id, s.status AS submission_status,
                    s.grade AS submission_grade
             FROM enrollments e
             JOIN assignments a ON a.course_id = e.course_id
             JOIN courses c ON c.id = e.course_id
             LEFT JOIN submissions s
               ON s.assignment_id = a.id AND s.student_id = e.user_id
             WHERE e.user_id = ? AND (a.due_date IS NULL OR a.due_date >= ?)
             ORDER BY a.due_date IS NULL, a.due_date ASC
             LIMIT ?",
        )
        .bind(student_id)
        .bind(now)
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Update an assignment by ID.
    ///
    /// Only fields set in the update are modified. Returns the updated
    /// assignment, or None if not found.
    pub async fn update(&self, id: &str, update: &AssignmentUpdate) -> Result<Option<Assignment>> {
        if update.is_empty() {
            return self.get_by_id(id).await;
        }

        let mut query: QueryBuilder<sqlx::Sqlite> = QueryBuilder::new("UPDATE assignments SET ");
        let mut separated = query.separated(", ");

        if let Some(ref title) = update.title {
            separated.push("title = ");
            separated.push_bind_unseparated(title);
        }
        if let Some(ref description) = update.description {
            separated.push("description = ");
            separated.push_bind_unseparated(description.clone());
        }
        if let Some(due_date) = update.due_date {
            separated.push("due_date = ");
            separated.push_bind_unseparated(due_date);
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

    /// Delete an assignment by ID. Returns true if a row was removed.
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM assignments WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Count all assignments.
    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM assignments")
            .fetch_one(self.pool)
            .await?;

        Ok(count)
    }
}
