//! Enrollment model and repository for Aula.
//!
//! An enrollment links a student to a course. The (user_id, course_id)
//! pair is unique; a duplicate insert surfaces as `AulaError::Conflict`.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{AulaError, Result};

/// Enrollment entity.
#[derive(Debug, Clone, FromRow)]
pub struct Enrollment {
    /// Unique enrollment ID (UUID).
    pub id: String,
    /// Enrolled student.
    pub user_id: String,
    /// Course enrolled into.
    pub course_id: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Enrollment joined with its course.
#[derive(Debug, Clone, FromRow)]
pub struct EnrollmentWithCourse {
    /// Unique enrollment ID.
    pub id: String,
    /// Enrolled student.
    pub user_id: String,
    /// Course enrolled into.
    pub course_id: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Course code.
    pub course_code: String,
    /// Course name.
    pub course_name: String,
    /// Course description.
    pub course_description: Option<String>,
}

/// Enrollment joined with course and student summaries (admin listings).
#[derive(Debug, Clone, FromRow)]
pub struct EnrollmentDetail {
    /// Unique enrollment ID.
    pub id: String,
    /// Enrolled student.
    pub user_id: String,
    /// Course enrolled into.
    pub course_id: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Course code.
    pub course_code: String,
    /// Course name.
    pub course_name: String,
    /// Course description.
    pub course_description: Option<String>,
    /// Student display name.
    pub user_name: String,
    /// Student email.
    pub user_email: String,
}

/// Repository for enrollment operations.
pub struct EnrollmentRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> EnrollmentRepository<'a> {
    /// Create a new EnrollmentRepository with the given pool reference.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Enroll a student in a course.
    ///
    /// A duplicate (user, course) pair surfaces as `AulaError::Conflict`.
    pub async fn create(&self, user_id: &str, course_id: &str) -> Result<Enrollment> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO enrollments (id, user_id, course_id, created_at)
             VALUES (?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(user_id)
        .bind(course_id)
        .bind(now)
        .execute(self.pool)
        .await?;

        self.get_by_id(&id)
            .await?
            .ok_or_else(|| AulaError::NotFound("enrollment".to_string()))
    }

    /// Get an enrollment by ID.
    pub async fn get_by_id(&self, id: &str) -> Result<Option<Enrollment>> {
        let result = sqlx::query_as::<_, Enrollment>(
            "SELECT id, user_id, course_id, created_at FROM enrollments WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(result)
    }

    /// Look up an enrollment by its unique (user, course) pair.
    ///
    /// This is the ownership check used by assignment- and
    /// submission-scoped operations.
    pub async fn find_by_user_and_course(
        &self,
        user_id: &str,
        course_id: &str,
    ) -> Result<Option<Enrollment>> {
        let result = sqlx::query_as::<_, Enrollment>(
            "SELECT id, user_id, course_id, created_at
             FROM enrollments WHERE user_id = ? AND course_id = ?",
        )
        .bind(user_id)
        .bind(course_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(result)
    }

    /// List a student's enrollments with their courses.
    pub async fn list_for_user(&self, user_id: &str) -> Result<Vec<EnrollmentWithCourse>> {
        let rows = sqlx::query_as::<_, EnrollmentWithCourse>(
            "SELECT e.id, e.user_id, e.course_id, e.created_at,
                    c.code AS course_code, c.name AS course_name,
                    c.description AS course_description
             FROM enrollments e
             JOIN courses c ON c.id = e.course_id
             WHERE e.user_id = ?
             ORDER BY e.created_at DESC",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// List all enrollments with course and student summaries, newest
    /// first. An optional user narrows the listing.
    pub async fn list_all(&self, user_id: Option<&str>) -> Result<Vec<EnrollmentDetail>> {
        let base = "SELECT e.id, e.user_id, e.course_id, e.created_at,
                    c.code AS course_code, c.name AS course_name,
                    c.description AS course_description,
                    u.name AS user_name, u.email AS user_email
             FROM enrollments e
             JOIN courses c ON c.id = e.course_id
             JOIN users u ON u.id = e.user_id";

        let rows = if let Some(user_id) = user_id {
            sqlx::query_as::<_, EnrollmentDetail>(&format!(
                "{base} WHERE e.user_id = ? ORDER BY e.created_at DESC"
            ))
            .bind(user_id)
            .fetch_all(self.pool)
            .await?
        } else {
            sqlx::query_as::<_, EnrollmentDetail>(&format!("{base} ORDER BY e.created_at DESC"))
                .fetch_all(self.pool)
                .await?
        };

        Ok(rows)
    }

    /// List course roster entries (enrollments with student summaries).
    pub async fn list_for_course(&self, course_id: &str) -> Result<Vec<EnrollmentDetail>> {
        let rows = sqlx::query_as::<_, EnrollmentDetail>(
            "SELECT e.id, e.user_id, e.course_id, e.created_at,
                    c.code AS course_code, c.name AS course_name,
                    c.description AS course_description,
                    u.name AS user_name, u.email AS user_email
             FROM enrollments e
             JOIN courses c ON c.id = e.course_id
             JOIN users u ON u.id = e.user_id
             WHERE e.course_id = ?
             ORDER BY u.name ASC",
        )
        .bind(course_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Delete an enrollment by ID. Returns true if a row was removed.
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM enrollments WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{CourseRepository, Database, NewCourse, NewUser, UserRepository};

    async fn seed(db: &Database) -> (String, String) {
        let user = UserRepository::new(db.pool())
            .create(&NewUser::new("Ada", "ada@example.com", "h"))
            .await
            .unwrap();
        let course = CourseRepository::new(db.pool())
            .create(&NewCourse::new("CS101", "Intro"))
            .await
            .unwrap();
        (user.id, course.id)
    }

    #[tokio::test]
    async fn test_create_and_find_enrollment() {
        let db = Database::open_in_memory().await.unwrap();
        let (user_id, course_id) = seed(&db).await;
        let repo = EnrollmentRepository::new(db.pool());

        let enrollment = repo.create(&user_id, &course_id).await.unwrap();
        assert_eq!(enrollment.user_id, user_id);

        let found = repo
            .find_by_user_and_course(&user_id, &course_id)
            .await
            .unwrap();
        assert!(found.is_some());

        let missing = repo
            .find_by_user_and_course(&user_id, "no-such-course")
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_enrollment_is_conflict() {
        let db = Database::open_in_memory().await.unwrap();
        let (user_id, course_id) = seed(&db).await;
        let repo = EnrollmentRepository::new(db.pool());

        repo.create(&user_id, &course_id).await.unwrap();
        let result = repo.create(&user_id, &course_id).await;

        assert!(matches!(result, Err(AulaError::Conflict(_))));

        // Only one row persists
        let list = repo.list_for_user(&user_id).await.unwrap();
        assert_eq!(list.len(), 1);
    }

    #[tokio::test]
    async fn test_list_for_user_includes_course() {
        let db = Database::open_in_memory().await.unwrap();
        let (user_id, course_id) = seed(&db).await;
        let repo = EnrollmentRepository::new(db.pool());

        repo.create(&user_id, &course_id).await.unwrap();

        let list = repo.list_for_user(&user_id).await.unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].course_code, "CS101");
        assert_eq!(list[0].course_name, "Intro");
    }

    #[tokio::test]
    async fn test_list_all_with_filter() {
        let db = Database::open_in_memory().await.unwrap();
        let (user_id, course_id) = seed(&db).await;

        let other = UserRepository::new(db.pool())
            .create(&NewUser::new("Grace", "grace@example.com", "h"))
            .await
            .unwrap();

        let repo = EnrollmentRepository::new(db.pool());
        repo.create(&user_id, &course_id).await.unwrap();
        repo.create(&other.id, &course_id).await.unwrap();

        let all = repo.list_all(None).await.unwrap();
        assert_eq!(all.len(), 2);
        assert!(all.iter().all(|e| e.course_code == "CS101"));

        let filtered = repo.list_all(Some(&user_id)).await.unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].user_email, "ada@example.com");
    }

    #[tokio::test]
    async fn test_roster_for_course() {
        let db = Database::open_in_memory().await.unwrap();
        let (user_id, course_id) = seed(&db).await;
        let repo = EnrollmentRepository::new(db.pool());

        repo.create(&user_id, &course_id).await.unwrap();

        let roster = repo.list_for_course(&course_id).await.unwrap();
        assert_eq!(roster.len(), 1);
        assert_eq!(roster[0].user_name, "Ada");
    }

    #[tokio::test]
    async fn test_delete_enrollment() {
        let db = Database::open_in_memory().await.unwrap();
        let (user_id, course_id) = seed(&db).await;
        let repo = EnrollmentRepository::new(db.pool());

        let enrollment = repo.create(&user_id, &course_id).await.unwrap();

        assert!(repo.delete(&enrollment.id).await.unwrap());
        assert!(!repo.delete(&enrollment.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_cascade_on_course_delete() {
        let db = Database::open_in_memory().await.unwrap();
        let (user_id, course_id) = seed(&db).await;
        let repo = EnrollmentRepository::new(db.pool());

        repo.create(&user_id, &course_id).await.unwrap();

        CourseRepository::new(db.pool())
            .delete(&course_id)
            .await
            .unwrap();

        let list = repo.list_for_user(&user_id).await.unwrap();
        assert!(list.is_empty());
    }
}
