//! Submission model and repository for Aula.
//!
//! A submission belongs to one (assignment, student) pair; the pair is
//! unique, enforced by the table constraint. Status moves PENDING →
//! SUBMITTED → GRADED; grading may be repeated.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{AulaError, Result};

/// Submission lifecycle status.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum SubmissionStatus {
    /// Created but not yet handed in.
    #[default]
    Pending,
    /// Handed in, awaiting grading.
    Submitted,
    /// Graded; carries grade and feedback.
    Graded,
}

impl SubmissionStatus {
    /// Convert status to its database/JSON string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionStatus::Pending => "PENDING",
            SubmissionStatus::Submitted => "SUBMITTED",
            SubmissionStatus::Graded => "GRADED",
        }
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SubmissionStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "PENDING" => Ok(SubmissionStatus::Pending),
            "SUBMITTED" => Ok(SubmissionStatus::Submitted),
            "GRADED" => Ok(SubmissionStatus::Graded),
            _ => Err(format!("unknown submission status: {s}")),
        }
    }
}

/// Submission entity.
#[derive(Debug, Clone, FromRow)]
pub struct Submission {
    /// Unique submission ID (UUID).
    pub id: String,
    /// Assignment submitted against.
    pub assignment_id: String,
    /// Submitting student.
    pub student_id: String,
    /// Free-form answer text.
    pub content: Option<String>,
    /// Optional attached file URL.
    pub file_url: Option<String>,
    /// Optional attached file name.
    pub file_name: Option<String>,
    /// Lifecycle status.
    pub status: SubmissionStatus,
    /// Grade (0-100), present once graded.
    pub grade: Option<i64>,
    /// Grader feedback, present once graded.
    pub feedback: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Submission joined with student, assignment and course summaries.
#[derive(Debug, Clone, FromRow)]
pub struct SubmissionDetail {
    /// The submission record.
    #[sqlx(flatten)]
    pub submission: Submission,
    /// Student display name.
    pub student_name: String,
    /// Student email.
    pub student_email: String,
    /// Assignment title.
    pub assignment_title: String,
    /// Assignment due date.
    pub assignment_due_date: Option<DateTime<Utc>>,
    /// Course the assignment belongs to.
    pub course_id: String,
    /// Course code.
    pub course_code: String,
    /// Course name.
    pub course_name: String,
}

/// Data for creating a new submission.
#[derive(Debug, Clone)]
pub struct NewSubmission {
    /// Assignment submitted against.
    pub assignment_id: String,
    /// Submitting student.
    pub student_id: String,
    /// Free-form answer text.
    pub content: Option<String>,
    /// Optional attached file URL.
    pub file_url: Option<String>,
    /// Optional attached file name.
    pub file_name: Option<String>,
}

impl NewSubmission {
    /// Create a new submission for an (assignment, student) pair.
    pub fn new(assignment_id: impl Into<String>, student_id: impl Into<String>) -> Self {
        Self {
            assignment_id: assignment_id.into(),
            student_id: student_id.into(),
            content: None,
            file_url: None,
            file_name: None,
        }
    }

    /// Set the answer text.
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Set the attached file.
    pub fn with_file(mut self, url: impl Into<String>, name: impl Into<String>) -> Self {
        self.file_url = Some(url.into());
        self.file_name = Some(name.into());
        self
    }
}

/// Replacement content for an existing submission (the upsert's update arm).
#[derive(Debug, Clone, Default)]
pub struct SubmissionUpdate {
    /// New answer text.
    pub content: Option<String>,
    /// New attached file URL.
    pub file_url: Option<String>,
    /// New attached file name.
    pub file_name: Option<String>,
}

/// Repository for submission operations.
pub struct SubmissionRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> SubmissionRepository<'a> {
    /// Create a new SubmissionRepository with the given pool reference.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a submission in SUBMITTED status.
    ///
    /// A second submission for the same (assignment, student) pair
    /// surfaces as `AulaError::Conflict`; a lost upsert race lands here.
    pub async fn create(&self, new_submission: &NewSubmission) -> Result<Submission> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO submissions
               (id, assignment_id, student_id, content, file_url, file_name, status,
                created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(&new_submission.assignment_id)
        .bind(&new_submission.student_id)
        .bind(&new_submission.content)
        .bind(&new_submission.file_url)
        .bind(&new_submission.file_name)
        .bind(SubmissionStatus::Submitted)
        .bind(now)
        .bind(now)
        .execute(self.pool)
        .await?;

        self.get_by_id(&id)
            .await?
            .ok_or_else(|| AulaError::NotFound("submission".to_string()))
    }

    /// Get a submission by ID.
    pub async fn get_by_id(&self, id: &str) -> Result<Option<Submission>> {
        let result = sqlx::query_as::<_, Submission>(
            "SELECT id, assignment_id, student_id, content, file_url, file_name,
                    status, grade, feedback, created_at, updated_at
             FROM submissions WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(result)
    }

    /// Look up a submission by its unique (assignment, student) pair.
    pub async fn find_by_assignment_and_student(
        &self,
        assignment_id: &str,
        student_id: &str,
    ) -> Result<Option<Submission>> {
        let result = sqlx::query_as::<_, Submission>(
            "SELECT id, assignment_id, student_id, content, file_url, file_name,
                    status, grade, feedback, created_at, updated_at
             FROM submissions WHERE assignment_id = ? AND student_id = ?",
        )
        .bind(assignment_id)
        .bind(student_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(result)
    }

    /// Replace the content of an existing submission and mark it SUBMITTED.
    ///
    /// This is the update arm of the create-or-update operation. Returns
    /// the updated submission, or None if it vanished.
    pub async fn resubmit(&self, id: &str, update: &SubmissionUpdate) -> Result<Option<Submission>> {
        let result = sqlx::query(
            "UPDATE submissions
             SET content = ?, file_url = ?, file_name = ?, status = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(&update.content)
        .bind(&update.file_url)
        .bind(&update.file_name)
        .bind(SubmissionStatus::Submitted)
        .bind(Utc::now())
        .bind(id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get_by_id(id).await
    }

    /// Grade a submission: store grade and feedback and mark it GRADED.
    ///
    /// Regrading is allowed; there is no lock against concurrent
    /// re-grading. Returns None if the submission is absent.
    pub async fn grade(
        &self,
        id: &str,
        grade: i64,
        feedback: Option<&str>,
    ) -> Result<Option<Submission>> {
        let result = sqlx::query(
            "UPDATE submissions
             SET grade = ?, feedback = ?, status = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(grade)
        .bind(feedback)
        .bind(SubmissionStatus::Graded)
        .bind(Utc::now())
        .bind(id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get_by_id(id).await
    }

    /// Get a submission by ID with student, assignment and course context.
    pub async fn get_detail_by_id(&self, id: &str) -> Result<Option<SubmissionDetail>> {
        let result = sqlx::query_as::<_, SubmissionDetail>(
            "SELECT s.id, s.assignment_id, s.student_id, s.content, s.file_url,
                    s.file_name, s.status, s.grade, s.feedback, s.created_at, s.updated_at,
                    u.name AS student_name, u.email AS student_email,
                    a.title AS assignment_title, a.due_date AS assignment_due_date,
                    c.id AS course_id, c.code AS course_code, c.name AS course_name
             FROM submissions s
             JOIN users u ON u.id = s.student_id
             JOIN assignments a ON a.id = s.assignment_id
             JOIN courses c ON c.id = a.course_id
             WHERE s.id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(result)
    }

    /// List submissions for an assignment, optionally narrowed to one
    /// student (the student-facing view).
    pub async fn list_for_assignment(
        &self,
        assignment_id: &str,
        student_id: Option<&str>,
    ) -> Result<Vec<SubmissionDetail>> {
        let base = "SELECT s.id, s.assignment_id, s.student_id, s.content, s.file_url,
                    s.file_name, s.status, s.grade, s.feedback, s.created_at, s.updated_at,
                    u.name AS student_name, u.email AS student_email,
                    a.title AS assignment_title, a.due_date AS assignment_due_date,
                    c.id AS course_id, c.code AS course_code, c.name AS course_name
             FROM submissions s
             JOIN users u ON u.id = s.student_id
             JOIN assignments a ON a.id = s.assignment_id
             JOIN courses c ON c.id = a.course_id
             WHERE s.assignment_id = ?";

        let rows = if let Some(student_id) = student_id {
            sqlx::query_as::<_, SubmissionDetail>(&format!(
                "{base} AND s.student_id = ? ORDER BY s.updated_at DESC"
            ))
            .bind(assignment_id)
            .bind(student_id)
            .fetch_all(self.pool)
            .await?
        } else {
            sqlx::query_as::<_, SubmissionDetail>(&format!(
                "{base} ORDER BY s.updated_at DESC"
            ))
            .bind(assignment_id)
            .fetch_all(self.pool)
            .await?
        };

        Ok(rows)
    }

    /// List a student's most recently touched submissions.
    pub async fn list_recent_for_student(
        &self,
        student_id: &str,
        limit: i64,
    ) -> Result<Vec<SubmissionDetail>> {
        let rows = sqlx::query_as::<_, SubmissionDetail>(
            "SELECT s.id, s.assignment_id, s.student_id, s.content, s.file_url,
                    s.file_name, s.status, s.grade, s.feedback, s.created_at, s.updated_at,
                    u.name AS student_name, u.email AS student_email,
                    a.title AS assignment_title, a.due_date AS assignment_due_date,
                    c.id AS course_id, c.code AS course_code, c.name AS course_name
             FROM submissions s
             JOIN users u ON u.id = s.student_id
             JOIN assignments a ON a.id = s.assignment_id
             JOIN courses c ON c.id = a.course_id
             WHERE s.student_id = ?
             ORDER BY s.updated_at DESC
             LIMIT ?",
        )
        .bind(student_id)
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// List the most recent submissions in the given status (admin
    /// dashboard feed).
    pub async fn list_recent_by_status(
        &self,
        status: SubmissionStatus,
        limit: i64,
    ) -> Result<Vec<SubmissionDetail>> {
        let rows = sqlx::query_as::<_, SubmissionDetail>(
            "SELECT s.id, s.assignment_id, s.student_id, s.content, s.file_url,
                    s.file_name, s.status, s.grade, s.feedback, s.created_at, s.updated_at,
                    u.name AS student_name, u.email AS student_email,
                    a.title AS assignment_title, a.due_date AS assignment_due_date,
                    c.id AS course_id, c.code AS course_code, c.name AS course_name
             FROM submissions s
             JOIN users u ON u.id = s.student_id
             JOIN assignments a ON a.id = s.assignment_id
             JOIN courses c ON c.id = a.course_id
             WHERE s.status = ?
             ORDER BY s.created_at DESC
             LIMIT ?",
        )
        .bind(status)
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Count submissions in the given status.
    pub async fn count_by_status(&self, status: SubmissionStatus) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM submissions WHERE status = ?")
            .bind(status)
            .fetch_one(self.pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{
        AssignmentRepository, CourseRepository, Database, EnrollmentRepository, NewAssignment,
        NewCourse, NewUser, UserRepository,
    };

    struct Fixture {
        student_id: String,
        assignment_id: String,
    }

    async fn seed(db: &Database) -> Fixture {
        let student = UserRepository::new(db.pool())
            .create(&NewUser::new("Ada", "ada@example.com", "h"))
            .await
            .unwrap();
        let course = CourseRepository::new(db.pool())
            .create(&NewCourse::new("CS101", "Intro"))
            .await
            .unwrap();
        EnrollmentRepository::new(db.pool())
            .create(&student.id, &course.id)
            .await
            .unwrap();
        let assignment = AssignmentRepository::new(db.pool())
            .create(&NewAssignment::new(&course.id, "Homework 1"))
            .await
            .unwrap();

        Fixture {
            student_id: student.id,
            assignment_id: assignment.id,
        }
    }

    #[test]
    fn test_status_round_trip() {
        assert_eq!(SubmissionStatus::Pending.as_str(), "PENDING");
        assert_eq!(
            SubmissionStatus::from_str("graded").unwrap(),
            SubmissionStatus::Graded
        );
        assert!(SubmissionStatus::from_str("bogus").is_err());
    }

    #[test]
    fn test_status_serde() {
        assert_eq!(
            serde_json::to_string(&SubmissionStatus::Submitted).unwrap(),
            "\"SUBMITTED\""
        );
    }

    #[tokio::test]
    async fn test_create_submission_is_submitted() {
        let db = Database::open_in_memory().await.unwrap();
        let fx = seed(&db).await;
        let repo = SubmissionRepository::new(db.pool());

        let submission = repo
            .create(
                &NewSubmission::new(&fx.assignment_id, &fx.student_id).with_content("My answer"),
            )
            .await
            .unwrap();

        assert_eq!(submission.status, SubmissionStatus::Submitted);
        assert_eq!(submission.content.as_deref(), Some("My answer"));
        assert!(submission.grade.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_pair_is_conflict() {
        let db = Database::open_in_memory().await.unwrap();
        let fx = seed(&db).await;
        let repo = SubmissionRepository::new(db.pool());

        repo.create(&NewSubmission::new(&fx.assignment_id, &fx.student_id))
            .await
            .unwrap();

        let result = repo
            .create(&NewSubmission::new(&fx.assignment_id, &fx.student_id))
            .await;
        assert!(matches!(result, Err(AulaError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_resubmit_replaces_content() {
        let db = Database::open_in_memory().await.unwrap();
        let fx = seed(&db).await;
        let repo = SubmissionRepository::new(db.pool());

        let first = repo
            .create(&NewSubmission::new(&fx.assignment_id, &fx.student_id).with_content("v1"))
            .await
            .unwrap();

        let update = SubmissionUpdate {
            content: Some("v2".to_string()),
            ..Default::default()
        };
        let second = repo.resubmit(&first.id, &update).await.unwrap().unwrap();

        assert_eq!(second.id, first.id);
        assert_eq!(second.content.as_deref(), Some("v2"));
        assert_eq!(second.status, SubmissionStatus::Submitted);

        // Exactly one row for the pair
        let found = repo
            .find_by_assignment_and_student(&fx.assignment_id, &fx.student_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, first.id);
    }

    #[tokio::test]
    async fn test_grade_submission() {
        let db = Database::open_in_memory().await.unwrap();
        let fx = seed(&db).await;
        let repo = SubmissionRepository::new(db.pool());

        let submission = repo
            .create(&NewSubmission::new(&fx.assignment_id, &fx.student_id))
            .await
            .unwrap();

        let graded = repo
            .grade(&submission.id, 92, Some("Nice work"))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(graded.status, SubmissionStatus::Graded);
        assert_eq!(graded.grade, Some(92));
        assert_eq!(graded.feedback.as_deref(), Some("Nice work"));

        // Regrading overwrites
        let regraded = repo.grade(&submission.id, 70, None).await.unwrap().unwrap();
        assert_eq!(regraded.grade, Some(70));
        assert!(regraded.feedback.is_none());
    }

    #[tokio::test]
    async fn test_grade_missing_submission() {
        let db = Database::open_in_memory().await.unwrap();
        seed(&db).await;
        let repo = SubmissionRepository::new(db.pool());

        let result = repo.grade("no-such-id", 50, None).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_list_for_assignment_scoping() {
        let db = Database::open_in_memory().await.unwrap();
        let fx = seed(&db).await;

        let other = UserRepository::new(db.pool())
            .create(&NewUser::new("Grace", "grace@example.com", "h"))
            .await
            .unwrap();

        let repo = SubmissionRepository::new(db.pool());
        repo.create(&NewSubmission::new(&fx.assignment_id, &fx.student_id))
            .await
            .unwrap();
        repo.create(&NewSubmission::new(&fx.assignment_id, &other.id))
            .await
            .unwrap();

        let all = repo.list_for_assignment(&fx.assignment_id, None).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].course_code, "CS101");

        let own = repo
            .list_for_assignment(&fx.assignment_id, Some(&fx.student_id))
            .await
            .unwrap();
        assert_eq!(own.len(), 1);
        assert_eq!(own[0].student_name, "Ada");
    }

    #[tokio::test]
    async fn test_recent_and_counts() {
        let db = Database::open_in_memory().await.unwrap();
        let fx = seed(&db).await;
        let repo = SubmissionRepository::new(db.pool());

        let submission = repo
            .create(&NewSubmission::new(&fx.assignment_id, &fx.student_id))
            .await
            .unwrap();

        let recent = repo
            .list_recent_for_student(&fx.student_id, 5)
            .await
            .unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].assignment_title, "Homework 1");

        assert_eq!(
            repo.count_by_status(SubmissionStatus::Submitted)
                .await
                .unwrap(),
            1
        );

        let pending_feed = repo
            .list_recent_by_status(SubmissionStatus::Submitted, 10)
            .await
            .unwrap();
        assert_eq!(pending_feed.len(), 1);

        repo.grade(&submission.id, 88, None).await.unwrap();
        assert_eq!(
            repo.count_by_status(SubmissionStatus::Submitted)
                .await
                .unwrap(),
            0
        );
    }
}
