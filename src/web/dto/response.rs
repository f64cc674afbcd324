//! Response DTOs for the Web API.
//!
//! JSON keys are camelCase. User-bearing shapes are sanitized: the
//! password hash never leaves the database layer.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::db::{
    Assignment, AssignmentWithCourse, Course, CourseWithCounts, EnrollmentDetail,
    EnrollmentWithCourse, Role, Submission, SubmissionDetail, SubmissionStatus, UpcomingAssignment,
    User, UserWithCounts,
};

// ============================================================================
// Envelopes
// ============================================================================

/// Plain message response.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// Human-readable outcome.
    pub message: String,
}

impl MessageResponse {
    /// Create a message response.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// `{ "user": ... }` envelope.
#[derive(Debug, Serialize)]
pub struct UserEnvelope {
    /// The user record.
    pub user: UserInfo,
}

/// `{ "message": ..., "user": ... }` envelope for auth outcomes.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    /// Human-readable outcome.
    pub message: String,
    /// The authenticated or registered user.
    pub user: UserInfo,
}

/// `{ "users": [...] }` envelope.
#[derive(Debug, Serialize)]
pub struct UsersEnvelope {
    /// User listing with counts.
    pub users: Vec<UserWithCountsInfo>,
}

/// `{ "course": ... }` envelope.
#[derive(Debug, Serialize)]
pub struct CourseEnvelope<T: Serialize> {
    /// The course record.
    pub course: T,
}

/// `{ "courses": [...] }` envelope.
#[derive(Debug, Serialize)]
pub struct CoursesEnvelope {
    /// Course listing with counts.
    pub courses: Vec<CourseWithCountsInfo>,
}

/// `{ "enrollment": ... }` envelope.
#[derive(Debug, Serialize)]
pub struct EnrollmentEnvelope {
    /// The enrollment record.
    pub enrollment: EnrollmentDetailInfo,
}

/// `{ "enrollments": [...] }` envelope.
#[derive(Debug, Serialize)]
pub struct EnrollmentsEnvelope<T: Serialize> {
    /// Enrollment listing.
    pub enrollments: Vec<T>,
}

/// `{ "assignment": ... }` envelope.
#[derive(Debug, Serialize)]
pub struct AssignmentEnvelope<T: Serialize> {
    /// The assignment record.
    pub assignment: T,
}

/// `{ "assignments": [...] }` envelope.
#[derive(Debug, Serialize)]
pub struct AssignmentsEnvelope {
    /// Assignment listing with course summaries.
    pub assignments: Vec<AssignmentWithCourseInfo>,
}

/// `{ "submission": ... }` envelope.
#[derive(Debug, Serialize)]
pub struct SubmissionEnvelope<T: Serialize> {
    /// The submission record.
    pub submission: T,
}

// ============================================================================
// Users
// ============================================================================

/// Sanitized user record.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    /// User ID.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Role.
    pub role: Role,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserInfo {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Sanitized user record with activity counts.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserWithCountsInfo {
    /// The user record.
    #[serde(flatten)]
    pub user: UserInfo,
    /// Number of enrollments.
    pub enrollment_count: i64,
    /// Number of submissions.
    pub submission_count: i64,
}

impl From<UserWithCounts> for UserWithCountsInfo {
    fn from(row: UserWithCounts) -> Self {
        Self {
            user: row.user.into(),
            enrollment_count: row.enrollment_count,
            submission_count: row.submission_count,
        }
    }
}

/// Compact student reference embedded in other shapes.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentSummary {
    /// User ID.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
}

// ============================================================================
// Courses
// ============================================================================

/// Course record.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseInfo {
    /// Course ID.
    pub id: String,
    /// Course code.
    pub code: String,
    /// Course name.
    pub name: String,
    /// Description.
    pub description: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl From<Course> for CourseInfo {
    fn from(course: Course) -> Self {
        Self {
            id: course.id,
            code: course.code,
            name: course.name,
            description: course.description,
            created_at: course.created_at,
            updated_at: course.updated_at,
        }
    }
}

/// Course record with enrollment/assignment counts.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseWithCountsInfo {
    /// The course record.
    #[serde(flatten)]
    pub course: CourseInfo,
    /// Number of enrollments.
    pub enrollment_count: i64,
    /// Number of assignments.
    pub assignment_count: i64,
}

impl From<CourseWithCounts> for CourseWithCountsInfo {
    fn from(row: CourseWithCounts) -> Self {
        Self {
            course: row.course.into(),
            enrollment_count: row.enrollment_count,
            assignment_count: row.assignment_count,
        }
    }
}

/// Compact course reference embedded in other shapes.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseSummary {
    /// Course ID.
    pub id: String,
    /// Course code.
    pub code: String,
    /// Course name.
    pub name: String,
}

/// Course detail: the course plus its assignments and roster.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseDetail {
    /// The course record.
    #[serde(flatten)]
    pub course: CourseInfo,
    /// Assignments, earliest due date first.
    pub assignments: Vec<AssignmentInfo>,
    /// Roster entries.
    pub enrollments: Vec<RosterEntry>,
}

/// One roster entry: an enrollment with its student.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterEntry {
    /// Enrollment ID.
    pub id: String,
    /// Enrolled student ID.
    pub user_id: String,
    /// Course ID.
    pub course_id: String,
    /// Enrollment timestamp.
    pub created_at: DateTime<Utc>,
    /// The student.
    pub user: StudentSummary,
}

impl From<EnrollmentDetail> for RosterEntry {
    fn from(row: EnrollmentDetail) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id.clone(),
            course_id: row.course_id,
            created_at: row.created_at,
            user: StudentSummary {
                id: row.user_id,
                name: row.user_name,
                email: row.user_email,
            },
        }
    }
}

// ============================================================================
// Enrollments
// ============================================================================

/// Enrollment with its course (student-facing listing).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentInfo {
    /// Enrollment ID.
    pub id: String,
    /// Enrolled student ID.
    pub user_id: String,
    /// Course ID.
    pub course_id: String,
    /// Enrollment timestamp.
    pub created_at: DateTime<Utc>,
    /// The course.
    pub course: CourseSummary,
}

impl From<EnrollmentWithCourse> for EnrollmentInfo {
    fn from(row: EnrollmentWithCourse) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            course_id: row.course_id.clone(),
            created_at: row.created_at,
            course: CourseSummary {
                id: row.course_id,
                code: row.course_code,
                name: row.course_name,
            },
        }
    }
}

/// Enrollment with course and student (admin listing).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentDetailInfo {
    /// Enrollment ID.
    pub id: String,
    /// Enrolled student ID.
    pub user_id: String,
    /// Course ID.
    pub course_id: String,
    /// Enrollment timestamp.
    pub created_at: DateTime<Utc>,
    /// The course.
    pub course: CourseSummary,
    /// The student.
    pub user: StudentSummary,
}

impl From<EnrollmentDetail> for EnrollmentDetailInfo {
    fn from(row: EnrollmentDetail) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id.clone(),
            course_id: row.course_id.clone(),
            created_at: row.created_at,
            course: CourseSummary {
                id: row.course_id,
                code: row.course_code,
                name: row.course_name,
            },
            user: StudentSummary {
                id: row.user_id,
                name: row.user_name,
                email: row.user_email,
            },
        }
    }
}

// ============================================================================
// Assignments
// ============================================================================

/// Assignment record.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentInfo {
    /// Assignment ID.
    pub id: String,
    /// Owning course ID.
    pub course_id: String,
    /// Title.
    pub title: String,
    /// Instructions.
    pub description: Option<String>,
    /// Due date.
    pub due_date: Option<DateTime<Utc>>,
    /// Attached file URL.
    pub file_url: Option<String>,
    /// Attached file name.
    pub file_name: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl From<Assignment> for AssignmentInfo {
    fn from(a: Assignment) -> Self {
        Self {
            id: a.id,
            course_id: a.course_id,
            title: a.title,
            description: a.description,
            due_date: a.due_date,
            file_url: a.file_url,
            file_name: a.file_name,
            created_at: a.created_at,
            updated_at: a.updated_at,
        }
    }
}

/// Assignment with its course summary.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentWithCourseInfo {
    /// The assignment record.
    #[serde(flatten)]
    pub assignment: AssignmentInfo,
    /// The course.
    pub course: CourseSummary,
}

impl From<AssignmentWithCourse> for AssignmentWithCourseInfo {
    fn from(row: AssignmentWithCourse) -> Self {
        let course = CourseSummary {
            id: row.assignment.course_id.clone(),
            code: row.course_code,
            name: row.course_name,
        };
        Self {
            assignment: row.assignment.into(),
            course,
        }
    }
}

/// Assignment detail: the assignment, its course and scoped submissions.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentDetail {
    /// The assignment record.
    #[serde(flatten)]
    pub assignment: AssignmentInfo,
    /// The course.
    pub course: CourseSummary,
    /// Submissions visible to the requester.
    pub submissions: Vec<SubmissionDetailInfo>,
}

/// Compact assignment reference embedded in submission shapes.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentSummary {
    /// Assignment ID.
    pub id: String,
    /// Title.
    pub title: String,
    /// Due date.
    pub due_date: Option<DateTime<Utc>>,
    /// The course.
    pub course: CourseSummary,
}

// ============================================================================
// Submissions
// ============================================================================

/// Submission record.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionInfo {
    /// Submission ID.
    pub id: String,
    /// Assignment submitted against.
    pub assignment_id: String,
    /// Submitting student ID.
    pub student_id: String,
    /// Answer text.
    pub content: Option<String>,
    /// Attached file URL.
    pub file_url: Option<String>,
    /// Attached file name.
    pub file_name: Option<String>,
    /// Lifecycle status.
    pub status: SubmissionStatus,
    /// Grade, present once graded.
    pub grade: Option<i64>,
    /// Feedback, present once graded.
    pub feedback: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl From<Submission> for SubmissionInfo {
    fn from(s: Submission) -> Self {
        Self {
            id: s.id,
            assignment_id: s.assignment_id,
            student_id: s.student_id,
            content: s.content,
            file_url: s.file_url,
            file_name: s.file_name,
            status: s.status,
            grade: s.grade,
            feedback: s.feedback,
            created_at: s.created_at,
            updated_at: s.updated_at,
        }
    }
}

/// Submission with student, assignment and course context.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionDetailInfo {
    /// The submission record.
    #[serde(flatten)]
    pub submission: SubmissionInfo,
    /// The submitting student.
    pub student: StudentSummary,
    /// The assignment, with its course.
    pub assignment: AssignmentSummary,
}

impl From<SubmissionDetail> for SubmissionDetailInfo {
    fn from(row: SubmissionDetail) -> Self {
        let student = StudentSummary {
            id: row.submission.student_id.clone(),
            name: row.student_name,
            email: row.student_email,
        };
        let assignment = AssignmentSummary {
            id: row.submission.assignment_id.clone(),
            title: row.assignment_title,
            due_date: row.assignment_due_date,
            course: CourseSummary {
                id: row.course_id,
                code: row.course_code,
                name: row.course_name,
            },
        };
        Self {
            submission: row.submission.into(),
            student,
            assignment,
        }
    }
}

// ============================================================================
// Dashboard
// ============================================================================

/// The student's own submission, as shown on an upcoming assignment.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionBrief {
    /// Submission ID.
    pub id: String,
    /// Lifecycle status.
    pub status: SubmissionStatus,
    /// Grade, present once graded.
    pub grade: Option<i64>,
}

/// Upcoming assignment row for the student dashboard.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingAssignmentInfo {
    /// The assignment record.
    #[serde(flatten)]
    pub assignment: AssignmentInfo,
    /// The course.
    pub course: CourseSummary,
    /// The student's own submission, if any.
    pub submission: Option<SubmissionBrief>,
}

impl From<UpcomingAssignment> for UpcomingAssignmentInfo {
    fn from(row: UpcomingAssignment) -> Self {
        let course = CourseSummary {
            id: row.assignment.course_id.clone(),
            code: row.course_code,
            name: row.course_name,
        };
        let submission = match (row.submission_id, row.submission_status) {
            (Some(id), Some(status)) => Some(SubmissionBrief {
                id,
                status,
                grade: row.submission_grade,
            }),
            _ => None,
        };
        Self {
            assignment: row.assignment.into(),
            course,
            submission,
        }
    }
}

/// Student dashboard aggregate.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentDashboard {
    /// The student's enrollments.
    pub enrollments: Vec<EnrollmentInfo>,
    /// Upcoming assignments across enrolled courses.
    pub upcoming_assignments: Vec<UpcomingAssignmentInfo>,
    /// The student's most recently touched submissions.
    pub recent_submissions: Vec<SubmissionDetailInfo>,
}

/// Admin dashboard counters.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    /// Number of student accounts.
    pub total_students: i64,
    /// Number of courses.
    pub total_courses: i64,
    /// Number of assignments.
    pub total_assignments: i64,
    /// Submissions awaiting grading.
    pub pending_submissions: i64,
}

/// Admin dashboard aggregate.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminDashboard {
    /// Portal-wide counters.
    pub stats: AdminStats,
    /// Most recent ungraded submissions.
    pub recent_submissions: Vec<SubmissionDetailInfo>,
}

// ============================================================================
// Upload
// ============================================================================

/// Upload outcome.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    /// Always true on success.
    pub success: bool,
    /// Public URL of the stored file.
    pub file_url: String,
    /// Original file name.
    pub file_name: String,
    /// Size in bytes.
    pub file_size: u64,
    /// Declared MIME type.
    pub file_type: String,
}
