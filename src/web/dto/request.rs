//! Request DTOs for the Web API.
//!
//! Each mutating operation has a schema here; constraints run via the
//! `ValidatedJson` extractor before any persistence call.

use serde::Deserialize;
use validator::Validate;

use super::validation::{strong_password, valid_uuid};
use crate::db::Role;

/// Self-service registration request.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Display name.
    #[validate(length(min = 2, max = 100, message = "Name must be at least 2 characters"))]
    pub name: String,
    /// Email address.
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    /// Password (8-128 chars, upper + lower + digit).
    #[validate(custom(function = strong_password))]
    pub password: String,
}

/// Login request.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address.
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Admin request to create a user with an explicit role.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    /// Display name.
    #[validate(length(min = 2, max = 100, message = "Name must be at least 2 characters"))]
    pub name: String,
    /// Email address.
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    /// Password (8-128 chars, upper + lower + digit).
    #[validate(custom(function = strong_password))]
    pub password: String,
    /// Role (defaults to STUDENT).
    #[serde(default)]
    pub role: Option<Role>,
}

/// Admin partial update of a user.
#[derive(Debug, Deserialize, Validate)]
pub struct UserUpdateRequest {
    /// New display name.
    #[validate(length(min = 2, max = 100, message = "Name must be at least 2 characters"))]
    pub name: Option<String>,
    /// New email address.
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    /// New role.
    #[serde(default)]
    pub role: Option<Role>,
}

/// Course creation request.
#[derive(Debug, Deserialize, Validate)]
pub struct CourseCreateRequest {
    /// Course code, e.g. "CS101".
    #[validate(length(min = 2, max = 20, message = "Code must be 2-20 characters"))]
    pub code: String,
    /// Course name.
    #[validate(length(min = 3, max = 200, message = "Name must be 3-200 characters"))]
    pub name: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
}

/// Course partial update request.
#[derive(Debug, Deserialize, Validate)]
pub struct CourseUpdateRequest {
    /// New course code.
    #[validate(length(min = 2, max = 20, message = "Code must be 2-20 characters"))]
    pub code: Option<String>,
    /// New course name.
    #[validate(length(min = 3, max = 200, message = "Name must be 3-200 characters"))]
    pub name: Option<String>,
    /// New description.
    #[serde(default)]
    pub description: Option<String>,
}

/// Assignment creation request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentCreateRequest {
    /// Owning course.
    #[validate(custom(function = valid_uuid))]
    pub course_id: String,
    /// Assignment title.
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,
    /// Optional instructions.
    #[serde(default)]
    pub description: Option<String>,
    /// Optional due date (RFC 3339).
    #[serde(default)]
    pub due_date: Option<String>,
    /// Optional attached file URL (from a prior upload).
    #[serde(default)]
    pub file_url: Option<String>,
    /// Optional attached file name.
    #[serde(default)]
    pub file_name: Option<String>,
}

/// Assignment partial update request.
///
/// An empty-string due date clears the existing one.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentUpdateRequest {
    /// New title.
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,
    /// New description.
    #[serde(default)]
    pub description: Option<String>,
    /// New due date (RFC 3339, empty string clears).
    #[serde(default)]
    pub due_date: Option<String>,
}

/// Submission create-or-update request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRequest {
    /// Assignment submitted against.
    #[validate(custom(function = valid_uuid))]
    pub assignment_id: String,
    /// Free-form answer text.
    #[serde(default)]
    pub content: Option<String>,
    /// Optional attached file URL (from a prior upload).
    #[serde(default)]
    pub file_url: Option<String>,
    /// Optional attached file name.
    #[serde(default)]
    pub file_name: Option<String>,
}

/// Grading request.
#[derive(Debug, Deserialize, Validate)]
pub struct GradeRequest {
    /// Grade on the 0-100 scale.
    #[validate(range(min = 0, max = 100, message = "Grade must be between 0 and 100"))]
    pub grade: i64,
    /// Optional feedback for the student.
    #[serde(default)]
    pub feedback: Option<String>,
}

/// Enrollment creation request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentRequest {
    /// Student to enroll.
    #[validate(custom(function = valid_uuid))]
    pub user_id: String,
    /// Course to enroll into.
    #[validate(custom(function = valid_uuid))]
    pub course_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_register_request_validation() {
        let valid = RegisterRequest {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            password: "Passw0rd".to_string(),
        };
        assert!(valid.validate().is_ok());

        let bad_email = RegisterRequest {
            email: "not-an-email".to_string(),
            ..valid_register()
        };
        assert!(bad_email.validate().is_err());

        let weak_password = RegisterRequest {
            password: "password".to_string(),
            ..valid_register()
        };
        assert!(weak_password.validate().is_err());

        let short_name = RegisterRequest {
            name: "A".to_string(),
            ..valid_register()
        };
        assert!(short_name.validate().is_err());
    }

    fn valid_register() -> RegisterRequest {
        RegisterRequest {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            password: "Passw0rd".to_string(),
        }
    }

    #[test]
    fn test_grade_request_bounds() {
        let ok = GradeRequest {
            grade: 100,
            feedback: None,
        };
        assert!(ok.validate().is_ok());

        let low = GradeRequest {
            grade: -1,
            feedback: None,
        };
        assert!(low.validate().is_err());

        let high = GradeRequest {
            grade: 101,
            feedback: None,
        };
        assert!(high.validate().is_err());
    }

    #[test]
    fn test_enrollment_request_uuid_check() {
        let ok = EnrollmentRequest {
            user_id: "550e8400-e29b-41d4-a716-446655440000".to_string(),
            course_id: "650e8400-e29b-41d4-a716-446655440000".to_string(),
        };
        assert!(ok.validate().is_ok());

        let bad = EnrollmentRequest {
            user_id: "nope".to_string(),
            course_id: "650e8400-e29b-41d4-a716-446655440000".to_string(),
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_course_request_bounds() {
        let ok = CourseCreateRequest {
            code: "CS101".to_string(),
            name: "Intro to CS".to_string(),
            description: None,
        };
        assert!(ok.validate().is_ok());

        let short_code = CourseCreateRequest {
            code: "C".to_string(),
            name: "Intro to CS".to_string(),
            description: None,
        };
        assert!(short_code.validate().is_err());
    }

    #[test]
    fn test_update_requests_allow_absent_fields() {
        let empty = UserUpdateRequest {
            name: None,
            email: None,
            role: None,
        };
        assert!(empty.validate().is_ok());

        let partial = CourseUpdateRequest {
            code: None,
            name: Some("Renamed Course".to_string()),
            description: None,
        };
        assert!(partial.validate().is_ok());
    }
}
