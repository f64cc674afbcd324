//! Assignment CRUD handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::auth::{AdminUser, CurrentUser};
use crate::db::{
    AssignmentRepository, AssignmentUpdate, CourseRepository, EnrollmentRepository, NewAssignment,
    SubmissionRepository,
};
use crate::web::dto::{
    AssignmentCreateRequest, AssignmentDetail, AssignmentEnvelope, AssignmentUpdateRequest,
    AssignmentWithCourseInfo, AssignmentsEnvelope, CourseSummary, MessageResponse,
    ValidatedJson,
};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;

/// Query parameters for the assignment listing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListAssignmentsQuery {
    /// Course to list assignments for. Required for students.
    pub course_id: Option<String>,
}

/// Parse an optional RFC 3339 due date; an empty string means "none".
fn parse_due_date(raw: Option<&str>) -> Result<Option<DateTime<Utc>>, ApiError> {
    match raw {
        None | Some("") => Ok(None),
        Some(s) => DateTime::parse_from_rfc3339(s)
            .map(|dt| Some(dt.with_timezone(&Utc)))
            .map_err(|_| ApiError::bad_request("Invalid due date, expected RFC 3339")),
    }
}

/// GET /api/assignments - List assignments.
///
/// Admins without a filter get everything; otherwise a courseId is
/// required, and students must be enrolled in that course.
pub async fn list_assignments(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<ListAssignmentsQuery>,
) -> Result<Json<AssignmentsEnvelope>, ApiError> {
    let repo = AssignmentRepository::new(state.db.pool());

    let Some(course_id) = query.course_id else {
        if user.is_admin() {
            let assignments = repo.list_all().await?;
            return Ok(Json(AssignmentsEnvelope {
                assignments: assignments.into_iter().map(Into::into).collect(),
            }));
        }
        return Err(ApiError::bad_request("courseId is required"));
    };

    if !user.is_admin() {
        let enrolled = EnrollmentRepository::new(state.db.pool())
            .find_by_user_and_course(user.user_id(), &course_id)
            .await?;
        if enrolled.is_none() {
            return Err(ApiError::forbidden("Not enrolled in this course"));
        }
    }

    let assignments = repo.list_for_course(&course_id).await?;

    Ok(Json(AssignmentsEnvelope {
        assignments: assignments.into_iter().map(Into::into).collect(),
    }))
}

/// POST /api/assignments - Create an assignment (admin).
pub async fn create_assignment(
    State(state): State<AppState>,
    admin: AdminUser,
    ValidatedJson(req): ValidatedJson<AssignmentCreateRequest>,
) -> Result<(StatusCode, Json<AssignmentEnvelope<AssignmentWithCourseInfo>>), ApiError> {
    let course = CourseRepository::new(state.db.pool())
        .get_by_id(&req.course_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Course not found"))?;

    let due_date = parse_due_date(req.due_date.as_deref())?;

    let mut new_assignment = NewAssignment::new(&req.course_id, &req.title);
    if let Some(description) = req.description {
        new_assignment = new_assignment.with_description(description);
    }
    if let Some(due_date) = due_date {
        new_assignment = new_assignment.with_due_date(due_date);
    }
    if let (Some(url), Some(name)) = (req.file_url.as_deref(), req.file_name.as_deref()) {
        if !url.is_empty() {
            new_assignment = new_assignment.with_file(url, name);
        }
    }

    let assignment = AssignmentRepository::new(state.db.pool())
        .create(&new_assignment)
        .await?;

    tracing::info!(
        assignment_id = %assignment.id,
        course_id = %assignment.course_id,
        admin_id = %admin.user_id(),
        "Assignment created"
    );

    let course_summary = CourseSummary {
        id: course.id,
        code: course.code,
        name: course.name,
    };

    Ok((
        StatusCode::CREATED,
        Json(AssignmentEnvelope {
            assignment: AssignmentWithCourseInfo {
                assignment: assignment.into(),
                course: course_summary,
            },
        }),
    ))
}

/// GET /api/assignments/:id - Assignment detail with scoped submissions.
///
/// Students must be enrolled in the owning course and only see their own
/// submission; admins see all submissions.
pub async fn get_assignment(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(assignment_id): Path<String>,
) -> Result<Json<AssignmentEnvelope<AssignmentDetail>>, ApiError> {
    let assignment = AssignmentRepository::new(state.db.pool())
        .get_by_id(&assignment_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Assignment not found"))?;

    if !user.is_admin() {
        let enrolled = EnrollmentRepository::new(state.db.pool())
            .find_by_user_and_course(user.user_id(), &assignment.course_id)
            .await?;
        if enrolled.is_none() {
            return Err(ApiError::forbidden("Not enrolled in this course"));
        }
    }

    let course = CourseRepository::new(state.db.pool())
        .get_by_id(&assignment.course_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Course not found"))?;

    let student_filter = (!user.is_admin()).then(|| user.user_id().to_string());
    let submissions = SubmissionRepository::new(state.db.pool())
        .list_for_assignment(&assignment_id, student_filter.as_deref())
        .await?;

    Ok(Json(AssignmentEnvelope {
        assignment: AssignmentDetail {
            assignment: assignment.into(),
            course: CourseSummary {
                id: course.id,
                code: course.code,
                name: course.name,
            },
            submissions: submissions.into_iter().map(Into::into).collect(),
        },
    }))
}

/// PUT /api/assignments/:id - Partially update an assignment (admin).
pub async fn update_assignment(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(assignment_id): Path<String>,
    ValidatedJson(req): ValidatedJson<AssignmentUpdateRequest>,
) -> Result<Json<AssignmentEnvelope<AssignmentWithCourseInfo>>, ApiError> {
    let mut update = AssignmentUpdate::new();
    if let Some(title) = req.title {
        update = update.title(title);
    }
    if let Some(description) = req.description {
        update = update.description(Some(description));
    }
    if let Some(ref raw) = req.due_date {
        // Present-but-empty clears the due date
        update = update.due_date(parse_due_date(Some(raw))?);
    }

    let repo = AssignmentRepository::new(state.db.pool());
    let assignment = repo
        .update(&assignment_id, &update)
        .await?
        .ok_or_else(|| ApiError::not_found("Assignment not found"))?;

    tracing::info!(
        assignment_id = %assignment.id,
        admin_id = %admin.user_id(),
        "Assignment updated"
    );

    let course = CourseRepository::new(state.db.pool())
        .get_by_id(&assignment.course_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Course not found"))?;

    Ok(Json(AssignmentEnvelope {
        assignment: AssignmentWithCourseInfo {
            assignment: assignment.into(),
            course: CourseSummary {
                id: course.id,
                code: course.code,
                name: course.name,
            },
        },
    }))
}

/// DELETE /api/assignments/:id - Delete an assignment (admin).
pub async fn delete_assignment(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(assignment_id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let repo = AssignmentRepository::new(state.db.pool());

    if !repo.delete(&assignment_id).await? {
        return Err(ApiError::not_found("Assignment not found"));
    }

    tracing::info!(
        assignment_id = %assignment_id,
        admin_id = %admin.user_id(),
        "Assignment deleted"
    );

    Ok(Json(MessageResponse::new(
        "Assignment deleted successfully",
    )))
}
