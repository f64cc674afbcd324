//! Enrollment handlers.
//!
//! Creation takes the strict path: the target user must exist and be a
//! student, the course must exist, and the (user, course) pair must be
//! new. A race that slips past the existence check is caught by the
//! unique constraint and surfaces as the same 400.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use crate::auth::{AdminUser, CurrentUser};
use crate::db::{CourseRepository, EnrollmentRepository, Role, UserRepository};
use crate::web::dto::{
    EnrollmentDetailInfo, EnrollmentEnvelope, EnrollmentInfo, EnrollmentRequest,
    EnrollmentsEnvelope, MessageResponse, ValidatedJson,
};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;

/// Query parameters for the enrollment listing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListEnrollmentsQuery {
    /// Optional user filter (admins only; ignored for students).
    pub user_id: Option<String>,
}

/// GET /api/enrollments - List enrollments.
///
/// Students see their own enrollments with courses; admins see all, with
/// an optional userId filter.
pub async fn list_enrollments(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<ListEnrollmentsQuery>,
) -> Result<Response, ApiError> {
    let repo = EnrollmentRepository::new(state.db.pool());

    if !user.is_admin() {
        let enrollments = repo.list_for_user(user.user_id()).await?;
        let body: EnrollmentsEnvelope<EnrollmentInfo> = EnrollmentsEnvelope {
            enrollments: enrollments.into_iter().map(Into::into).collect(),
        };
        return Ok(Json(body).into_response());
    }

    let enrollments = repo.list_all(query.user_id.as_deref()).await?;
    let body: EnrollmentsEnvelope<EnrollmentDetailInfo> = EnrollmentsEnvelope {
        enrollments: enrollments.into_iter().map(Into::into).collect(),
    };
    Ok(Json(body).into_response())
}

/// POST /api/enrollments - Enroll a student in a course (admin).
pub async fn create_enrollment(
    State(state): State<AppState>,
    admin: AdminUser,
    ValidatedJson(req): ValidatedJson<EnrollmentRequest>,
) -> Result<(StatusCode, Json<EnrollmentEnvelope>), ApiError> {
    let user = UserRepository::new(state.db.pool())
        .get_by_id(&req.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    if user.role != Role::Student {
        return Err(ApiError::bad_request(
            "Only students can be enrolled in courses",
        ));
    }

    CourseRepository::new(state.db.pool())
        .get_by_id(&req.course_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Course not found"))?;

    let repo = EnrollmentRepository::new(state.db.pool());

    if repo
        .find_by_user_and_course(&req.user_id, &req.course_id)
        .await?
        .is_some()
    {
        return Err(ApiError::conflict(
            "Student is already enrolled in this course",
        ));
    }

    let enrollment = repo.create(&req.user_id, &req.course_id).await?;

    tracing::info!(
        enrollment_id = %enrollment.id,
        user_id = %enrollment.user_id,
        course_id = %enrollment.course_id,
        admin_id = %admin.user_id(),
        "Student enrolled in course"
    );

    let detail = repo
        .list_all(Some(&enrollment.user_id))
        .await?
        .into_iter()
        .find(|e| e.id == enrollment.id)
        .ok_or_else(|| ApiError::internal("Enrollment vanished after creation"))?;

    Ok((
        StatusCode::CREATED,
        Json(EnrollmentEnvelope {
            enrollment: detail.into(),
        }),
    ))
}

/// DELETE /api/enrollments/:id - Remove an enrollment (admin).
pub async fn delete_enrollment(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(enrollment_id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let repo = EnrollmentRepository::new(state.db.pool());

    if !repo.delete(&enrollment_id).await? {
        return Err(ApiError::not_found("Enrollment not found"));
    }

    tracing::info!(
        enrollment_id = %enrollment_id,
        admin_id = %admin.user_id(),
        "Enrollment deleted by admin"
    );

    Ok(Json(MessageResponse::new(
        "Enrollment deleted successfully",
    )))
}
