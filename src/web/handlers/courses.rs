//! Course CRUD handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::auth::{AdminUser, CurrentUser};
use crate::db::{
    AssignmentRepository, CourseRepository, CourseUpdate, EnrollmentRepository, NewCourse,
};
use crate::web::dto::{
    CourseCreateRequest, CourseDetail, CourseEnvelope, CourseInfo, CourseUpdateRequest,
    CoursesEnvelope, MessageResponse, ValidatedJson,
};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;

/// GET /api/courses - List courses with counts (any authenticated user).
pub async fn list_courses(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> Result<Json<CoursesEnvelope>, ApiError> {
    let repo = CourseRepository::new(state.db.pool());
    let courses = repo.list_with_counts().await?;

    Ok(Json(CoursesEnvelope {
        courses: courses.into_iter().map(Into::into).collect(),
    }))
}

/// POST /api/courses - Create a course (admin).
pub async fn create_course(
    State(state): State<AppState>,
    admin: AdminUser,
    ValidatedJson(req): ValidatedJson<CourseCreateRequest>,
) -> Result<(StatusCode, Json<CourseEnvelope<CourseInfo>>), ApiError> {
    let repo = CourseRepository::new(state.db.pool());

    if repo.get_by_code(&req.code).await?.is_some() {
        return Err(ApiError::conflict("Course code already exists"));
    }

    let mut new_course = NewCourse::new(&req.code, &req.name);
    if let Some(description) = req.description {
        new_course = new_course.with_description(description);
    }

    let course = repo.create(&new_course).await?;

    tracing::info!(
        course_id = %course.id,
        code = %course.code,
        admin_id = %admin.user_id(),
        "Course created"
    );

    Ok((
        StatusCode::CREATED,
        Json(CourseEnvelope {
            course: course.into(),
        }),
    ))
}

/// GET /api/courses/:id - Course detail with assignments and roster.
pub async fn get_course(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(course_id): Path<String>,
) -> Result<Json<CourseEnvelope<CourseDetail>>, ApiError> {
    let course = CourseRepository::new(state.db.pool())
        .get_by_id(&course_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Course not found"))?;

    let assignments = AssignmentRepository::new(state.db.pool())
        .list_for_course(&course_id)
        .await?;

    let roster = EnrollmentRepository::new(state.db.pool())
        .list_for_course(&course_id)
        .await?;

    Ok(Json(CourseEnvelope {
        course: CourseDetail {
            course: course.into(),
            assignments: assignments
                .into_iter()
                .map(|a| a.assignment.into())
                .collect(),
            enrollments: roster.into_iter().map(Into::into).collect(),
        },
    }))
}

/// PUT /api/courses/:id - Partially update a course (admin).
pub async fn update_course(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(course_id): Path<String>,
    ValidatedJson(req): ValidatedJson<CourseUpdateRequest>,
) -> Result<Json<CourseEnvelope<CourseInfo>>, ApiError> {
    let repo = CourseRepository::new(state.db.pool());

    if let Some(ref code) = req.code {
        // Renaming onto another course's code is a conflict
        if let Some(existing) = repo.get_by_code(code).await? {
            if existing.id != course_id {
                return Err(ApiError::conflict("Course code already exists"));
            }
        }
    }

    let mut update = CourseUpdate::new();
    if let Some(code) = req.code {
        update = update.code(code);
    }
    if let Some(name) = req.name {
        update = update.name(name);
    }
    if let Some(description) = req.description {
        update = update.description(Some(description));
    }

    let course = repo
        .update(&course_id, &update)
        .await?
        .ok_or_else(|| ApiError::not_found("Course not found"))?;

    tracing::info!(course_id = %course.id, admin_id = %admin.user_id(), "Course updated");

    Ok(Json(CourseEnvelope {
        course: course.into(),
    }))
}

/// DELETE /api/courses/:id - Delete a course (admin).
pub async fn delete_course(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(course_id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let repo = CourseRepository::new(state.db.pool());

    if !repo.delete(&course_id).await? {
        return Err(ApiError::not_found("Course not found"));
    }

    tracing::info!(course_id = %course_id, admin_id = %admin.user_id(), "Course deleted");

    Ok(Json(MessageResponse::new("Course deleted successfully")))
}
