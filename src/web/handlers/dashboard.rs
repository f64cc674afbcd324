//! Dashboard aggregation handler.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;

use crate::auth::CurrentUser;
use crate::db::{
    AssignmentRepository, CourseRepository, EnrollmentRepository, Role, SubmissionRepository,
    SubmissionStatus, UserRepository,
};
use crate::web::dto::{AdminDashboard, AdminStats, StudentDashboard};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;

/// How many upcoming assignments the student dashboard shows.
const UPCOMING_LIMIT: i64 = 10;

/// How many recent submissions each dashboard shows.
const STUDENT_RECENT_LIMIT: i64 = 5;
const ADMIN_RECENT_LIMIT: i64 = 10;

/// GET /api/dashboard - Role-dependent dashboard aggregate.
pub async fn dashboard(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Response, ApiError> {
    if user.role() == Role::Student {
        student_dashboard(&state, &user).await
    } else {
        admin_dashboard(&state).await
    }
}

async fn student_dashboard(state: &AppState, user: &CurrentUser) -> Result<Response, ApiError> {
    let pool = state.db.pool();
    let student_id = user.user_id();

    let enrollments = EnrollmentRepository::new(pool)
        .list_for_user(student_id)
        .await?;

    let upcoming = AssignmentRepository::new(pool)
        .list_upcoming_for_student(student_id, Utc::now(), UPCOMING_LIMIT)
        .await?;

    let recent = SubmissionRepository::new(pool)
        .list_recent_for_student(student_id, STUDENT_RECENT_LIMIT)
        .await?;

    let body = StudentDashboard {
        enrollments: enrollments.into_iter().map(Into::into).collect(),
        upcoming_assignments: upcoming.into_iter().map(Into::into).collect(),
        recent_submissions: recent.into_iter().map(Into::into).collect(),
    };

    Ok(Json(body).into_response())
}

async fn admin_dashboard(state: &AppState) -> Result<Response, ApiError> {
    let pool = state.db.pool();

    let total_students = UserRepository::new(pool).count_by_role(Role::Student).await?;
    let total_courses = CourseRepository::new(pool).count().await?;
    let total_assignments = AssignmentRepository::new(pool).count().await?;

    let submission_repo = SubmissionRepository::new(pool);
    let pending_submissions = submission_repo
        .count_by_status(SubmissionStatus::Submitted)
        .await?;
    let recent = submission_repo
        .list_recent_by_status(SubmissionStatus::Submitted, ADMIN_RECENT_LIMIT)
        .await?;

    let body = AdminDashboard {
        stats: AdminStats {
            total_students,
            total_courses,
            total_assignments,
            pending_submissions,
        },
        recent_submissions: recent.into_iter().map(Into::into).collect(),
    };

    Ok(Json(body).into_response())
}
