//! Submission handlers: create-or-update and grading.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::auth::{AdminUser, CurrentUser};
use crate::db::{
    AssignmentRepository, EnrollmentRepository, NewSubmission, SubmissionRepository,
    SubmissionUpdate,
};
use crate::web::dto::{
    GradeRequest, SubmissionDetailInfo, SubmissionEnvelope, SubmissionInfo, SubmissionRequest,
    ValidatedJson,
};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;

/// POST /api/submissions - Create or update the student's submission.
///
/// Keyed by the unique (assignment, student) pair: first hand-in creates
/// the row (201), a later hand-in replaces its content (200). Either way
/// the row ends in SUBMITTED status. Two racing first hand-ins are
/// serialized by the unique constraint; the loser gets a 400.
pub async fn submit(
    State(state): State<AppState>,
    user: CurrentUser,
    ValidatedJson(req): ValidatedJson<SubmissionRequest>,
) -> Result<Response, ApiError> {
    if user.is_admin() {
        return Err(ApiError::forbidden("Only students can submit assignments"));
    }

    let assignment = AssignmentRepository::new(state.db.pool())
        .get_by_id(&req.assignment_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Assignment not found"))?;

    let enrolled = EnrollmentRepository::new(state.db.pool())
        .find_by_user_and_course(user.user_id(), &assignment.course_id)
        .await?;
    if enrolled.is_none() {
        return Err(ApiError::forbidden("Not enrolled in this course"));
    }

    let repo = SubmissionRepository::new(state.db.pool());
    let existing = repo
        .find_by_assignment_and_student(&req.assignment_id, user.user_id())
        .await?;

    let (submission, status) = match existing {
        Some(existing) => {
            let update = SubmissionUpdate {
                content: req.content,
                file_url: req.file_url,
                file_name: req.file_name,
            };
            let submission = repo
                .resubmit(&existing.id, &update)
                .await?
                .ok_or_else(|| ApiError::not_found("Submission not found"))?;

            tracing::info!(
                submission_id = %submission.id,
                student_id = %user.user_id(),
                "Submission updated"
            );

            (submission, StatusCode::OK)
        }
        None => {
            let mut new_submission = NewSubmission::new(&req.assignment_id, user.user_id());
            new_submission.content = req.content;
            new_submission.file_url = req.file_url;
            new_submission.file_name = req.file_name;

            let submission = repo.create(&new_submission).await?;

            tracing::info!(
                submission_id = %submission.id,
                student_id = %user.user_id(),
                "Submission created"
            );

            (submission, StatusCode::CREATED)
        }
    };

    let body: SubmissionEnvelope<SubmissionInfo> = SubmissionEnvelope {
        submission: submission.into(),
    };
    Ok((status, Json(body)).into_response())
}

/// PUT /api/submissions/:id/grade - Grade a submission (admin).
///
/// Sets grade and feedback and moves the submission to GRADED. Regrading
/// overwrites the previous grade.
pub async fn grade_submission(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(submission_id): Path<String>,
    ValidatedJson(req): ValidatedJson<GradeRequest>,
) -> Result<Json<SubmissionEnvelope<SubmissionDetailInfo>>, ApiError> {
    let repo = SubmissionRepository::new(state.db.pool());

    let graded = repo
        .grade(&submission_id, req.grade, req.feedback.as_deref())
        .await?
        .ok_or_else(|| ApiError::not_found("Submission not found"))?;

    tracing::info!(
        submission_id = %graded.id,
        student_id = %graded.student_id,
        grade = req.grade,
        admin_id = %admin.user_id(),
        "Submission graded"
    );

    let detail = repo
        .get_detail_by_id(&graded.id)
        .await?
        .ok_or_else(|| ApiError::not_found("Submission not found"))?;

    Ok(Json(SubmissionEnvelope {
        submission: detail.into(),
    }))
}
