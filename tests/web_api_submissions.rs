//! Web API submission tests: the create-or-update flow and grading.

mod common;

use axum::http::StatusCode;
use common::*;
use serde_json::{json, Value};

struct Fixture {
    assignment_id: String,
}

/// Register + enroll Ada, create a course and an assignment; leaves the
/// admin logged in.
async fn seed(app: &TestApp) -> Fixture {
    let body = register_student(&app.server, "Ada", "ada@example.com").await;
    let student_id = body["user"]["id"].as_str().unwrap().to_string();

    login_as_admin(app, "admin@example.com").await;

    let course: Value = app
        .server
        .post("/api/courses")
        .json(&json!({ "code": "CS101", "name": "Intro to CS" }))
        .await
        .json();
    let course_id = course["course"]["id"].as_str().unwrap().to_string();

    app.server
        .post("/api/enrollments")
        .json(&json!({ "userId": student_id, "courseId": course_id }))
        .await
        .assert_status(StatusCode::CREATED);

    let assignment: Value = app
        .server
        .post("/api/assignments")
        .json(&json!({ "courseId": course_id, "title": "Homework 1" }))
        .await
        .json();

    Fixture {
        assignment_id: assignment["assignment"]["id"].as_str().unwrap().to_string(),
    }
}

async fn submit(app: &TestApp, assignment_id: &str, content: &str) -> axum_test::TestResponse {
    app.server
        .post("/api/submissions")
        .json(&json!({ "assignmentId": assignment_id, "content": content }))
        .await
}

// ============================================================================
// Create-or-update Tests
// ============================================================================

#[tokio::test]
async fn test_first_submission_creates() {
    let app = create_test_server().await;
    let fx = seed(&app).await;

    login(&app.server, "ada@example.com").await;

    let response = submit(&app, &fx.assignment_id, "My answer").await;
    response.assert_status(StatusCode::CREATED);

    let body: Value = response.json();
    assert_eq!(body["submission"]["content"], "My answer");
    assert_eq!(body["submission"]["status"], "SUBMITTED");
    assert!(body["submission"]["grade"].is_null());
}

#[tokio::test]
async fn test_second_submission_upserts() {
    let app = create_test_server().await;
    let fx = seed(&app).await;

    login(&app.server, "ada@example.com").await;

    let first = submit(&app, &fx.assignment_id, "v1").await;
    first.assert_status(StatusCode::CREATED);
    let first_id = first.json::<Value>()["submission"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let second = submit(&app, &fx.assignment_id, "v2").await;
    second.assert_status_ok();

    let body: Value = second.json();
    // Same row, latest content
    assert_eq!(body["submission"]["id"], first_id.as_str());
    assert_eq!(body["submission"]["content"], "v2");
    assert_eq!(body["submission"]["status"], "SUBMITTED");

    // Exactly one submission exists for the assignment
    login(&app.server, "admin@example.com").await;
    let detail: Value = app
        .server
        .get(&format!("/api/assignments/{}", fx.assignment_id))
        .await
        .json();
    assert_eq!(detail["assignment"]["submissions"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_admin_cannot_submit() {
    let app = create_test_server().await;
    let fx = seed(&app).await;

    let response = submit(&app, &fx.assignment_id, "admin answer").await;
    response.assert_status(StatusCode::FORBIDDEN);

    let body: Value = response.json();
    assert_eq!(body["error"]["message"], "Only students can submit assignments");
}

#[tokio::test]
async fn test_submission_requires_enrollment() {
    let app = create_test_server().await;
    let fx = seed(&app).await;

    // Grace is registered but not enrolled
    register_student(&app.server, "Grace", "grace@example.com").await;
    login(&app.server, "grace@example.com").await;

    let response = submit(&app, &fx.assignment_id, "answer").await;
    response.assert_status(StatusCode::FORBIDDEN);

    let body: Value = response.json();
    assert_eq!(body["error"]["message"], "Not enrolled in this course");
}

#[tokio::test]
async fn test_submission_missing_assignment() {
    let app = create_test_server().await;
    seed(&app).await;

    login(&app.server, "ada@example.com").await;

    let response = submit(&app, "550e8400-e29b-41d4-a716-446655440000", "answer").await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_submission_unauthenticated() {
    let app = create_test_server().await;
    let fx = seed(&app).await;

    app.server.post("/api/auth/logout").await;

    let response = submit(&app, &fx.assignment_id, "answer").await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_submission_with_file_reference() {
    let app = create_test_server().await;
    let fx = seed(&app).await;

    login(&app.server, "ada@example.com").await;

    let response = app
        .server
        .post("/api/submissions")
        .json(&json!({
            "assignmentId": fx.assignment_id,
            "content": "see attachment",
            "fileUrl": "/uploads/submissions/1700000000000-essay.pdf",
            "fileName": "essay.pdf"
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["submission"]["fileName"], "essay.pdf");
}

// ============================================================================
// Grading Tests
// ============================================================================

#[tokio::test]
async fn test_grade_submission() {
    let app = create_test_server().await;
    let fx = seed(&app).await;

    login(&app.server, "ada@example.com").await;
    let submission = submit(&app, &fx.assignment_id, "answer").await;
    let submission_id = submission.json::<Value>()["submission"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    login(&app.server, "admin@example.com").await;

    let response = app
        .server
        .put(&format!("/api/submissions/{submission_id}/grade"))
        .json(&json!({ "grade": 92, "feedback": "Nice work" }))
        .await;

    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["submission"]["status"], "GRADED");
    assert_eq!(body["submission"]["grade"], 92);
    assert_eq!(body["submission"]["feedback"], "Nice work");
    // Grading response carries context
    assert_eq!(body["submission"]["student"]["email"], "ada@example.com");
    assert_eq!(body["submission"]["assignment"]["course"]["code"], "CS101");
}

#[tokio::test]
async fn test_grade_out_of_range_rejected_before_persistence() {
    let app = create_test_server().await;
    let fx = seed(&app).await;

    login(&app.server, "ada@example.com").await;
    let submission = submit(&app, &fx.assignment_id, "answer").await;
    let submission_id = submission.json::<Value>()["submission"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    login(&app.server, "admin@example.com").await;

    for grade in [-1, 101] {
        let response = app
            .server
            .put(&format!("/api/submissions/{submission_id}/grade"))
            .json(&json!({ "grade": grade }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);

        let body: Value = response.json();
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    // The submission is untouched
    let detail: Value = app
        .server
        .get(&format!("/api/assignments/{}", fx.assignment_id))
        .await
        .json();
    let row = &detail["assignment"]["submissions"][0];
    assert_eq!(row["status"], "SUBMITTED");
    assert!(row["grade"].is_null());
}

#[tokio::test]
async fn test_regrade_overwrites() {
    let app = create_test_server().await;
    let fx = seed(&app).await;

    login(&app.server, "ada@example.com").await;
    let submission = submit(&app, &fx.assignment_id, "answer").await;
    let submission_id = submission.json::<Value>()["submission"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    login(&app.server, "admin@example.com").await;

    app.server
        .put(&format!("/api/submissions/{submission_id}/grade"))
        .json(&json!({ "grade": 60, "feedback": "Needs work" }))
        .await
        .assert_status_ok();

    let response = app
        .server
        .put(&format!("/api/submissions/{submission_id}/grade"))
        .json(&json!({ "grade": 85 }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["submission"]["grade"], 85);
}

#[tokio::test]
async fn test_grade_requires_admin() {
    let app = create_test_server().await;
    let fx = seed(&app).await;

    login(&app.server, "ada@example.com").await;
    let submission = submit(&app, &fx.assignment_id, "answer").await;
    let submission_id = submission.json::<Value>()["submission"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    // Still logged in as the student
    let response = app
        .server
        .put(&format!("/api/submissions/{submission_id}/grade"))
        .json(&json!({ "grade": 100 }))
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_grade_missing_submission() {
    let app = create_test_server().await;
    seed(&app).await;

    let response = app
        .server
        .put("/api/submissions/550e8400-e29b-41d4-a716-446655440000/grade")
        .json(&json!({ "grade": 50 }))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}
