//! Router configuration for the Web API.

use axum::extract::DefaultBodyLimit;
use axum::http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers::{
    assignments, auth, courses, dashboard, enrollments, submissions, upload, users, AppState,
};

/// Create the main API router.
pub fn create_router(app_state: AppState, cors_origins: &[String]) -> Router {
    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me));

    let user_routes = Router::new()
        .route("/", get(users::list_users).post(users::create_user))
        .route("/:id", patch(users::update_user).delete(users::delete_user));

    let course_routes = Router::new()
        .route("/", get(courses::list_courses).post(courses::create_course))
        .route(
            "/:id",
            get(courses::get_course)
                .put(courses::update_course)
                .delete(courses::delete_course),
        );

    let enrollment_routes = Router::new()
        .route(
            "/",
            get(enrollments::list_enrollments).post(enrollments::create_enrollment),
        )
        .route("/:id", delete(enrollments::delete_enrollment));

    let assignment_routes = Router::new()
        .route(
            "/",
            get(assignments::list_assignments).post(assignments::create_assignment),
        )
        .route(
            "/:id",
            get(assignments::get_assignment)
                .put(assignments::update_assignment)
                .delete(assignments::delete_assignment),
        );

    let submission_routes = Router::new()
        .route("/", post(submissions::submit))
        .route("/:id/grade", put(submissions::grade_submission));

    let api_routes = Router::new()
        .nest("/auth", auth_routes)
        .nest("/users", user_routes)
        .nest("/courses", course_routes)
        .nest("/enrollments", enrollment_routes)
        .nest("/assignments", assignment_routes)
        .nest("/submissions", submission_routes)
        .route("/dashboard", get(dashboard::dashboard))
        .route(
            "/upload",
            post(upload::upload_file)
                // Leave headroom over the 10 MiB ceiling checked in the handler
                .layer(DefaultBodyLimit::max(12 * 1024 * 1024)),
        );

    Router::new()
        .nest("/api", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(cors_origins)),
        )
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}

/// Create a CORS layer from configuration.
///
/// With no configured origins (development) any origin is allowed without
/// credentials; with origins configured, only those origins are allowed,
/// with credentials so the session cookie travels.
pub fn create_cors_layer(origins: &[String]) -> CorsLayer {
    let methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::PATCH,
        Method::OPTIONS,
    ];

    let parsed_origins: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();

    if parsed_origins.is_empty() {
        CorsLayer::new()
            .allow_methods(methods)
            .allow_headers(Any)
            .allow_origin(Any)
    } else {
        CorsLayer::new()
            .allow_methods(methods)
            .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT])
            .allow_credentials(true)
            .allow_origin(parsed_origins)
    }
}
