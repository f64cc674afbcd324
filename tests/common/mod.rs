//! Shared test bootstrap for Web API integration tests.

// Each test binary compiles this module; not every binary uses every helper.
#![allow(dead_code)]

use axum_test::{TestServer, TestServerConfig};
use serde_json::{json, Value};
use tempfile::TempDir;

use aula::db::{NewUser, Role, UserRepository};
use aula::web::handlers::AppState;
use aula::web::router::{create_health_router, create_router};
use aula::{hash_password, Database, UploadStorage};

/// Session secret used across tests (min 32 bytes).
pub const TEST_SECRET: &str = "test-session-secret-0123456789abcdef";

/// Default password used by test fixtures.
pub const TEST_PASSWORD: &str = "Passw0rd";

/// A running test server over an in-memory database.
pub struct TestApp {
    /// The test HTTP client/server pair (cookie jar enabled).
    pub server: TestServer,
    /// The backing database, for direct fixture setup.
    pub db: Database,
    /// Holds the temporary upload directory alive.
    _uploads_dir: TempDir,
}

/// Create a test server with an in-memory database and default limits.
pub async fn create_test_server() -> TestApp {
    create_test_server_with_upload_limit(10 * 1024 * 1024).await
}

/// Create a test server with a custom upload size ceiling.
pub async fn create_test_server_with_upload_limit(max_upload: u64) -> TestApp {
    let db = Database::open_in_memory()
        .await
        .expect("Failed to create test database");

    let uploads_dir = TempDir::new().expect("Failed to create upload dir");
    let uploads =
        UploadStorage::new(uploads_dir.path(), max_upload).expect("Failed to create storage");

    let app_state = AppState::new(db.clone(), TEST_SECRET, false, 7, uploads);

    let router = create_router(app_state, &[]).merge(create_health_router());

    let config = TestServerConfig {
        save_cookies: true,
        ..TestServerConfig::default()
    };
    let server = TestServer::new_with_config(router, config).expect("Failed to create test server");

    TestApp {
        server,
        db,
        _uploads_dir: uploads_dir,
    }
}

/// Register a student through the API and return the response body.
pub async fn register_student(server: &TestServer, name: &str, email: &str) -> Value {
    let response = server
        .post("/api/auth/register")
        .json(&json!({
            "name": name,
            "email": email,
            "password": TEST_PASSWORD
        }))
        .await;

    response.json::<Value>()
}

/// Log in through the API; the session cookie lands in the server's jar.
pub async fn login(server: &TestServer, email: &str) -> Value {
    let response = server
        .post("/api/auth/login")
        .json(&json!({
            "email": email,
            "password": TEST_PASSWORD
        }))
        .await;

    response.assert_status_ok();
    response.json::<Value>()
}

/// Register a student and log in as them. Returns the user id.
pub async fn login_as_new_student(server: &TestServer, name: &str, email: &str) -> String {
    let body = register_student(server, name, email).await;
    login(server, email).await;
    body["user"]["id"].as_str().expect("user id").to_string()
}

/// Seed an admin account directly in the database. Returns the user id.
pub async fn seed_admin(db: &Database, email: &str) -> String {
    let password_hash = hash_password(TEST_PASSWORD).expect("hash password");
    let admin = UserRepository::new(db.pool())
        .create(&NewUser::new("Admin", email, password_hash).with_role(Role::Admin))
        .await
        .expect("create admin");
    admin.id
}

/// Seed an admin and log in as them. Returns the admin id.
pub async fn login_as_admin(app: &TestApp, email: &str) -> String {
    let id = seed_admin(&app.db, email).await;
    login(&app.server, email).await;
    id
}
