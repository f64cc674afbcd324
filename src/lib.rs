//! Aula - a role-based student course portal.
//!
//! Students enroll in courses, hand in assignment submissions and receive
//! grades; admins manage the catalog and the roster. Everything is served
//! as a JSON HTTP API with sealed-cookie sessions.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod upload;
pub mod web;

pub use auth::{
    hash_password, validate_password, verify_password, AdminUser, CurrentUser, PasswordError,
    SessionData, SessionStore, SESSION_COOKIE,
};
pub use config::Config;
pub use db::{Database, Role, SubmissionStatus};
pub use error::{AulaError, Result};
pub use upload::{UploadKind, UploadStorage};
pub use web::WebServer;
