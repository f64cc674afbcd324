//! Web API module for Aula.
//!
//! A JSON REST API over the portal's users, courses, enrollments,
//! assignments, submissions and uploads, with cookie-session
//! authentication.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use router::create_router;
pub use server::WebServer;
