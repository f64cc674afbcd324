//! Error types for Aula.

use thiserror::Error;

/// Common error type for Aula.
#[derive(Error, Debug)]
pub enum AulaError {
    /// Database error.
    ///
    /// Generic database error wrapping failures from the sqlx backend.
    #[error("database error: {0}")]
    Database(String),

    /// Uniqueness violation on a constrained column pair.
    #[error("conflict: {0}")]
    Conflict(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Authentication error.
    #[error("authentication error: {0}")]
    Auth(String),

    /// Permission denied error.
    #[error("permission denied: {0}")]
    Permission(String),

    /// Validation error for user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<sqlx::Error> for AulaError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_unique_violation() {
                return AulaError::Conflict(db_err.message().to_string());
            }
        }
        AulaError::Database(e.to_string())
    }
}

/// Result type alias for Aula operations.
pub type Result<T> = std::result::Result<T, AulaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_error_display() {
        let err = AulaError::Auth("invalid credentials".to_string());
        assert_eq!(err.to_string(), "authentication error: invalid credentials");
    }

    #[test]
    fn test_permission_error_display() {
        let err = AulaError::Permission("admin access required".to_string());
        assert_eq!(err.to_string(), "permission denied: admin access required");
    }

    #[test]
    fn test_validation_error_display() {
        let err = AulaError::Validation("email malformed".to_string());
        assert_eq!(err.to_string(), "validation error: email malformed");
    }

    #[test]
    fn test_not_found_error_display() {
        let err = AulaError::NotFound("course".to_string());
        assert_eq!(err.to_string(), "course not found");
    }

    #[test]
    fn test_conflict_error_display() {
        let err = AulaError::Conflict("duplicate enrollment".to_string());
        assert_eq!(err.to_string(), "conflict: duplicate enrollment");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: AulaError = io_err.into();
        assert!(matches!(err, AulaError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_result_alias() {
        fn sample_ok() -> Result<i32> {
            Ok(42)
        }

        fn sample_err() -> Result<i32> {
            Err(AulaError::Auth("test".to_string()))
        }

        assert_eq!(sample_ok().unwrap(), 42);
        assert!(sample_err().is_err());
    }
}
