//! Validation utilities for Web API DTOs.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use uuid::Uuid;
use validator::Validate;

use crate::auth::password::validate_password;
use crate::web::error::ApiError;

/// A JSON extractor that validates the request body.
///
/// Deserializes the body as JSON, then validates it with the `validator`
/// crate. Validation failures return 400 with field-level details before
/// any handler logic runs.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| ApiError::bad_request(format!("Invalid JSON: {}", e)))?;

        value.validate().map_err(ApiError::from_validation_errors)?;

        Ok(ValidatedJson(value))
    }
}

// ============================================================================
// Custom Validators
// ============================================================================

/// Validate that a string is a well-formed UUID.
pub fn valid_uuid(value: &str) -> Result<(), validator::ValidationError> {
    if Uuid::parse_str(value).is_err() {
        return Err(validator::ValidationError::new("valid_uuid")
            .with_message("Must be a valid UUID".into()));
    }
    Ok(())
}

/// Validate password composition: 8-128 characters with at least one
/// uppercase letter, one lowercase letter, and one digit.
pub fn strong_password(value: &str) -> Result<(), validator::ValidationError> {
    if let Err(e) = validate_password(value) {
        return Err(
            validator::ValidationError::new("strong_password").with_message(e.to_string().into())
        );
    }
    Ok(())
}
