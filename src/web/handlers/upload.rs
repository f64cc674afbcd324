//! File upload handler.

use std::str::FromStr;

use axum::{
    extract::{Multipart, State},
    Json,
};

use crate::auth::CurrentUser;
use crate::upload::UploadKind;
use crate::web::dto::UploadResponse;
use crate::web::error::ApiError;
use crate::web::handlers::AppState;

/// POST /api/upload - Store a single file.
///
/// Request body: multipart/form-data with a `file` field and a `type`
/// field (`assignment` or `submission`). The declared MIME type is
/// checked against the allow-list and the payload against the size
/// ceiling before anything is written.
pub async fn upload_file(
    State(state): State<AppState>,
    user: CurrentUser,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut file_name: Option<String> = None;
    let mut content_type: Option<String> = None;
    let mut content: Option<Vec<u8>> = None;
    let mut kind: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        tracing::debug!(error = %e, "Failed to read multipart field");
        ApiError::bad_request("Invalid multipart data")
    })? {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "file" => {
                file_name = field.file_name().map(|s| s.to_string());
                content_type = field.content_type().map(|s| s.to_string());
                content = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|e| {
                            tracing::debug!(error = %e, "Failed to read file content");
                            ApiError::bad_request("Failed to read file")
                        })?
                        .to_vec(),
                );
            }
            "type" => {
                kind = Some(field.text().await.map_err(|e| {
                    tracing::debug!(error = %e, "Failed to read upload type");
                    ApiError::bad_request("Invalid upload type")
                })?);
            }
            _ => {}
        }
    }

    let content = content.ok_or_else(|| ApiError::bad_request("No file provided"))?;
    let file_name = file_name.ok_or_else(|| ApiError::bad_request("No file provided"))?;
    let content_type =
        content_type.ok_or_else(|| ApiError::bad_request("Missing file content type"))?;

    let kind = kind.ok_or_else(|| ApiError::bad_request("Missing upload type"))?;
    let kind = UploadKind::from_str(&kind)
        .map_err(|_| ApiError::bad_request("Upload type must be 'assignment' or 'submission'"))?;

    let stored = state
        .uploads
        .store(kind, &file_name, &content_type, &content)?;

    tracing::info!(
        user_id = %user.user_id(),
        file_name = %file_name,
        file_size = stored.size,
        file_type = %content_type,
        upload_path = %stored.url,
        "File uploaded"
    );

    Ok(Json(UploadResponse {
        success: true,
        file_url: stored.url,
        file_name,
        file_size: stored.size,
        file_type: content_type,
    }))
}
