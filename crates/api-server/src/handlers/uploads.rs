use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::DomainError;
use serde_json::json;
use uuid::Uuid;

use crate::auth::AdminUser;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Opaque image pass-through: store the bytes, hand back a reference path.
pub async fn upload_image(
    _admin: AdminUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<impl IntoResponse> {
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        ApiError(DomainError::ValidationError(format!(
            "Invalid multipart payload: {}",
            e
        )))
    })? {
        if field.name() != Some("image") {
            continue;
        }

        if let Some(content_type) = field.content_type() {
            if !content_type.starts_with("image/") {
                return Err(ApiError(DomainError::ValidationError(
                    "Images only".to_string(),
                )));
            }
        }

        let original_name = field.file_name().unwrap_or("upload").to_string();
        let extension = std::path::Path::new(&original_name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("bin")
            .to_string();

        let data = field.bytes().await.map_err(|e| {
            ApiError(DomainError::ValidationError(format!(
                "Failed to read upload: {}",
                e
            )))
        })?;

        let file_name = format!("{}.{}", Uuid::new_v4(), extension);
        let path = std::path::Path::new(&state.config.upload_dir).join(&file_name);
        tokio::fs::write(&path, &data).await.map_err(|e| {
            ApiError(DomainError::RepositoryError(format!(
                "failed to store upload: {}",
                e
            )))
        })?;

        return Ok((
            StatusCode::CREATED,
            Json(json!({ "image": format!("/uploads/{}", file_name) })),
        ));
    }

    Err(ApiError(DomainError::ValidationError(
        "No image file provided".to_string(),
    )))
}
