use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use domain::DomainError;
use serde_json::json;
use tracing::error;

/// Boundary wrapper turning a workflow failure into exactly one JSON
/// response. Internal failure detail is logged here and never sent to the
/// client.
pub struct ApiError(pub DomainError);

pub type ApiResult<T> = Result<T, ApiError>;

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            DomainError::ValidationError(msg) | DomainError::Conflict(msg) => {
                (StatusCode::BAD_REQUEST, msg.clone())
            }
            DomainError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            DomainError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            DomainError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            DomainError::Timeout(_) => {
                error!("store timeout: {}", self.0);
                (StatusCode::GATEWAY_TIMEOUT, "Store timeout".to_string())
            }
            DomainError::RepositoryError(_) => {
                error!("internal error: {}", self.0);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}
