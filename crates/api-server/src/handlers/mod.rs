pub mod genres;
pub mod movies;
pub mod uploads;
pub mod users;


use axum::response::IntoResponse;
use axum::Json;
use domain::DomainError;
use serde::Serialize;
use uuid::Uuid;

use crate::error::ApiError;

/// Syntactic id check, ahead of any store lookup. A malformed id behaves
/// exactly like an id that matches nothing.
pub(crate) fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw)
        .map_err(|_| ApiError(DomainError::NotFound(format!("Invalid id: {}", raw))))
}

#[derive(Debug, Serialize)]
struct StatusResponse {
    message: String,
    version: String,
    environment: String,
}

pub async fn get_system_status() -> impl IntoResponse {
    let status = StatusResponse {
        message: "Movie catalog API server is running".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        environment: std::env::var("ENV").unwrap_or_else(|_| "development".to_string()),
    };
    Json(status)
}

pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}
