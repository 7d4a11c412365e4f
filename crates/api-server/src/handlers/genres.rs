use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::Genre;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::parse_id;
use crate::auth::AdminUser;
use crate::error::ApiResult;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct GenreRequest {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct GenreInfo {
    pub id: Option<Uuid>,
    pub name: String,
}

impl From<Genre> for GenreInfo {
    fn from(genre: Genre) -> Self {
        Self {
            id: genre.id,
            name: genre.name,
        }
    }
}

pub async fn list_genres(State(state): State<AppState>) -> ApiResult<Json<Vec<GenreInfo>>> {
    let genres = state.app.genre_service.get_all_genres().await?;
    Ok(Json(genres.into_iter().map(Into::into).collect()))
}

pub async fn get_genre(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<GenreInfo>> {
    let id = parse_id(&id)?;
    let genre = state.app.genre_service.get_genre(id).await?;
    Ok(Json(genre.into()))
}

pub async fn create_genre(
    _admin: AdminUser,
    State(state): State<AppState>,
    Json(payload): Json<GenreRequest>,
) -> ApiResult<impl IntoResponse> {
    let genre = state.app.genre_service.create_genre(payload.name).await?;
    Ok((StatusCode::CREATED, Json(GenreInfo::from(genre))))
}

pub async fn update_genre(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<GenreRequest>,
) -> ApiResult<Json<GenreInfo>> {
    let id = parse_id(&id)?;
    let genre = state
        .app
        .genre_service
        .update_genre(id, payload.name)
        .await?;
    Ok(Json(genre.into()))
}

pub async fn delete_genre(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<GenreInfo>> {
    let id = parse_id(&id)?;
    let genre = state.app.genre_service.delete_genre(id).await?;
    Ok(Json(genre.into()))
}
