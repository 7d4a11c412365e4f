use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::{DateTime, Utc};
use domain::{DomainError, Movie, MovieUpdate, NewMovie, Review};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use super::parse_id;
use crate::auth::{AdminUser, AuthUser};
use crate::error::{ApiError, ApiResult};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateMovieRequest {
    pub name: String,
    pub year: i32,
    pub detail: String,
    #[serde(default)]
    pub cast: Vec<String>,
    pub genre: Option<Uuid>,
    pub image: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateMovieRequest {
    pub name: Option<String>,
    pub year: Option<i32>,
    pub detail: Option<String>,
    pub cast: Option<Vec<String>>,
    pub genre: Option<Uuid>,
    pub image: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddReviewRequest {
    pub rating: u8,
    pub comment: String,
}

#[derive(Debug, Serialize)]
pub struct ReviewInfo {
    pub id: Uuid,
    pub user: Uuid,
    pub name: String,
    pub rating: u8,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

impl From<Review> for ReviewInfo {
    fn from(review: Review) -> Self {
        Self {
            id: review.id,
            user: review.user_id,
            name: review.author,
            rating: review.rating,
            comment: review.comment,
            created_at: review.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MovieInfo {
    pub id: Option<Uuid>,
    pub name: String,
    pub year: i32,
    pub detail: String,
    pub cast: Vec<String>,
    pub genre: Option<Uuid>,
    pub image: Option<String>,
    pub rating: f32,
    pub num_reviews: u32,
    pub reviews: Vec<ReviewInfo>,
    pub created_at: DateTime<Utc>,
}

impl From<Movie> for MovieInfo {
    fn from(movie: Movie) -> Self {
        Self {
            id: movie.id,
            name: movie.name,
            year: movie.year,
            detail: movie.detail,
            cast: movie.cast,
            genre: movie.genre_id,
            image: movie.image,
            rating: movie.rating,
            num_reviews: movie.num_reviews,
            reviews: movie.reviews.into_iter().map(Into::into).collect(),
            created_at: movie.created_at,
        }
    }
}

fn movie_list(movies: Vec<Movie>) -> Json<Vec<MovieInfo>> {
    Json(movies.into_iter().map(Into::into).collect())
}

pub async fn list_movies(State(state): State<AppState>) -> ApiResult<Json<Vec<MovieInfo>>> {
    let movies = state.app.movie_service.get_all_movies().await?;
    Ok(movie_list(movies))
}

pub async fn get_movie(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MovieInfo>> {
    let id = parse_id(&id)?;
    let movie = state.app.movie_service.get_movie(id).await?;
    Ok(Json(movie.into()))
}

pub async fn create_movie(
    _admin: AdminUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateMovieRequest>,
) -> ApiResult<impl IntoResponse> {
    let movie = state
        .app
        .movie_service
        .create_movie(NewMovie {
            name: payload.name,
            year: payload.year,
            detail: payload.detail,
            cast: payload.cast,
            genre_id: payload.genre,
            image: payload.image,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(MovieInfo::from(movie))))
}

pub async fn update_movie(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateMovieRequest>,
) -> ApiResult<Json<MovieInfo>> {
    let id = parse_id(&id)?;
    let movie = state
        .app
        .movie_service
        .update_movie(
            id,
            MovieUpdate {
                name: payload.name,
                year: payload.year,
                detail: payload.detail,
                cast: payload.cast,
                genre_id: payload.genre,
                image: payload.image,
            },
        )
        .await?;

    Ok(Json(movie.into()))
}

pub async fn delete_movie(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id = parse_id(&id)?;
    state.app.movie_service.delete_movie(id).await?;
    Ok(Json(json!({ "message": "Movie deleted successfully" })))
}

pub async fn add_review(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<AddReviewRequest>,
) -> ApiResult<impl IntoResponse> {
    let movie_id = parse_id(&id)?;
    let reviewer = user.0;
    let reviewer_id = reviewer.id.ok_or_else(|| {
        ApiError(DomainError::Unauthorized(
            "Not authorized, token failed".to_string(),
        ))
    })?;

    state
        .app
        .movie_service
        .add_review(
            movie_id,
            reviewer_id,
            reviewer.username,
            payload.rating,
            payload.comment,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(json!({ "message": "Review added" }))))
}

pub async fn delete_review(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path((id, review_id)): Path<(String, String)>,
) -> ApiResult<impl IntoResponse> {
    let movie_id = parse_id(&id)?;
    let review_id = parse_id(&review_id)?;

    state
        .app
        .movie_service
        .delete_review(movie_id, review_id)
        .await?;

    Ok(Json(json!({ "message": "Review deleted successfully" })))
}

pub async fn new_movies(State(state): State<AppState>) -> ApiResult<Json<Vec<MovieInfo>>> {
    let movies = state.app.movie_service.get_new_movies().await?;
    Ok(movie_list(movies))
}

pub async fn top_movies(State(state): State<AppState>) -> ApiResult<Json<Vec<MovieInfo>>> {
    let movies = state.app.movie_service.get_top_movies().await?;
    Ok(movie_list(movies))
}

pub async fn random_movies(State(state): State<AppState>) -> ApiResult<Json<Vec<MovieInfo>>> {
    let movies = state.app.movie_service.get_random_movies().await?;
    Ok(movie_list(movies))
}
