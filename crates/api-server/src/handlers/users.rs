use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use axum_extra::extract::cookie::CookieJar;
use domain::{DomainError, ProfileUpdate, User};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::auth::{self, AdminUser, AuthUser};
use crate::error::{ApiError, ApiResult};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateProfileRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Public projection - the password hash never leaves the backend.
#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: Option<Uuid>,
    pub username: String,
    pub email: String,
    pub is_admin: bool,
}

impl From<User> for UserInfo {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            is_admin: user.is_admin,
        }
    }
}

fn persisted_id(user: &User) -> Result<Uuid, ApiError> {
    user.id.ok_or_else(|| {
        ApiError(DomainError::RepositoryError(
            "user id missing after save".to_string(),
        ))
    })
}

pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult<impl IntoResponse> {
    let user = state
        .app
        .user_service
        .register(payload.username, payload.email, payload.password)
        .await?;

    let token = state.app.session_service.issue(persisted_id(&user)?)?;
    let jar = jar.add(auth::session_cookie(token, state.config.session_ttl_days));

    Ok((StatusCode::CREATED, jar, Json(UserInfo::from(user))))
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    let user = state
        .app
        .user_service
        .login(&payload.email, &payload.password)
        .await?;

    let token = state.app.session_service.issue(persisted_id(&user)?)?;
    let jar = jar.add(auth::session_cookie(token, state.config.session_ttl_days));

    Ok((StatusCode::CREATED, jar, Json(UserInfo::from(user))))
}

pub async fn logout(_user: AuthUser, jar: CookieJar) -> ApiResult<impl IntoResponse> {
    let jar = jar.add(auth::expired_session_cookie());
    Ok((
        StatusCode::OK,
        jar,
        Json(json!({ "message": "Logged out successfully" })),
    ))
}

pub async fn list_users(
    _admin: AdminUser,
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<UserInfo>>> {
    let users = state.app.user_service.get_all_users().await?;
    Ok(Json(users.into_iter().map(Into::into).collect()))
}

pub async fn profile(user: AuthUser) -> Json<UserInfo> {
    Json(UserInfo::from(user.0))
}

pub async fn update_profile(
    user: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<UpdateProfileRequest>,
) -> ApiResult<Json<UserInfo>> {
    let id = persisted_id(&user.0)?;
    let updated = state
        .app
        .user_service
        .update_profile(
            id,
            ProfileUpdate {
                username: payload.username,
                email: payload.email,
                password: payload.password,
            },
        )
        .await?;

    Ok(Json(UserInfo::from(updated)))
}
