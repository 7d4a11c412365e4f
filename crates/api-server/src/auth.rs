use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::cookie::{Cookie, CookieJar};
use domain::{DomainError, User};

use crate::error::ApiError;
use crate::AppState;

pub const SESSION_COOKIE: &str = "session";

/// Authenticated requester, resolved from the session cookie. Extraction
/// runs before the handler body, so a bad or missing token never reaches a
/// workflow.
pub struct AuthUser(pub User);

/// Authenticated requester with the admin flag set.
pub struct AdminUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar
            .get(SESSION_COOKIE)
            .map(|c| c.value().to_string())
            .ok_or_else(|| {
                ApiError(DomainError::Unauthorized(
                    "Not authorized, no token".to_string(),
                ))
            })?;

        let user_id = state.app.session_service.verify(&token)?;

        // The account behind a valid token may have been removed since the
        // token was issued.
        let user = state.app.user_service.get_user(user_id).await.map_err(|_| {
            ApiError(DomainError::Unauthorized(
                "Not authorized, token failed".to_string(),
            ))
        })?;

        Ok(AuthUser(user))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let AuthUser(user) = AuthUser::from_request_parts(parts, state).await?;
        if !user.is_admin {
            return Err(ApiError(DomainError::Forbidden(
                "Not authorized as an admin".to_string(),
            )));
        }
        Ok(AdminUser(user))
    }
}

/// httpOnly session cookie carrying the signed token.
pub fn session_cookie(token: String, ttl_days: i64) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .max_age(time::Duration::days(ttl_days))
        .build()
}

/// Logout is advisory: replace the cookie with one that is already expired
/// and let the token age out on its own.
pub fn expired_session_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .http_only(true)
        .expires(time::OffsetDateTime::UNIX_EPOCH)
        .build()
}
