//! Session extractor for Axum handlers.

use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::CookieJar;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::UserRole;
use crate::services::auth as auth_service;
use crate::AppState;

/// Cookie carrying the session token for browser clients.
pub const SESSION_COOKIE: &str = "session_token";

/// Authenticated principal of the current request.
///
/// Read from an `Authorization: Bearer` header, or from the session cookie
/// when no header is sent:
/// ```ignore
/// async fn handler(current_user: CurrentUser) -> impl IntoResponse { ... }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
    pub role: UserRole,
}

fn session_token(parts: &Parts) -> Option<String> {
    let bearer = parts
        .headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string);

    bearer.or_else(|| {
        CookieJar::from_headers(&parts.headers)
            .get(SESSION_COOKIE)
            .map(|cookie| cookie.value().to_string())
    })
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = session_token(parts).ok_or(AppError::Unauthorized)?;

        let claims = auth_service::validate_token(&token, &state.config.jwt_secret)?;

        if claims.token_type != "access" {
            return Err(AppError::Unauthorized);
        }

        let user_id: Uuid = claims
            .user_id
            .parse()
            .map_err(|_| AppError::Unauthorized)?;

        let role = UserRole::parse(&claims.role).ok_or(AppError::Unauthorized)?;

        Ok(CurrentUser {
            id: user_id,
            email: claims.sub,
            role,
        })
    }
}
