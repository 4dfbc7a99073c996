//! Session routes: login, refresh, and the current principal.

use axum::{extract::State, Json};
use axum_extra::extract::WithRejection;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::errors::AppError;
use crate::middleware::auth::CurrentUser;
use crate::models::user::UserRole;
use crate::services::auth::{self as auth_service, TokenPair, TokenSettings};
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub id: Uuid,
    pub email: String,
    pub role: UserRole,
}

fn token_settings(state: &AppState) -> TokenSettings<'_> {
    TokenSettings {
        secret: &state.config.jwt_secret,
        access_expiry_secs: state.config.jwt_access_token_expiry_secs,
        refresh_expiry_secs: state.config.jwt_refresh_token_expiry_secs,
    }
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    WithRejection(Json(body), _): WithRejection<Json<LoginRequest>, AppError>,
) -> Result<Json<TokenPair>, AppError> {
    body.validate()?;
    let tokens =
        auth_service::login(&state.db, &body.email, &body.password, token_settings(&state))
            .await?;
    Ok(Json(tokens))
}

/// POST /api/auth/refresh
pub async fn refresh(
    State(state): State<AppState>,
    WithRejection(Json(body), _): WithRejection<Json<RefreshRequest>, AppError>,
) -> Result<Json<TokenPair>, AppError> {
    let tokens =
        auth_service::refresh_token(&state.db, &body.refresh_token, token_settings(&state))
            .await?;
    Ok(Json(tokens))
}

/// GET /api/auth/me: the principal behind the current session.
pub async fn me(current_user: CurrentUser) -> Json<SessionResponse> {
    Json(SessionResponse {
        id: current_user.id,
        email: current_user.email,
        role: current_user.role,
    })
}
