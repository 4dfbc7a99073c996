//! Role-based access control extractor for Axum handlers.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::errors::AppError;
use crate::middleware::auth::CurrentUser;
use crate::models::user::UserRole;
use crate::AppState;

/// Extractor that requires an administrator session.
///
/// Non-admin sessions are rejected exactly like missing ones.
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub CurrentUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = CurrentUser::from_request_parts(parts, state).await?;
        if user.role != UserRole::Admin {
            tracing::warn!(user_id = %user.id, role = ?user.role, "Non-admin session rejected");
            return Err(AppError::Unauthorized);
        }
        Ok(RequireAdmin(user))
    }
}
