//! User directory routes.

use axum::{
    extract::{Query, State},
    Json,
};
use axum_extra::extract::WithRejection;
use serde::Serialize;

use crate::errors::AppError;
use crate::middleware::rbac::RequireAdmin;
use crate::models::pagination::{PagedResult, Pagination};
use crate::models::user::UserResponse;
use crate::services::user as user_service;
use crate::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserList {
    pub users: Vec<UserResponse>,
    pub total: i64,
    pub page: i64,
    pub total_pages: i64,
}

impl From<PagedResult<UserResponse>> for UserList {
    fn from(page: PagedResult<UserResponse>) -> Self {
        Self {
            users: page.items,
            total: page.total,
            page: page.page,
            total_pages: page.total_pages,
        }
    }
}

/// GET /api/users: newest accounts first.
pub async fn list(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    WithRejection(Query(pagination), _): WithRejection<Query<Pagination>, AppError>,
) -> Result<Json<UserList>, AppError> {
    let page = user_service::list(&state.db, &pagination).await?;
    Ok(Json(page.into()))
}
