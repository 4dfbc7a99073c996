//! Application review routes: list, inspect, and decide.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use axum_extra::extract::WithRejection;
use serde::Serialize;
use uuid::Uuid;
use validator::Validate;

use crate::errors::AppError;
use crate::middleware::rbac::RequireAdmin;
use crate::models::application::{ApplicationView, UpdateApplicationStatus};
use crate::models::pagination::{PagedResult, Pagination};
use crate::services::application as app_service;
use crate::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationList {
    pub applications: Vec<ApplicationView>,
    pub total: i64,
    pub page: i64,
    pub total_pages: i64,
}

impl From<PagedResult<ApplicationView>> for ApplicationList {
    fn from(page: PagedResult<ApplicationView>) -> Self {
        Self {
            applications: page.items,
            total: page.total,
            page: page.page,
            total_pages: page.total_pages,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UpdateResponse {
    pub message: &'static str,
}

/// GET /api/applications: newest submissions first, with submitter.
pub async fn list(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    WithRejection(Query(pagination), _): WithRejection<Query<Pagination>, AppError>,
) -> Result<Json<ApplicationList>, AppError> {
    let page = app_service::list(&state.db, &pagination).await?;
    Ok(Json(page.into()))
}

/// GET /api/applications/{id}: full application detail.
pub async fn get_by_id(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, AppError>,
) -> Result<Json<ApplicationView>, AppError> {
    let app = app_service::find_view(&state.db, id).await?;
    Ok(Json(app))
}

/// PATCH /api/applications/{id}: record an approve/reject decision.
pub async fn update_status(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, AppError>,
    WithRejection(Json(body), _): WithRejection<Json<UpdateApplicationStatus>, AppError>,
) -> Result<Json<UpdateResponse>, AppError> {
    body.validate()?;
    let outcome = app_service::update_status(&state.db, id, &body, admin.id).await?;
    tracing::info!(
        application_id = %outcome.application_id,
        role_promoted = outcome.role_promoted,
        profile_created = outcome.profile_created,
        "Review decision applied"
    );
    Ok(Json(UpdateResponse {
        message: "Application updated successfully",
    }))
}
