//! Health check endpoints for liveness and readiness checks.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::AppState;

/// Readiness check detail.
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub database: String,
}

/// Liveness: always returns OK if the process is running.
pub async fn live() -> &'static str {
    "OK"
}

/// Readiness: checks database connectivity.
pub async fn ready(State(state): State<AppState>) -> (StatusCode, Json<HealthStatus>) {
    match sqlx::query("SELECT 1").execute(&state.db).await {
        Ok(_) => (
            StatusCode::OK,
            Json(HealthStatus {
                status: "ok".to_string(),
                database: "connected".to_string(),
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Database health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthStatus {
                    status: "degraded".to_string(),
                    database: "unavailable".to_string(),
                }),
            )
        }
    }
}
