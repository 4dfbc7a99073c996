//! Dashboard routes: summary counts, report chart data, and XLSX export.

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::WithRejection;
use serde::Deserialize;

use crate::errors::AppError;
use crate::middleware::rbac::RequireAdmin;
use crate::services::dashboard::{self, DashboardStats, ReportStats};
use crate::services::period::PeriodMode;
use crate::services::report::{REPORT_DISPOSITION, XLSX_CONTENT_TYPE};
use crate::services::stats::DateRange;
use crate::AppState;

/// Body of both report endpoints. Empty or missing bounds are open.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportRequest {
    pub period: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}

impl ReportRequest {
    fn resolve(&self) -> Result<(PeriodMode, DateRange), AppError> {
        let mode = PeriodMode::from_name(self.period.as_deref());
        let range = DateRange::parse(self.start.as_deref(), self.end.as_deref())?;
        Ok((mode, range))
    }
}

/// GET /api/dashboard/stats: headline counts.
pub async fn stats(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<DashboardStats>, AppError> {
    let stats = dashboard::get_stats(&state.db).await?;
    Ok(Json(stats))
}

/// POST /api/dashboard/reports/stats: bucketed rows for the charts.
pub async fn report_stats(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    WithRejection(Json(body), _): WithRejection<Json<ReportRequest>, AppError>,
) -> Result<Json<ReportStats>, AppError> {
    let (mode, range) = body.resolve()?;
    let stats =
        dashboard::report_stats(&state.db, mode, &range, &state.config.report_zone).await?;
    Ok(Json(stats))
}

/// POST /api/dashboard/reports: the application report as an XLSX download.
pub async fn download_report(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    WithRejection(Json(body), _): WithRejection<Json<ReportRequest>, AppError>,
) -> Result<Response, AppError> {
    let (mode, range) = body.resolve()?;
    let bytes =
        dashboard::application_report(&state.db, mode, &range, &state.config.report_zone)
            .await?;

    Ok((
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE),
            (header::CONTENT_DISPOSITION, REPORT_DISPOSITION),
        ],
        bytes,
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_request_defaults_to_monthly_and_open_range() {
        let body: ReportRequest = serde_json::from_str("{}").unwrap();
        let (mode, range) = body.resolve().unwrap();
        assert_eq!(mode, PeriodMode::Monthly);
        assert_eq!(range, DateRange::default());
    }

    #[test]
    fn report_request_accepts_form_values() {
        let body: ReportRequest =
            serde_json::from_str(r#"{"period":"weekly","start":"2024-03-01","end":""}"#).unwrap();
        let (mode, range) = body.resolve().unwrap();
        assert_eq!(mode, PeriodMode::Weekly);
        assert!(range.start.is_some());
        assert!(range.end.is_none());
    }

    #[test]
    fn report_request_rejects_bad_dates() {
        let body = ReportRequest {
            period: None,
            start: Some("03/01/2024".to_string()),
            end: None,
        };
        assert!(matches!(body.resolve(), Err(AppError::Validation(_))));
    }
}
