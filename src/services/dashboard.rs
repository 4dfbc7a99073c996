//! Dashboard summary counts and periodic report assembly.

use chrono::Local;
use serde::Serialize;
use sqlx::PgPool;

use crate::errors::AppError;
use crate::models::application::ApplicationStatus;
use crate::services::aggregation::{
    aggregate, sort_chronologically, ApplicationRow, Bucket, Tallied, UserRow,
};
use crate::services::period::{PeriodMode, ReportZone};
use crate::services::report;
use crate::services::stats::{self, DateRange};

/// Headline counts for the dashboard overview page.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_users: i64,
    pub total_applications: i64,
    pub pending_applications: i64,
    pub approved_applications: i64,
    pub rejected_applications: i64,
}

/// Application and user rows for the report charts.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportStats {
    pub application_stats: Vec<ApplicationRow>,
    pub user_stats: Vec<UserRow>,
}

/// Fetch all summary counts concurrently.
pub async fn get_stats(pool: &PgPool) -> Result<DashboardStats, AppError> {
    let (total_users, total_applications, pending, approved, rejected) = tokio::try_join!(
        fetch_user_count(pool),
        fetch_application_count(pool),
        fetch_status_count(pool, ApplicationStatus::Pending),
        fetch_status_count(pool, ApplicationStatus::Approved),
        fetch_status_count(pool, ApplicationStatus::Rejected),
    )?;

    Ok(DashboardStats {
        total_users,
        total_applications,
        pending_applications: pending,
        approved_applications: approved,
        rejected_applications: rejected,
    })
}

async fn fetch_user_count(pool: &PgPool) -> Result<i64, AppError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

async fn fetch_application_count(pool: &PgPool) -> Result<i64, AppError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM counselor_applications")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

async fn fetch_status_count(pool: &PgPool, status: ApplicationStatus) -> Result<i64, AppError> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM counselor_applications WHERE status = $1",
    )
    .bind(status)
    .fetch_one(pool)
    .await?;
    Ok(count)
}

/// Application rows bucketed by `mode` for submissions within `range`.
pub async fn application_rows(
    pool: &PgPool,
    mode: PeriodMode,
    range: &DateRange,
    zone: &ReportZone,
) -> Result<Vec<ApplicationRow>, AppError> {
    let apps = stats::fetch_application_stats(pool, range).await?;
    Ok(bucketed(&apps, mode, zone))
}

/// Application and user rows for the same period mode and range.
pub async fn report_stats(
    pool: &PgPool,
    mode: PeriodMode,
    range: &DateRange,
    zone: &ReportZone,
) -> Result<ReportStats, AppError> {
    let (apps, users) = tokio::try_join!(
        stats::fetch_application_stats(pool, range),
        stats::fetch_user_stats(pool, range),
    )?;

    Ok(ReportStats {
        application_stats: bucketed(&apps, mode, zone),
        user_stats: bucketed(&users, mode, zone),
    })
}

/// Rows are fetched unordered, so buckets are returned in calendar order.
fn bucketed<R: Tallied>(
    records: &[R],
    mode: PeriodMode,
    zone: &ReportZone,
) -> Vec<Bucket<R::Counts>> {
    let mut rows = match zone {
        ReportZone::Fixed(offset) => aggregate(records, mode, offset),
        ReportZone::Named(tz) => aggregate(records, mode, tz),
        ReportZone::Local => aggregate(records, mode, &Local),
    };
    sort_chronologically(&mut rows);
    rows
}

/// Build the downloadable application report.
///
/// Workbook serialization is CPU-bound, so it runs on the blocking pool.
pub async fn application_report(
    pool: &PgPool,
    mode: PeriodMode,
    range: &DateRange,
    zone: &ReportZone,
) -> Result<Vec<u8>, AppError> {
    let rows = application_rows(pool, mode, range, zone).await?;
    let row_count = rows.len();

    let bytes = tokio::task::spawn_blocking(move || report::render_application_report(&rows))
        .await
        .map_err(|e| AppError::Internal(format!("Report task failed: {e}")))??;

    tracing::info!(?mode, rows = row_count, bytes = bytes.len(), "Rendered application report");
    Ok(bytes)
}
