//! Stats query service: loads the records behind report aggregations.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;

use crate::errors::AppError;
use crate::models::application::ApplicationStatus;
use crate::models::user::UserRole;
use crate::services::aggregation::{RoleCounts, StatusCounts, Tallied};

/// Inclusive time window. A missing bound leaves that side open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl DateRange {
    /// Build a range from request bounds.
    ///
    /// Empty strings mean "no bound". Accepts RFC 3339 timestamps or bare
    /// `YYYY-MM-DD` dates, which are read as midnight UTC.
    pub fn parse(start: Option<&str>, end: Option<&str>) -> Result<Self, AppError> {
        Ok(Self {
            start: parse_bound("start", start)?,
            end: parse_bound("end", end)?,
        })
    }
}

fn parse_bound(name: &str, value: Option<&str>) -> Result<Option<DateTime<Utc>>, AppError> {
    let Some(raw) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(ts.with_timezone(&Utc)));
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| Some(midnight.and_utc()))
        .ok_or_else(|| AppError::Validation(format!("Invalid {name} date: {raw}")))
}

/// Submission time and status of one application.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ApplicationStat {
    pub submitted_at: DateTime<Utc>,
    pub status: ApplicationStatus,
}

impl Tallied for ApplicationStat {
    type Counts = StatusCounts;

    fn timestamp(&self) -> DateTime<Utc> {
        self.submitted_at
    }

    fn category(&self) -> ApplicationStatus {
        self.status
    }
}

/// Creation time and role of one user.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserStat {
    pub created_at: DateTime<Utc>,
    pub role: Option<UserRole>,
}

impl Tallied for UserStat {
    type Counts = RoleCounts;

    fn timestamp(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Users without a stored role are counted as clients.
    fn category(&self) -> UserRole {
        self.role.unwrap_or_default()
    }
}

/// Applications submitted within `range`.
pub async fn fetch_application_stats(
    pool: &PgPool,
    range: &DateRange,
) -> Result<Vec<ApplicationStat>, AppError> {
    let rows = sqlx::query_as::<_, ApplicationStat>(
        r#"
        SELECT submitted_at, status
        FROM counselor_applications
        WHERE ($1::timestamptz IS NULL OR submitted_at >= $1)
          AND ($2::timestamptz IS NULL OR submitted_at <= $2)
        "#,
    )
    .bind(range.start)
    .bind(range.end)
    .fetch_all(pool)
    .await?;

    tracing::debug!(count = rows.len(), ?range, "Loaded application stats");
    Ok(rows)
}

/// Users created within `range`.
pub async fn fetch_user_stats(pool: &PgPool, range: &DateRange) -> Result<Vec<UserStat>, AppError> {
    let rows = sqlx::query_as::<_, UserStat>(
        r#"
        SELECT created_at, role
        FROM users
        WHERE ($1::timestamptz IS NULL OR created_at >= $1)
          AND ($2::timestamptz IS NULL OR created_at <= $2)
        "#,
    )
    .bind(range.start)
    .bind(range.end)
    .fetch_all(pool)
    .await?;

    tracing::debug!(count = rows.len(), ?range, "Loaded user stats");
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn empty_bounds_are_open() {
        let range = DateRange::parse(Some(""), None).unwrap();
        assert_eq!(range, DateRange::default());
    }

    #[test]
    fn bare_dates_are_midnight_utc() {
        let range = DateRange::parse(Some("2024-03-01"), Some("2024-03-31")).unwrap();
        assert_eq!(
            range.start,
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(
            range.end,
            Some(Utc.with_ymd_and_hms(2024, 3, 31, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn rfc3339_bounds_keep_their_instant() {
        let range = DateRange::parse(Some("2024-03-04T08:00:00+02:00"), None).unwrap();
        assert_eq!(
            range.start,
            Some(Utc.with_ymd_and_hms(2024, 3, 4, 6, 0, 0).unwrap())
        );
    }

    #[test]
    fn invalid_bound_is_a_validation_error() {
        let err = DateRange::parse(Some("last tuesday"), None).unwrap_err();
        assert!(matches!(err, AppError::Validation(ref msg) if msg.contains("start")));
        let err = DateRange::parse(None, Some("2024-13-01")).unwrap_err();
        assert!(matches!(err, AppError::Validation(ref msg) if msg.contains("end")));
    }

    #[test]
    fn user_without_role_is_a_client() {
        let stat = UserStat {
            created_at: Utc::now(),
            role: None,
        };
        assert_eq!(stat.category(), UserRole::Client);
    }
}
