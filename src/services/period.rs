//! Period classifier: maps a timestamp to its weekly or monthly bucket key.

use chrono::{DateTime, Datelike, Duration, FixedOffset, TimeZone, Utc};
use chrono_tz::Tz;
use serde::Serialize;

/// Report granularity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodMode {
    Weekly,
    #[default]
    Monthly,
}

impl PeriodMode {
    /// Resolve a requested mode. Anything other than `"weekly"` or
    /// `"monthly"`, including no value at all, is monthly.
    pub fn from_name(name: Option<&str>) -> Self {
        match name {
            Some("weekly") => PeriodMode::Weekly,
            _ => PeriodMode::Monthly,
        }
    }
}

/// Time zone whose calendar decides which bucket a timestamp falls in.
///
/// Named and host-local zones follow daylight-saving changes, so each
/// timestamp is placed using the offset in force at that instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportZone {
    Fixed(FixedOffset),
    Named(Tz),
    Local,
}

/// Bucket key for `timestamp` as seen in the `tz` time zone.
///
/// Weekly keys are the `YYYY-MM-DD` date of the Monday starting the
/// timestamp's week (Sunday closes the week). Monthly keys are `YYYY-MM`.
pub fn period_key<Tz: TimeZone>(timestamp: &DateTime<Utc>, mode: PeriodMode, tz: &Tz) -> String {
    let local = timestamp.with_timezone(tz).date_naive();
    match mode {
        PeriodMode::Weekly => {
            let days_since_monday = i64::from(local.weekday().num_days_from_monday());
            let monday = local - Duration::days(days_since_monday);
            monday.format("%Y-%m-%d").to_string()
        }
        PeriodMode::Monthly => format!("{:04}-{:02}", local.year(), local.month()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Offset, Weekday};
    use chrono_tz::Europe::Berlin;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn monday_and_sunday_share_a_week() {
        let monday = utc(2024, 3, 4, 9, 0);
        let sunday = utc(2024, 3, 10, 18, 30);
        assert_eq!(period_key(&monday, PeriodMode::Weekly, &Utc), "2024-03-04");
        assert_eq!(period_key(&sunday, PeriodMode::Weekly, &Utc), "2024-03-04");
    }

    #[test]
    fn sunday_maps_six_days_back() {
        let sunday = utc(2024, 3, 3, 0, 0);
        assert_eq!(period_key(&sunday, PeriodMode::Weekly, &Utc), "2024-02-26");
    }

    #[test]
    fn weekly_key_crosses_month_and_year_boundaries() {
        let new_year = utc(2025, 1, 1, 12, 0);
        assert_eq!(period_key(&new_year, PeriodMode::Weekly, &Utc), "2024-12-30");
    }

    #[test]
    fn weekly_key_is_always_a_monday_and_stable_within_the_week() {
        let start = utc(2023, 12, 25, 0, 0);
        for hour in (0..24 * 60).step_by(7) {
            let ts = start + Duration::hours(hour);
            let key = period_key(&ts, PeriodMode::Weekly, &Utc);
            let date = NaiveDate::parse_from_str(&key, "%Y-%m-%d").unwrap();
            assert_eq!(date.weekday(), Weekday::Mon, "key {key} for {ts}");

            let span_start = ts.date_naive()
                - Duration::days(i64::from(ts.weekday().num_days_from_monday()));
            for offset in 0..7 {
                let same_week = span_start.and_hms_opt(13, 0, 0).unwrap().and_utc()
                    + Duration::days(offset);
                assert_eq!(period_key(&same_week, PeriodMode::Weekly, &Utc), key);
            }
        }
    }

    #[test]
    fn weekly_key_uses_local_calendar_date() {
        // Sunday 23:30 UTC is already Monday in UTC+02:00.
        let ts = utc(2024, 3, 10, 23, 30);
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        assert_eq!(period_key(&ts, PeriodMode::Weekly, &Utc), "2024-03-04");
        assert_eq!(period_key(&ts, PeriodMode::Weekly, &plus_two), "2024-03-11");
    }

    #[test]
    fn monthly_key_uses_local_year_and_month() {
        let ts = utc(2024, 1, 31, 22, 0);
        let plus_three = FixedOffset::east_opt(3 * 3600).unwrap();
        assert_eq!(period_key(&ts, PeriodMode::Monthly, &Utc), "2024-01");
        assert_eq!(period_key(&ts, PeriodMode::Monthly, &plus_three), "2024-02");
    }

    #[test]
    fn monthly_key_pads_month() {
        let ts = utc(2024, 9, 15, 0, 0);
        assert_eq!(period_key(&ts, PeriodMode::Monthly, &Utc), "2024-09");
    }

    #[test]
    fn unknown_modes_fall_back_to_monthly() {
        assert_eq!(PeriodMode::from_name(Some("weekly")), PeriodMode::Weekly);
        assert_eq!(PeriodMode::from_name(Some("monthly")), PeriodMode::Monthly);
        let ts = utc(2024, 3, 10, 8, 0);
        for name in [None, Some(""), Some("daily"), Some("WEEKLY"), Some("yearly")] {
            let mode = PeriodMode::from_name(name);
            assert_eq!(mode, PeriodMode::Monthly);
            assert_eq!(
                period_key(&ts, mode, &Utc),
                period_key(&ts, PeriodMode::Monthly, &Utc)
            );
        }
    }

    #[test]
    fn named_zone_follows_daylight_saving() {
        // Sunday 2026-12-06 23:30 in Berlin (CET, UTC+1).
        let ts = utc(2026, 12, 6, 22, 30);
        assert_eq!(period_key(&ts, PeriodMode::Weekly, &Berlin), "2026-11-30");

        // An offset captured in summer (CEST, UTC+2) would push it into the next week.
        let summer = Berlin
            .from_utc_datetime(&utc(2026, 7, 1, 12, 0).naive_utc())
            .offset()
            .fix();
        assert_eq!(summer.local_minus_utc(), 2 * 3600);
        assert_eq!(period_key(&ts, PeriodMode::Weekly, &summer), "2026-12-07");
    }

    #[test]
    fn named_zone_month_boundary_uses_winter_offset() {
        // 2026-01-31 23:30 UTC is already February in Berlin.
        let ts = utc(2026, 1, 31, 23, 30);
        assert_eq!(period_key(&ts, PeriodMode::Monthly, &Berlin), "2026-02");
        // 2026-03-31 22:30 UTC is 00:30 CEST on April 1st.
        let ts = utc(2026, 3, 31, 22, 30);
        assert_eq!(period_key(&ts, PeriodMode::Monthly, &Berlin), "2026-04");
    }
}
