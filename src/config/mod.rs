use std::env;

use chrono::FixedOffset;
use chrono_tz::Tz;

use crate::services::period::ReportZone;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub database_max_connections: u32,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_access_token_expiry_secs: i64,
    pub jwt_refresh_token_expiry_secs: i64,
    pub frontend_url: String,
    /// Time zone used to place timestamps into weekly/monthly report buckets.
    pub report_zone: ReportZone,
    pub tls_cert_path: Option<String>,
    pub tls_key_path: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")?,
            database_max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .unwrap_or(10),
            host: env::var("BACKEND_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("BACKEND_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap_or(3000),
            jwt_secret: env::var("JWT_SECRET")?,
            jwt_access_token_expiry_secs: env::var("JWT_ACCESS_TOKEN_EXPIRY_SECS")
                .unwrap_or_else(|_| "900".to_string())
                .parse()
                .unwrap_or(900),
            jwt_refresh_token_expiry_secs: env::var("JWT_REFRESH_TOKEN_EXPIRY_SECS")
                .unwrap_or_else(|_| "604800".to_string())
                .parse()
                .unwrap_or(604800),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3001".to_string()),
            report_zone: report_zone(
                env::var("REPORT_UTC_OFFSET_MINUTES").ok().as_deref(),
                env::var("REPORT_TIME_ZONE").ok().as_deref(),
            ),
            tls_cert_path: env::var("TLS_CERT_PATH").ok().filter(|v| !v.is_empty()),
            tls_key_path: env::var("TLS_KEY_PATH").ok().filter(|v| !v.is_empty()),
        })
    }

    /// Both TLS paths, when HTTPS is configured.
    pub fn tls_paths(&self) -> Option<(&str, &str)> {
        match (&self.tls_cert_path, &self.tls_key_path) {
            (Some(cert), Some(key)) => Some((cert.as_str(), key.as_str())),
            _ => None,
        }
    }
}

fn offset_from_minutes(minutes: i32) -> Option<FixedOffset> {
    minutes.checked_mul(60).and_then(FixedOffset::east_opt)
}

/// A valid fixed offset wins over a named zone; with neither, the host's
/// local zone is used, daylight saving included.
fn report_zone(offset_minutes: Option<&str>, time_zone: Option<&str>) -> ReportZone {
    if let Some(offset) = offset_minutes
        .and_then(|v| v.trim().parse::<i32>().ok())
        .and_then(offset_from_minutes)
    {
        return ReportZone::Fixed(offset);
    }

    match time_zone.map(str::trim).filter(|v| !v.is_empty()) {
        Some(name) => match name.parse::<Tz>() {
            Ok(tz) => ReportZone::Named(tz),
            Err(e) => {
                tracing::warn!(time_zone = name, error = %e, "Unknown REPORT_TIME_ZONE, using host zone");
                ReportZone::Local
            }
        },
        None => ReportZone::Local,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_from_minutes_accepts_valid_offsets() {
        assert_eq!(offset_from_minutes(120).unwrap().local_minus_utc(), 7200);
        assert_eq!(offset_from_minutes(-300).unwrap().local_minus_utc(), -18000);
    }

    #[test]
    fn offset_from_minutes_rejects_out_of_range() {
        assert!(offset_from_minutes(24 * 60).is_none());
        assert!(offset_from_minutes(i32::MAX).is_none());
    }

    #[test]
    fn report_zone_defaults_to_host_local() {
        assert_eq!(report_zone(None, None), ReportZone::Local);
        assert_eq!(report_zone(Some(""), Some("")), ReportZone::Local);
        assert_eq!(report_zone(Some("abc"), None), ReportZone::Local);
    }

    #[test]
    fn report_zone_prefers_fixed_offset() {
        assert_eq!(
            report_zone(Some("-300"), Some("Europe/Berlin")),
            ReportZone::Fixed(FixedOffset::west_opt(5 * 3600).unwrap())
        );
    }

    #[test]
    fn report_zone_parses_iana_names() {
        assert_eq!(
            report_zone(None, Some("Europe/Berlin")),
            ReportZone::Named(chrono_tz::Europe::Berlin)
        );
        assert_eq!(report_zone(None, Some("Mars/Olympus")), ReportZone::Local);
    }
}
