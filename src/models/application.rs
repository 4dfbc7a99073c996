//! Counselor-certification application model.
//!
//! Nested sections are stored as JSONB documents; document references are
//! object-storage URLs, never embedded binaries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, Hash,
)]
#[sqlx(type_name = "application_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    /// Approved and rejected applications have reached a final decision.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ApplicationStatus::Pending)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfo {
    pub full_name: String,
    pub phone_number: String,
    pub address: String,
    pub date_of_birth: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Education {
    pub degree: Option<String>,
    pub institution: Option<String>,
    pub graduation_year: Option<i32>,
    pub certificate_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfessionalInfo {
    pub education: Vec<Education>,
    pub specializations: Vec<String>,
    pub languages: Vec<String>,
    pub years_of_experience: Option<i32>,
    pub license_number: Option<String>,
    pub license_url: Option<String>,
    pub resume_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct TimeSlot {
    pub start_time: String,
    pub end_time: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Availability {
    pub day: String,
    pub slots: Vec<TimeSlot>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkPreferences {
    pub hourly_rate: f64,
    pub availability: Vec<Availability>,
}

/// Uploaded supporting documents, as object-storage URLs.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Documents {
    pub identification_url: String,
    pub photograph_url: String,
    pub work_experience_url: String,
    pub professional_license_url: String,
    pub educational_credentials_url: String,
    pub cv_url: String,
}

/// Full application row from database.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: Uuid,
    pub user_id: Uuid,
    pub personal_info: Json<PersonalInfo>,
    pub professional_info: Json<ProfessionalInfo>,
    pub work_preferences: Json<WorkPreferences>,
    pub documents: Json<Documents>,
    pub status: ApplicationStatus,
    pub submitted_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub review_notes: Option<String>,
}

/// Application row joined with the submitting user's contact details.
#[derive(Debug, Clone, FromRow)]
pub struct ApplicationWithSubmitter {
    #[sqlx(flatten)]
    pub application: Application,
    pub submitter_id: Option<Uuid>,
    pub submitter_name: Option<String>,
    pub submitter_email: Option<String>,
}

/// Name and email of the user who submitted an application.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Submitter {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Application as returned by the admin API.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationView {
    #[serde(flatten)]
    pub application: Application,
    /// `None` when the submitting user no longer exists.
    pub submitter: Option<Submitter>,
}

impl From<ApplicationWithSubmitter> for ApplicationView {
    fn from(row: ApplicationWithSubmitter) -> Self {
        let submitter = row.submitter_id.map(|id| Submitter {
            id,
            name: row.submitter_name,
            email: row.submitter_email,
        });
        Self {
            application: row.application,
            submitter,
        }
    }
}

/// Body of `PATCH /applications/{id}`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateApplicationStatus {
    pub status: ApplicationStatus,
    #[validate(length(max = 5000))]
    pub review_notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_application() -> Application {
        Application {
            id: Uuid::nil(),
            user_id: Uuid::nil(),
            personal_info: Json(PersonalInfo {
                full_name: "Ada Mensah".to_string(),
                phone_number: "+233 20 000 0000".to_string(),
                address: "12 Ring Road".to_string(),
                date_of_birth: None,
            }),
            professional_info: Json(ProfessionalInfo::default()),
            work_preferences: Json(WorkPreferences::default()),
            documents: Json(Documents::default()),
            status: ApplicationStatus::Pending,
            submitted_at: Utc::now(),
            reviewed_at: None,
            review_notes: None,
        }
    }

    #[test]
    fn application_status_serialization() {
        let json = serde_json::to_string(&ApplicationStatus::Approved).unwrap();
        assert_eq!(json, "\"APPROVED\"");
        let status: ApplicationStatus = serde_json::from_str("\"REJECTED\"").unwrap();
        assert_eq!(status, ApplicationStatus::Rejected);
    }

    #[test]
    fn only_pending_is_not_terminal() {
        assert!(!ApplicationStatus::Pending.is_terminal());
        assert!(ApplicationStatus::Approved.is_terminal());
        assert!(ApplicationStatus::Rejected.is_terminal());
    }

    #[test]
    fn nested_sections_tolerate_missing_fields() {
        let info: ProfessionalInfo =
            serde_json::from_str(r#"{"specializations":["grief"],"yearsOfExperience":4}"#)
                .unwrap();
        assert_eq!(info.specializations, vec!["grief".to_string()]);
        assert_eq!(info.years_of_experience, Some(4));
        assert!(info.languages.is_empty());
        assert!(info.license_url.is_none());
    }

    #[test]
    fn view_flattens_application_and_joins_submitter() {
        let view = ApplicationView::from(ApplicationWithSubmitter {
            application: sample_application(),
            submitter_id: Some(Uuid::nil()),
            submitter_name: Some("Ada".to_string()),
            submitter_email: Some("ada@example.com".to_string()),
        });
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["status"], "PENDING");
        assert_eq!(json["personalInfo"]["fullName"], "Ada Mensah");
        assert_eq!(json["submitter"]["email"], "ada@example.com");
        assert!(json["reviewNotes"].is_null());
    }

    #[test]
    fn view_without_submitter_serializes_null() {
        let view = ApplicationView::from(ApplicationWithSubmitter {
            application: sample_application(),
            submitter_id: None,
            submitter_name: None,
            submitter_email: None,
        });
        let json = serde_json::to_value(&view).unwrap();
        assert!(json["submitter"].is_null());
    }

    #[test]
    fn update_body_uses_camel_case() {
        let body: UpdateApplicationStatus =
            serde_json::from_str(r#"{"status":"APPROVED","reviewNotes":"looks good"}"#).unwrap();
        assert_eq!(body.status, ApplicationStatus::Approved);
        assert_eq!(body.review_notes.as_deref(), Some("looks good"));
        assert!(body.validate().is_ok());
    }

    #[test]
    fn update_body_rejects_oversized_notes() {
        let body = UpdateApplicationStatus {
            status: ApplicationStatus::Rejected,
            review_notes: Some("x".repeat(5001)),
        };
        assert!(body.validate().is_err());
    }
}
