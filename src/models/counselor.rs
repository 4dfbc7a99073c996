//! Counselor profile derived from an approved application.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::application::{Application, Availability, PersonalInfo};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct CounselorProfessionalInfo {
    pub specializations: Vec<String>,
    pub languages: Vec<String>,
    pub years_of_experience: Option<i32>,
    pub license_number: Option<String>,
    pub license_url: Option<String>,
    pub resume_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct CounselorWorkPreferences {
    pub hourly_rate: f64,
    pub availability: Vec<Availability>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Counselor {
    pub id: Uuid,
    pub user_id: Uuid,
    pub personal_info: Json<PersonalInfo>,
    pub professional_info: Json<CounselorProfessionalInfo>,
    pub work_preferences: Json<CounselorWorkPreferences>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Snapshot of the application fields copied into a new counselor profile.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCounselorProfile {
    pub user_id: Uuid,
    pub personal_info: PersonalInfo,
    pub professional_info: CounselorProfessionalInfo,
    pub work_preferences: CounselorWorkPreferences,
    pub image_url: Option<String>,
}

impl NewCounselorProfile {
    /// Copy the published subset of an application.
    ///
    /// Uploaded documents take the place of the self-declared links: the
    /// professional license document becomes the license reference, the CV
    /// becomes the resume and the photograph becomes the profile image.
    pub fn from_application(application: &Application) -> Self {
        let professional = &application.professional_info.0;
        let documents = &application.documents.0;
        let work = &application.work_preferences.0;

        Self {
            user_id: application.user_id,
            personal_info: application.personal_info.0.clone(),
            professional_info: CounselorProfessionalInfo {
                specializations: professional.specializations.clone(),
                languages: professional.languages.clone(),
                years_of_experience: professional.years_of_experience,
                license_number: professional.license_number.clone(),
                license_url: non_empty(&documents.professional_license_url),
                resume_url: non_empty(&documents.cv_url),
            },
            work_preferences: CounselorWorkPreferences {
                hourly_rate: work.hourly_rate,
                availability: work.availability.clone(),
            },
            image_url: non_empty(&documents.photograph_url),
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::application::{
        ApplicationStatus, Documents, Education, ProfessionalInfo, TimeSlot, WorkPreferences,
    };

    fn approved_application() -> Application {
        Application {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            personal_info: Json(PersonalInfo {
                full_name: "Kofi Boateng".to_string(),
                phone_number: "+233 24 111 2222".to_string(),
                address: "4 Oxford Street".to_string(),
                date_of_birth: None,
            }),
            professional_info: Json(ProfessionalInfo {
                education: vec![Education {
                    degree: Some("MSc Counselling".to_string()),
                    ..Default::default()
                }],
                specializations: vec!["anxiety".to_string(), "family".to_string()],
                languages: vec!["en".to_string(), "tw".to_string()],
                years_of_experience: Some(7),
                license_number: Some("GH-4411".to_string()),
                license_url: Some("https://old.example/license".to_string()),
                resume_url: Some("https://old.example/resume".to_string()),
            }),
            work_preferences: Json(WorkPreferences {
                hourly_rate: 45.0,
                availability: vec![Availability {
                    day: "Monday".to_string(),
                    slots: vec![TimeSlot {
                        start_time: "09:00".to_string(),
                        end_time: "12:00".to_string(),
                    }],
                }],
            }),
            documents: Json(Documents {
                identification_url: "https://files.example/id.pdf".to_string(),
                photograph_url: "https://files.example/photo.jpg".to_string(),
                work_experience_url: "https://files.example/work.pdf".to_string(),
                professional_license_url: "https://files.example/license.pdf".to_string(),
                educational_credentials_url: "https://files.example/degree.pdf".to_string(),
                cv_url: "https://files.example/cv.pdf".to_string(),
            }),
            status: ApplicationStatus::Approved,
            submitted_at: Utc::now(),
            reviewed_at: Some(Utc::now()),
            review_notes: None,
        }
    }

    #[test]
    fn document_fields_are_remapped() {
        let app = approved_application();
        let profile = NewCounselorProfile::from_application(&app);

        assert_eq!(
            profile.professional_info.license_url.as_deref(),
            Some("https://files.example/license.pdf")
        );
        assert_eq!(
            profile.professional_info.resume_url.as_deref(),
            Some("https://files.example/cv.pdf")
        );
        assert_eq!(
            profile.image_url.as_deref(),
            Some("https://files.example/photo.jpg")
        );
    }

    #[test]
    fn profile_copies_personal_and_work_sections() {
        let app = approved_application();
        let profile = NewCounselorProfile::from_application(&app);

        assert_eq!(profile.user_id, app.user_id);
        assert_eq!(profile.personal_info, app.personal_info.0);
        assert_eq!(profile.professional_info.specializations.len(), 2);
        assert_eq!(profile.professional_info.years_of_experience, Some(7));
        assert_eq!(
            profile.professional_info.license_number.as_deref(),
            Some("GH-4411")
        );
        assert_eq!(profile.work_preferences.hourly_rate, 45.0);
        assert_eq!(profile.work_preferences.availability[0].slots.len(), 1);
    }

    #[test]
    fn blank_documents_become_none() {
        let mut app = approved_application();
        app.documents.0.photograph_url = "   ".to_string();
        app.documents.0.cv_url = String::new();
        let profile = NewCounselorProfile::from_application(&app);
        assert!(profile.image_url.is_none());
        assert!(profile.professional_info.resume_url.is_none());
    }
}
