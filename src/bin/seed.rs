//! Seed script for development: populates a fresh database with sample data.
//!
//! Usage: `cargo run --bin seed`
//!
//! Requires `DATABASE_URL` (reads .env).

use anyhow::Context;
use chrono::{DateTime, Duration, TimeZone, Utc};
use counselor_admin::models::application::{
    Application, ApplicationStatus, Availability, Documents, Education, PersonalInfo,
    ProfessionalInfo, TimeSlot, WorkPreferences,
};
use counselor_admin::models::counselor::NewCounselorProfile;
use counselor_admin::models::user::UserRole;
use counselor_admin::services::counselor as counselor_service;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

const ADMIN_EMAIL: &str = "admin@example.com";
const ADMIN_PASSWORD: &str = "admin123";

/// Applicants spread over two months so both weekly and monthly reports show several buckets.
const APPLICANTS: &[(&str, &str, i64, ApplicationStatus)] = &[
    ("Ana Reyes", "ana.reyes@example.com", 0, ApplicationStatus::Approved),
    ("Ben Okafor", "ben.okafor@example.com", 2, ApplicationStatus::Rejected),
    ("Chloe Martin", "chloe.martin@example.com", 6, ApplicationStatus::Pending),
    ("Dev Patel", "dev.patel@example.com", 9, ApplicationStatus::Approved),
    ("Elena Rossi", "elena.rossi@example.com", 15, ApplicationStatus::Pending),
    ("Farid Haddad", "farid.haddad@example.com", 23, ApplicationStatus::Rejected),
    ("Grace Kim", "grace.kim@example.com", 31, ApplicationStatus::Pending),
    ("Hugo Lefebvre", "hugo.lefebvre@example.com", 38, ApplicationStatus::Approved),
    ("Iris Novak", "iris.novak@example.com", 44, ApplicationStatus::Pending),
    ("Jonas Berg", "jonas.berg@example.com", 52, ApplicationStatus::Pending),
];

const CLIENTS: &[(&str, &str, i64)] = &[
    ("Kara Lopez", "kara.lopez@example.com", 1),
    ("Liam Walsh", "liam.walsh@example.com", 12),
    ("Maya Cohen", "maya.cohen@example.com", 27),
    ("Noah Silva", "noah.silva@example.com", 40),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let db_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let pool = counselor_admin::db::create_pool(&db_url, 5).await?;
    counselor_admin::db::migrate(&pool).await?;

    println!("=== Counselor Admin Seed Script ===");

    let origin = Utc
        .with_ymd_and_hms(2024, 3, 1, 9, 0, 0)
        .single()
        .context("invalid seed origin")?;

    seed_admin_user(&pool).await?;
    seed_clients(&pool, origin).await?;
    seed_applications(&pool, origin).await?;

    println!("\n=== Seed complete! ===");
    println!("Admin login: {ADMIN_EMAIL} / {ADMIN_PASSWORD}");

    Ok(())
}

async fn seed_admin_user(pool: &PgPool) -> anyhow::Result<()> {
    let hash = counselor_admin::services::auth::hash_password(ADMIN_PASSWORD)?;

    sqlx::query(
        "INSERT INTO users (name, email, role, password_hash)
         VALUES ('Platform Administrator', $1, $2, $3)
         ON CONFLICT (email) DO UPDATE SET password_hash = EXCLUDED.password_hash, role = EXCLUDED.role",
    )
    .bind(ADMIN_EMAIL)
    .bind(UserRole::Admin)
    .bind(&hash)
    .execute(pool)
    .await?;

    println!("[done] Admin user ready");
    Ok(())
}

async fn seed_clients(pool: &PgPool, origin: DateTime<Utc>) -> anyhow::Result<()> {
    for (name, email, day) in CLIENTS {
        insert_user(pool, name, email, UserRole::Client, origin + Duration::days(*day)).await?;
    }
    println!("[done] Created {} client users", CLIENTS.len());
    Ok(())
}

async fn seed_applications(pool: &PgPool, origin: DateTime<Utc>) -> anyhow::Result<()> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM counselor_applications")
        .fetch_one(pool)
        .await?;
    if count > 0 {
        println!("[skip] Applications already exist ({count})");
        return Ok(());
    }

    for (name, email, day, status) in APPLICANTS {
        let submitted_at = origin + Duration::days(*day);
        let role = match status {
            ApplicationStatus::Approved => UserRole::Counselor,
            _ => UserRole::Client,
        };
        let user_id = insert_user(pool, name, email, role, submitted_at - Duration::days(1)).await?;

        let slug = email.split('@').next().unwrap_or(email);
        let documents = sample_documents(slug);
        let professional_info = sample_professional_info(slug);
        let work_preferences = sample_work_preferences();
        let personal_info = PersonalInfo {
            full_name: name.to_string(),
            phone_number: "+1 555 0100".to_string(),
            address: "12 Harbor Street".to_string(),
            date_of_birth: None,
        };
        let reviewed_at = status.is_terminal().then(|| submitted_at + Duration::days(2));

        let application = sqlx::query_as::<_, Application>(
            "INSERT INTO counselor_applications
                (user_id, personal_info, professional_info, work_preferences, documents,
                 status, submitted_at, reviewed_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING *",
        )
        .bind(user_id)
        .bind(Json(&personal_info))
        .bind(Json(&professional_info))
        .bind(Json(&work_preferences))
        .bind(Json(&documents))
        .bind(status)
        .bind(submitted_at)
        .bind(reviewed_at)
        .fetch_one(pool)
        .await?;

        if application.status == ApplicationStatus::Approved {
            let profile = NewCounselorProfile::from_application(&application);
            counselor_service::create_profile(pool, &profile).await?;
        }
    }

    println!("[done] Created {} sample applications", APPLICANTS.len());
    Ok(())
}

async fn insert_user(
    pool: &PgPool,
    name: &str,
    email: &str,
    role: UserRole,
    created_at: DateTime<Utc>,
) -> anyhow::Result<Uuid> {
    let id: Uuid = sqlx::query_scalar(
        "INSERT INTO users (name, email, role, created_at)
         VALUES ($1, $2, $3, $4)
         ON CONFLICT (email) DO UPDATE SET name = EXCLUDED.name
         RETURNING id",
    )
    .bind(name)
    .bind(email)
    .bind(role)
    .bind(created_at)
    .fetch_one(pool)
    .await?;
    Ok(id)
}

fn sample_documents(slug: &str) -> Documents {
    let url = |kind: &str| format!("https://storage.example.com/applications/{slug}/{kind}.pdf");
    Documents {
        identification_url: url("identification"),
        photograph_url: format!("https://storage.example.com/applications/{slug}/photo.jpg"),
        work_experience_url: url("work-experience"),
        professional_license_url: url("license"),
        educational_credentials_url: url("credentials"),
        cv_url: url("cv"),
    }
}

fn sample_professional_info(slug: &str) -> ProfessionalInfo {
    ProfessionalInfo {
        education: vec![Education {
            degree: Some("MSc Clinical Psychology".to_string()),
            institution: Some("State University".to_string()),
            graduation_year: Some(2016),
            certificate_url: Some(format!(
                "https://storage.example.com/applications/{slug}/degree.pdf"
            )),
        }],
        specializations: vec!["Anxiety".to_string(), "Family therapy".to_string()],
        languages: vec!["English".to_string()],
        years_of_experience: Some(7),
        license_number: Some(format!("LIC-{}", slug.len() * 1000 + 17)),
        license_url: None,
        resume_url: None,
    }
}

fn sample_work_preferences() -> WorkPreferences {
    WorkPreferences {
        hourly_rate: 80.0,
        availability: vec![Availability {
            day: "Monday".to_string(),
            slots: vec![TimeSlot {
                start_time: "09:00".to_string(),
                end_time: "12:00".to_string(),
            }],
        }],
    }
}
