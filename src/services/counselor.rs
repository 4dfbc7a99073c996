//! Counselor profile persistence.

use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::counselor::{Counselor, NewCounselorProfile};

/// Insert a counselor profile snapshot.
pub async fn create_profile(
    pool: &PgPool,
    profile: &NewCounselorProfile,
) -> Result<Counselor, AppError> {
    let counselor = sqlx::query_as::<_, Counselor>(
        r#"
        INSERT INTO counselors (user_id, personal_info, professional_info, work_preferences, image_url)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(profile.user_id)
    .bind(Json(&profile.personal_info))
    .bind(Json(&profile.professional_info))
    .bind(Json(&profile.work_preferences))
    .bind(&profile.image_url)
    .fetch_one(pool)
    .await?;

    Ok(counselor)
}

/// Whether a counselor profile already exists for `user_id`.
pub async fn exists_for_user(pool: &PgPool, user_id: Uuid) -> Result<bool, AppError> {
    let exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM counselors WHERE user_id = $1)",
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;
    Ok(exists)
}
