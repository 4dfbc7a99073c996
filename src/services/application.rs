//! Application review service: listing, inspection and status decisions.
//!
//! Approval runs its side effects sequentially (status, role promotion,
//! counselor profile). A failure part-way leaves earlier steps applied.

use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::application::{
    Application, ApplicationStatus, ApplicationView, ApplicationWithSubmitter,
    UpdateApplicationStatus,
};
use crate::models::counselor::NewCounselorProfile;
use crate::models::pagination::{PagedResult, Pagination};
use crate::models::user::UserRole;
use crate::services::counselor;

const SELECT_WITH_SUBMITTER: &str = r#"
    SELECT a.*, u.id AS submitter_id, u.name AS submitter_name, u.email AS submitter_email
    FROM counselor_applications a
    LEFT JOIN users u ON u.id = a.user_id
"#;

/// What a status update changed.
#[derive(Debug, Clone)]
pub struct ReviewOutcome {
    pub application_id: Uuid,
    pub previous_status: ApplicationStatus,
    pub status: ApplicationStatus,
    pub role_promoted: bool,
    pub profile_created: bool,
}

/// Check a requested status change against the review lifecycle.
///
/// PENDING can move to APPROVED or REJECTED. A decided application may be
/// re-reviewed with the same decision, but never flipped or reopened.
pub fn validate_transition(
    from: ApplicationStatus,
    to: ApplicationStatus,
) -> Result<(), AppError> {
    match (from, to) {
        (_, ApplicationStatus::Pending) => Err(AppError::InvalidTransition(
            "Applications cannot be returned to PENDING".to_string(),
        )),
        (from, to) if !from.is_terminal() || from == to => Ok(()),
        (from, to) => Err(AppError::InvalidTransition(format!(
            "Cannot transition from {from:?} to {to:?}"
        ))),
    }
}

/// List applications, newest submission first, with submitter details.
pub async fn list(
    pool: &PgPool,
    pagination: &Pagination,
) -> Result<PagedResult<ApplicationView>, AppError> {
    let count_query =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM counselor_applications").fetch_one(pool);

    let data_sql = format!("{SELECT_WITH_SUBMITTER} ORDER BY a.submitted_at DESC LIMIT $1 OFFSET $2");
    let data_query = sqlx::query_as::<_, ApplicationWithSubmitter>(&data_sql)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(pool);

    let (total, rows) = tokio::try_join!(count_query, data_query)?;

    Ok(PagedResult::new(rows, total, pagination).map(ApplicationView::from))
}

/// Find one application with submitter details.
pub async fn find_view(pool: &PgPool, id: Uuid) -> Result<ApplicationView, AppError> {
    let sql = format!("{SELECT_WITH_SUBMITTER} WHERE a.id = $1");
    sqlx::query_as::<_, ApplicationWithSubmitter>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .map(ApplicationView::from)
        .ok_or_else(|| AppError::NotFound("Application not found".to_string()))
}

/// Find application by ID.
pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Application, AppError> {
    sqlx::query_as::<_, Application>("SELECT * FROM counselor_applications WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Application not found".to_string()))
}

/// Record a review decision and apply approval side effects.
pub async fn update_status(
    pool: &PgPool,
    id: Uuid,
    input: &UpdateApplicationStatus,
    reviewer_id: Uuid,
) -> Result<ReviewOutcome, AppError> {
    let existing = find_by_id(pool, id).await?;
    validate_transition(existing.status, input.status)?;

    let updated = sqlx::query_as::<_, Application>(
        r#"
        UPDATE counselor_applications SET
            status = $2,
            reviewed_at = NOW(),
            review_notes = $3
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(existing.id)
    .bind(input.status)
    .bind(&input.review_notes)
    .fetch_one(pool)
    .await?;

    tracing::info!(
        application_id = %id,
        reviewer_id = %reviewer_id,
        from = ?existing.status,
        to = ?updated.status,
        "Application reviewed"
    );

    let mut outcome = ReviewOutcome {
        application_id: id,
        previous_status: existing.status,
        status: updated.status,
        role_promoted: false,
        profile_created: false,
    };

    if updated.status == ApplicationStatus::Approved {
        outcome.role_promoted = promote_to_counselor(pool, updated.user_id).await?;
        if outcome.role_promoted {
            outcome.profile_created = materialize_profile(pool, &updated).await?;
        }
    }

    Ok(outcome)
}

/// Give the submitter the COUNSELOR role. Returns `false` if the user is gone.
async fn promote_to_counselor(pool: &PgPool, user_id: Uuid) -> Result<bool, AppError> {
    let result = sqlx::query("UPDATE users SET role = $1 WHERE id = $2")
        .bind(UserRole::Counselor)
        .bind(user_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        tracing::warn!(user_id = %user_id, "Approved application references a missing user");
        return Ok(false);
    }
    Ok(true)
}

/// Create the counselor profile unless the user already has one.
async fn materialize_profile(pool: &PgPool, application: &Application) -> Result<bool, AppError> {
    if counselor::exists_for_user(pool, application.user_id).await? {
        tracing::debug!(
            user_id = %application.user_id,
            "Counselor profile already exists, skipping"
        );
        return Ok(false);
    }

    let profile = NewCounselorProfile::from_application(application);
    let counselor = counselor::create_profile(pool, &profile).await?;
    tracing::info!(
        counselor_id = %counselor.id,
        user_id = %counselor.user_id,
        application_id = %application.id,
        "Counselor profile created"
    );
    Ok(true)
}
