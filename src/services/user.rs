//! User directory queries.

use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::pagination::{PagedResult, Pagination};
use crate::models::user::{User, UserResponse};

/// List users, newest first.
pub async fn list(
    pool: &PgPool,
    pagination: &Pagination,
) -> Result<PagedResult<UserResponse>, AppError> {
    let (total, users) = tokio::try_join!(
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users").fetch_one(pool),
        sqlx::query_as::<_, User>(
            "SELECT * FROM users ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(pool),
    )?;

    Ok(PagedResult::new(users, total, pagination).map(UserResponse::from))
}

/// Find a user by ID.
pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<User, AppError> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

/// Find a user by email, case-insensitively.
pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE LOWER(email) = LOWER($1)")
        .bind(email)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}
