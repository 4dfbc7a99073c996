//! User model with role-based access control.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Role of a user account. Users without a stored role are treated as clients.
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, Hash,
)]
#[sqlx(type_name = "user_role", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    #[default]
    Client,
    Counselor,
    Admin,
}

impl UserRole {
    /// Wire name, as stored in session claims.
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Client => "CLIENT",
            UserRole::Counselor => "COUNSELOR",
            UserRole::Admin => "ADMIN",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "CLIENT" => Some(UserRole::Client),
            "COUNSELOR" => Some(UserRole::Counselor),
            "ADMIN" => Some(UserRole::Admin),
            _ => None,
        }
    }
}

/// Full user row from database (includes password_hash: never serialize to API).
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: Option<String>,
    pub image: Option<String>,
    pub role: Option<UserRole>,
    pub password_hash: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// User response DTO: excludes password_hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: Option<String>,
    pub image: Option<String>,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
            image: u.image,
            role: u.role.unwrap_or_default(),
            created_at: u.created_at,
        }
    }
}
