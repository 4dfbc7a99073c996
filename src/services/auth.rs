//! Session service: password hashing, JWT session tokens, and login.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::User;
use crate::services::user as user_service;

/// JWT claims embedded in access and refresh tokens.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub user_id: String,
    pub role: String,
    pub token_type: String,
    pub exp: i64,
    pub iat: i64,
}

/// Token pair returned on successful login.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Token lifetimes and signing secret.
#[derive(Debug, Clone, Copy)]
pub struct TokenSettings<'a> {
    pub secret: &'a str,
    pub access_expiry_secs: i64,
    pub refresh_expiry_secs: i64,
}

/// Hash a plaintext password with argon2id.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {e}")))
}

/// Verify a plaintext password against a stored hash.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| AppError::Internal(format!("Invalid hash: {e}")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Generate a JWT token pair (access + refresh).
pub fn generate_tokens(user: &User, settings: TokenSettings<'_>) -> Result<TokenPair, AppError> {
    let now = Utc::now();
    let encoding_key = EncodingKey::from_secret(settings.secret.as_bytes());
    let subject = user.email.clone().unwrap_or_else(|| user.id.to_string());
    let role = user.role.unwrap_or_default().as_str().to_string();

    let claims = |token_type: &str, expiry_secs: i64| Claims {
        sub: subject.clone(),
        user_id: user.id.to_string(),
        role: role.clone(),
        token_type: token_type.to_string(),
        exp: (now + Duration::seconds(expiry_secs)).timestamp(),
        iat: now.timestamp(),
    };

    let access_token = jsonwebtoken::encode(
        &Header::default(),
        &claims("access", settings.access_expiry_secs),
        &encoding_key,
    )
    .map_err(|e| AppError::Internal(format!("Token generation failed: {e}")))?;

    let refresh_token = jsonwebtoken::encode(
        &Header::default(),
        &claims("refresh", settings.refresh_expiry_secs),
        &encoding_key,
    )
    .map_err(|e| AppError::Internal(format!("Token generation failed: {e}")))?;

    Ok(TokenPair {
        access_token,
        refresh_token,
        token_type: "Bearer".to_string(),
        expires_in: settings.access_expiry_secs,
    })
}

/// Validate a JWT and return the claims.
pub fn validate_token(token: &str, jwt_secret: &str) -> Result<Claims, AppError> {
    let decoding_key = DecodingKey::from_secret(jwt_secret.as_bytes());
    let validation = Validation::default();

    jsonwebtoken::decode::<Claims>(token, &decoding_key, &validation)
        .map(|data| data.claims)
        .map_err(|_| AppError::Unauthorized)
}

/// Authenticate a user by email and password, returning a token pair.
///
/// Accounts without a password hash cannot log in.
pub async fn login(
    pool: &PgPool,
    email: &str,
    password: &str,
    settings: TokenSettings<'_>,
) -> Result<TokenPair, AppError> {
    let user = user_service::find_by_email(pool, email)
        .await?
        .ok_or(AppError::Unauthorized)?;

    let Some(hash) = user.password_hash.as_deref() else {
        return Err(AppError::Unauthorized);
    };

    if !verify_password(password, hash)? {
        tracing::warn!(user_id = %user.id, "Failed login attempt");
        return Err(AppError::Unauthorized);
    }

    tracing::info!(user_id = %user.id, "User logged in");
    generate_tokens(&user, settings)
}

/// Issue a fresh token pair from a valid refresh token.
pub async fn refresh_token(
    pool: &PgPool,
    refresh_token_str: &str,
    settings: TokenSettings<'_>,
) -> Result<TokenPair, AppError> {
    let claims = validate_token(refresh_token_str, settings.secret)?;

    if claims.token_type != "refresh" {
        return Err(AppError::Unauthorized);
    }

    let user_id: Uuid = claims
        .user_id
        .parse()
        .map_err(|_| AppError::Unauthorized)?;

    let user = user_service::find_by_id(pool, user_id)
        .await
        .map_err(|e| if e.is_not_found() { AppError::Unauthorized } else { e })?;

    generate_tokens(&user, settings)
}
