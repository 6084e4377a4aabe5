//! Database operations for the `users` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

/// A row from the `users` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub password_salt: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert payload for [`create_user`]. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser<'a> {
    pub email: &'a str,
    pub username: &'a str,
    pub password_hash: &'a str,
    pub password_salt: &'a str,
}

/// Insert a new user with a fresh `UUIDv4` id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] on failure; a duplicate email surfaces as a
/// unique violation (see [`DbError::is_unique_violation`]).
pub async fn create_user(pool: &PgPool, user: &NewUser<'_>) -> Result<UserRow, DbError> {
    let row = sqlx::query_as::<_, UserRow>(
        "INSERT INTO users (id, email, username, password_hash, password_salt) \
         VALUES ($1, $2, $3, $4, $5) \
         RETURNING id, email, username, password_hash, password_salt, created_at, updated_at",
    )
    .bind(Uuid::new_v4())
    .bind(user.email)
    .bind(user.username)
    .bind(user.password_hash)
    .bind(user.password_salt)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Look up a user by exact email.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_user_by_email(pool: &PgPool, email: &str) -> Result<Option<UserRow>, DbError> {
    let row = sqlx::query_as::<_, UserRow>(
        "SELECT id, email, username, password_hash, password_salt, created_at, updated_at \
         FROM users \
         WHERE email = $1",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}
