//! Database operations for the `genres` allow-list and `user_genres`.

use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

/// All allowed genre names, alphabetically.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_genre_names(pool: &PgPool) -> Result<Vec<String>, DbError> {
    Ok(
        sqlx::query_scalar::<_, String>("SELECT genre_name FROM genres ORDER BY genre_name")
            .fetch_all(pool)
            .await?,
    )
}

/// Attach genres to a user. Already-selected genres are left as they are.
///
/// Returns the number of newly attached genres.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails (e.g. a genre outside the
/// allow-list violates the foreign key).
pub async fn add_user_genres(
    pool: &PgPool,
    user_id: Uuid,
    genres: &[String],
) -> Result<u64, DbError> {
    let result = sqlx::query(
        "INSERT INTO user_genres (user_id, genre_name) \
         SELECT $1, g FROM UNNEST($2::text[]) AS g \
         ON CONFLICT (user_id, genre_name) DO NOTHING",
    )
    .bind(user_id)
    .bind(genres)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// Genres the user has selected, in selection order.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_user_genres(pool: &PgPool, user_id: Uuid) -> Result<Vec<String>, DbError> {
    Ok(sqlx::query_scalar::<_, String>(
        "SELECT genre_name FROM user_genres \
         WHERE user_id = $1 \
         ORDER BY created_at, genre_name",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?)
}
