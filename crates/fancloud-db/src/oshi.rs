//! Database operations for the `oshi` table: one scraped profile per
//! (user, oshi name) pair.

use chrono::{DateTime, Utc};
use fancloud_core::{SocialLinks, SubjectProfile};
use sqlx::{types::Json, PgPool};
use uuid::Uuid;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A row from the `oshi` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OshiRow {
    pub id: i64,
    pub user_id: Uuid,
    pub oshi_name: String,
    pub wikipedia_url: String,
    pub summary: Option<String>,
    pub official_site: Option<String>,
    pub sns_links: Json<SocialLinks>,
    pub image_url: Option<String>,
    pub profession: Option<String>,
    pub has_infobox: bool,
    pub genre: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OshiRow {
    /// The stored profile in the scraper's shape.
    #[must_use]
    pub fn to_profile(&self) -> SubjectProfile {
        SubjectProfile {
            canonical_url: self.wikipedia_url.clone(),
            official_site_url: self.official_site.clone(),
            social_links: self.sns_links.0.clone(),
            image_url: self.image_url.clone(),
            profession: self.profession.clone(),
            summary: self.summary.clone(),
            has_infobox: self.has_infobox,
        }
    }
}

/// Listing projection used by the "my oshi" view.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OshiSummaryRow {
    pub oshi_name: String,
    pub genre: String,
    pub image_url: Option<String>,
}

/// Upsert payload for [`upsert_oshi`].
#[derive(Debug, Clone)]
pub struct NewOshi<'a> {
    pub user_id: Uuid,
    pub oshi_name: &'a str,
    pub genre: &'a str,
    pub profile: &'a SubjectProfile,
}

const OSHI_COLUMNS: &str = "id, user_id, oshi_name, wikipedia_url, summary, official_site, \
     sns_links, image_url, profession, has_infobox, genre, created_at, updated_at";

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Insert or fully overwrite the profile keyed on `(user_id, oshi_name)`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] on failure, including a foreign-key violation
/// when `genre` is not in the allow-list.
pub async fn upsert_oshi(pool: &PgPool, oshi: &NewOshi<'_>) -> Result<OshiRow, DbError> {
    let profile = oshi.profile;
    let row = sqlx::query_as::<_, OshiRow>(&format!(
        "INSERT INTO oshi \
           (user_id, oshi_name, wikipedia_url, summary, official_site, sns_links, \
            image_url, profession, has_infobox, genre) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
         ON CONFLICT (user_id, oshi_name) DO UPDATE SET \
           wikipedia_url = EXCLUDED.wikipedia_url, \
           summary       = EXCLUDED.summary, \
           official_site = EXCLUDED.official_site, \
           sns_links     = EXCLUDED.sns_links, \
           image_url     = EXCLUDED.image_url, \
           profession    = EXCLUDED.profession, \
           has_infobox   = EXCLUDED.has_infobox, \
           genre         = EXCLUDED.genre, \
           updated_at    = NOW() \
         RETURNING {OSHI_COLUMNS}"
    ))
    .bind(oshi.user_id)
    .bind(oshi.oshi_name)
    .bind(&profile.canonical_url)
    .bind(profile.summary.as_deref())
    .bind(profile.official_site_url.as_deref())
    .bind(Json(&profile.social_links))
    .bind(profile.image_url.as_deref())
    .bind(profile.profession.as_deref())
    .bind(profile.has_infobox)
    .bind(oshi.genre)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Fetch one saved oshi by owner and exact name.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_oshi(
    pool: &PgPool,
    user_id: Uuid,
    oshi_name: &str,
) -> Result<Option<OshiRow>, DbError> {
    Ok(sqlx::query_as::<_, OshiRow>(&format!(
        "SELECT {OSHI_COLUMNS} FROM oshi WHERE user_id = $1 AND oshi_name = $2"
    ))
    .bind(user_id)
    .bind(oshi_name)
    .fetch_optional(pool)
    .await?)
}

/// All oshi saved by a user, oldest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_user_oshi(pool: &PgPool, user_id: Uuid) -> Result<Vec<OshiSummaryRow>, DbError> {
    Ok(sqlx::query_as::<_, OshiSummaryRow>(
        "SELECT oshi_name, genre, image_url FROM oshi \
         WHERE user_id = $1 \
         ORDER BY created_at, id",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?)
}

/// Delete a saved oshi (and, by cascade, its content blocks).
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no such oshi exists, or [`DbError::Sqlx`]
/// if the query fails.
pub async fn delete_oshi(pool: &PgPool, user_id: Uuid, oshi_name: &str) -> Result<(), DbError> {
    let result = sqlx::query("DELETE FROM oshi WHERE user_id = $1 AND oshi_name = $2")
        .bind(user_id)
        .bind(oshi_name)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}
