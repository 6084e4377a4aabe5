//! Database operations for `content_blocks`, the ordered blocks of an oshi page.

use chrono::{DateTime, Utc};
use fancloud_core::{validate_items, ContentBlock, ContentItem};
use sqlx::PgPool;

use crate::DbError;

/// A row from the `content_blocks` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ContentBlockRow {
    pub id: i64,
    pub oshi_id: i64,
    pub block_type: String,
    pub order_index: i32,
    pub payload: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl ContentBlockRow {
    /// Decode the stored payload back into a typed block.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Content`] if the payload no longer matches its type.
    pub fn into_item(self) -> Result<ContentItem, DbError> {
        let block = ContentBlock::from_parts(&self.block_type, self.payload)?;
        Ok(ContentItem {
            order_index: self.order_index,
            block,
        })
    }
}

/// Replace every block on an oshi page with `items`.
///
/// The page is validated first, then the delete and inserts run in one
/// transaction so readers see either the old page or the new one. Returns the
/// new row ids in the order of `items`.
///
/// # Errors
///
/// Returns [`DbError::Content`] if validation fails, or [`DbError::Sqlx`] if
/// any statement fails (the transaction is rolled back on drop).
pub async fn replace_content_blocks(
    pool: &PgPool,
    oshi_id: i64,
    items: &[ContentItem],
) -> Result<Vec<i64>, DbError> {
    validate_items(items)?;

    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM content_blocks WHERE oshi_id = $1")
        .bind(oshi_id)
        .execute(&mut *tx)
        .await?;

    let mut ids = Vec::with_capacity(items.len());
    for item in items {
        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO content_blocks (oshi_id, block_type, order_index, payload) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id",
        )
        .bind(oshi_id)
        .bind(item.block.block_type())
        .bind(item.order_index)
        .bind(item.block.payload())
        .fetch_one(&mut *tx)
        .await?;
        ids.push(id);
    }

    tx.commit().await?;
    Ok(ids)
}

/// All blocks of an oshi page in display order.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_content_blocks(
    pool: &PgPool,
    oshi_id: i64,
) -> Result<Vec<ContentBlockRow>, DbError> {
    Ok(sqlx::query_as::<_, ContentBlockRow>(
        "SELECT id, oshi_id, block_type, order_index, payload, created_at \
         FROM content_blocks \
         WHERE oshi_id = $1 \
         ORDER BY order_index",
    )
    .bind(oshi_id)
    .fetch_all(pool)
    .await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fancloud_core::TextAlignment;

    fn row(block_type: &str, payload: serde_json::Value) -> ContentBlockRow {
        ContentBlockRow {
            id: 1,
            oshi_id: 7,
            block_type: block_type.to_string(),
            order_index: 3,
            payload,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn into_item_decodes_text_payload() {
        let item = row(
            "text",
            serde_json::json!({"text": "hello", "font_size": 16, "alignment": "center"}),
        )
        .into_item()
        .expect("valid payload");

        assert_eq!(item.order_index, 3);
        assert_eq!(
            item.block,
            ContentBlock::Text {
                text: "hello".to_string(),
                font_size: 16,
                alignment: TextAlignment::Center,
            }
        );
    }

    #[test]
    fn into_item_rejects_payload_of_wrong_shape() {
        let err = row("image", serde_json::json!({"text": "hello"}))
            .into_item()
            .expect_err("image payload without src must fail");

        assert!(matches!(err, DbError::Content(_)));
    }
}
