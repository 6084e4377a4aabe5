//! Content blocks that make up a user's oshi page.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::profile::SocialLinks;

pub const MAX_BLOCKS_PER_PAGE: usize = 100;
const MAX_TEXT_CHARS: usize = 10_000;
const MAX_TITLE_CHARS: usize = 200;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContentError {
    #[error("block {order_index}: {reason}")]
    InvalidBlock { order_index: i32, reason: String },

    #[error("order_index {0} is used by more than one block")]
    DuplicateOrderIndex(i32),

    #[error("a page holds at most {MAX_BLOCKS_PER_PAGE} blocks, got {0}")]
    TooManyBlocks(usize),

    #[error("stored block of type '{block_type}' is malformed: {reason}")]
    Malformed { block_type: String, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlignment {
    Left,
    Center,
    Right,
}

/// A single block, tagged on the wire by `"type"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text {
        text: String,
        font_size: i32,
        alignment: TextAlignment,
    },
    Image {
        src: String,
        /// Display width as a percentage of the page column.
        size: i32,
    },
    Event {
        title: String,
        start_date: NaiveDate,
        #[serde(default)]
        end_date: Option<NaiveDate>,
    },
    SocialLinks {
        links: SocialLinks,
    },
}

/// A block together with its position on the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    pub order_index: i32,
    #[serde(flatten)]
    pub block: ContentBlock,
}

impl ContentBlock {
    #[must_use]
    pub fn block_type(&self) -> &'static str {
        match self {
            ContentBlock::Text { .. } => "text",
            ContentBlock::Image { .. } => "image",
            ContentBlock::Event { .. } => "event",
            ContentBlock::SocialLinks { .. } => "social_links",
        }
    }

    /// Type-specific fields as a JSON object, without the `type` tag.
    #[must_use]
    pub fn payload(&self) -> serde_json::Value {
        let mut value = serde_json::to_value(self).unwrap_or_default();
        if let Some(map) = value.as_object_mut() {
            map.remove("type");
        }
        value
    }

    /// Rebuild a block from a stored `(block_type, payload)` pair.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::Malformed`] if the payload does not match the type.
    pub fn from_parts(block_type: &str, payload: serde_json::Value) -> Result<Self, ContentError> {
        let malformed = |reason: String| ContentError::Malformed {
            block_type: block_type.to_string(),
            reason,
        };

        let serde_json::Value::Object(mut map) = payload else {
            return Err(malformed("payload is not an object".to_string()));
        };
        map.insert(
            "type".to_string(),
            serde_json::Value::String(block_type.to_string()),
        );
        serde_json::from_value(serde_json::Value::Object(map)).map_err(|e| malformed(e.to_string()))
    }

    fn check(&self) -> Result<(), String> {
        match self {
            ContentBlock::Text {
                text, font_size, ..
            } => {
                if text.trim().is_empty() {
                    return Err("text must not be empty".to_string());
                }
                if text.chars().count() > MAX_TEXT_CHARS {
                    return Err(format!("text exceeds {MAX_TEXT_CHARS} characters"));
                }
                if !(1..=200).contains(font_size) {
                    return Err(format!("font_size must be 1-200, got {font_size}"));
                }
            }
            ContentBlock::Image { src, size } => {
                if !(src.starts_with("https://") || src.starts_with("http://")) {
                    return Err(format!("src must be an http(s) URL, got '{src}'"));
                }
                if !(1..=100).contains(size) {
                    return Err(format!("size must be 1-100, got {size}"));
                }
            }
            ContentBlock::Event {
                title,
                start_date,
                end_date,
            } => {
                let title_len = title.trim().chars().count();
                if title_len == 0 || title_len > MAX_TITLE_CHARS {
                    return Err(format!("title must be 1-{MAX_TITLE_CHARS} characters"));
                }
                if let Some(end) = end_date {
                    if end < start_date {
                        return Err(format!(
                            "end_date {end} is before start_date {start_date}"
                        ));
                    }
                }
            }
            ContentBlock::SocialLinks { links } => {
                if links.is_empty() {
                    return Err("social_links block needs at least one link".to_string());
                }
            }
        }
        Ok(())
    }
}

/// Validate a full page of blocks before it replaces the stored one.
///
/// # Errors
///
/// Returns the first [`ContentError`] found.
pub fn validate_items(items: &[ContentItem]) -> Result<(), ContentError> {
    if items.len() > MAX_BLOCKS_PER_PAGE {
        return Err(ContentError::TooManyBlocks(items.len()));
    }

    let mut seen = HashSet::new();
    for item in items {
        if item.order_index < 0 {
            return Err(ContentError::InvalidBlock {
                order_index: item.order_index,
                reason: "order_index must be >= 0".to_string(),
            });
        }
        if !seen.insert(item.order_index) {
            return Err(ContentError::DuplicateOrderIndex(item.order_index));
        }
        item.block
            .check()
            .map_err(|reason| ContentError::InvalidBlock {
                order_index: item.order_index,
                reason,
            })?;
    }
    Ok(())
}
