//! MediaWiki `api.php` response types (`format=json`, format version 1).

use std::collections::HashMap;

use serde::Deserialize;

/// Every `action=query` response nests its payload under `query`.
#[derive(Debug, Deserialize)]
pub struct QueryEnvelope<T> {
    pub query: Option<T>,
}

// ---------------------------------------------------------------------------
// prop=info&inprop=url
// ---------------------------------------------------------------------------

/// `query` payload for a title lookup. `pages` is keyed by page id; missing
/// titles come back under a negative id with a `missing` marker.
#[derive(Debug, Deserialize)]
pub struct PageInfoQuery {
    #[serde(default)]
    pub pages: HashMap<String, PageInfo>,
}

#[derive(Debug, Deserialize)]
pub struct PageInfo {
    #[serde(default)]
    pub fullurl: Option<String>,
    #[serde(default)]
    pub missing: Option<serde_json::Value>,
    #[serde(default)]
    pub invalid: Option<serde_json::Value>,
}

impl PageInfo {
    /// The canonical URL, unless the API flagged the title missing or invalid.
    #[must_use]
    pub fn canonical_url(&self) -> Option<&str> {
        if self.missing.is_some() || self.invalid.is_some() {
            return None;
        }
        self.fullurl.as_deref().filter(|url| !url.trim().is_empty())
    }
}

// ---------------------------------------------------------------------------
// list=search
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub search: Option<Vec<SearchHit>>,
}

#[derive(Debug, Deserialize)]
pub struct SearchHit {
    pub title: String,
}
