//! HTTP client for the encyclopedia's `api.php` endpoint and article pages.
//!
//! One [`WikiClient`] is built at startup and shared; it owns the `reqwest`
//! connection pool and the API base URL. Every call is a single attempt.

use std::time::Duration;

use fancloud_core::SubjectProfile;
use reqwest::{Client, Url};

use crate::error::WikiError;
use crate::parse::parse_profile;
use crate::types::{PageInfoQuery, QueryEnvelope, SearchQuery};

/// Maximum number of titles returned by [`WikiClient::search_titles`].
pub const SEARCH_LIMIT: usize = 4;

/// Client for title lookup, free-text search and article fetches.
#[derive(Debug, Clone)]
pub struct WikiClient {
    client: Client,
    api_url: Url,
}

impl WikiClient {
    /// Creates a client for the given `api.php` URL.
    ///
    /// # Errors
    ///
    /// Returns [`WikiError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`WikiError::InvalidApiUrl`] if `api_url` does not parse.
    pub fn new(api_url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, WikiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let api_url = Url::parse(api_url).map_err(|e| WikiError::InvalidApiUrl {
            url: api_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self { client, api_url })
    }

    /// Free-text search returning up to [`SEARCH_LIMIT`] titles in the
    /// site's own relevance order.
    ///
    /// # Errors
    ///
    /// - [`WikiError::Http`] / [`WikiError::UnexpectedStatus`] on transport failure.
    /// - [`WikiError::Malformed`] if the body has no `query.search` list.
    pub async fn search_titles(&self, query: &str) -> Result<Vec<String>, WikiError> {
        let limit = SEARCH_LIMIT.to_string();
        let url = self.build_url(&[
            ("action", "query"),
            ("list", "search"),
            ("srsearch", query),
            ("srlimit", &limit),
            ("format", "json"),
        ]);
        let context = format!("search(srsearch={query})");
        let envelope: QueryEnvelope<SearchQuery> = self.request_json(&url, &context).await?;

        let hits = envelope
            .query
            .and_then(|q| q.search)
            .ok_or_else(|| WikiError::Malformed {
                context,
                reason: "missing query.search".to_string(),
            })?;

        Ok(hits
            .into_iter()
            .take(SEARCH_LIMIT)
            .map(|hit| hit.title)
            .collect())
    }

    /// Resolves an exact title to the article's canonical URL.
    ///
    /// # Errors
    ///
    /// - [`WikiError::NotFound`] if no page entry comes back, or it is missing
    ///   or has no `fullurl`.
    /// - [`WikiError::Http`] / [`WikiError::UnexpectedStatus`] /
    ///   [`WikiError::Deserialize`] on upstream failure.
    pub async fn resolve_page_url(&self, title: &str) -> Result<String, WikiError> {
        let not_found = || WikiError::NotFound {
            title: title.to_owned(),
        };
        if title.trim().is_empty() {
            return Err(not_found());
        }

        let url = self.build_url(&[
            ("action", "query"),
            ("format", "json"),
            ("prop", "info"),
            ("titles", title),
            ("inprop", "url"),
        ]);
        let envelope: QueryEnvelope<PageInfoQuery> = self
            .request_json(&url, &format!("info(titles={title})"))
            .await?;

        let page = envelope
            .query
            .and_then(|q| q.pages.into_values().next())
            .ok_or_else(not_found)?;

        page.canonical_url().map(str::to_owned).ok_or_else(not_found)
    }

    /// Fetches an article page's rendered HTML.
    ///
    /// # Errors
    ///
    /// Returns [`WikiError::NotFound`] on HTTP 404, [`WikiError::UnexpectedStatus`]
    /// on any other non-2xx status, and [`WikiError::Http`] on transport failure.
    pub async fn fetch_page_html(&self, page_url: &str) -> Result<String, WikiError> {
        let response = self
            .client
            .get(page_url)
            .header(reqwest::header::ACCEPT, "text/html,application/xhtml+xml")
            .send()
            .await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(WikiError::NotFound {
                title: page_url.to_owned(),
            });
        }
        if !status.is_success() {
            return Err(WikiError::UnexpectedStatus {
                status: status.as_u16(),
                url: page_url.to_owned(),
            });
        }

        Ok(response.text().await?)
    }

    /// Resolves `subject`, fetches its article and extracts the profile.
    ///
    /// # Errors
    ///
    /// Propagates [`WikiError::NotFound`] when the subject has no page; any
    /// other variant means the encyclopedia was unreachable or misbehaved.
    pub async fn fetch_profile(&self, subject: &str) -> Result<SubjectProfile, WikiError> {
        let page_url = self.resolve_page_url(subject).await?;
        tracing::debug!(subject, page_url = %page_url, "resolved canonical page");

        let html = self.fetch_page_html(&page_url).await?;
        let profile = parse_profile(&page_url, &html);

        tracing::info!(
            subject,
            has_infobox = profile.has_infobox,
            has_image = profile.image_url.is_some(),
            has_summary = profile.summary.is_some(),
            "parsed subject profile"
        );
        Ok(profile)
    }

    fn build_url(&self, params: &[(&str, &str)]) -> Url {
        let mut url = self.api_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
        }
        url
    }

    async fn request_json<T>(&self, url: &Url, context: &str) -> Result<T, WikiError>
    where
        T: serde::de::DeserializeOwned,
    {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(WikiError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| WikiError::Deserialize {
            context: context.to_owned(),
            source: e,
        })
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
