use thiserror::Error;

/// Errors returned by [`crate::WikiClient`].
#[derive(Debug, Error)]
pub enum WikiError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The subject has no article, or the article has no canonical URL.
    #[error("no encyclopedia page found for \"{title}\"")]
    NotFound { title: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The API answered with JSON that lacks the expected `query` payload.
    #[error("malformed response for {context}: {reason}")]
    Malformed { context: String, reason: String },

    #[error("invalid API URL '{url}': {reason}")]
    InvalidApiUrl { url: String, reason: String },
}

impl WikiError {
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, WikiError::NotFound { .. })
    }
}
