use std::fmt;

use async_trait::async_trait;

/// Number of body characters kept when a response turns out not to be JSON.
pub const PREVIEW_CHARS: usize = 120;

/// Errors that can occur while fetching a JSON resource.
/// Every variant blocks rendering of the day that asked for it.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchError {
    /// The request never produced a response (DNS, connection refused).
    Network(String),
    /// Server answered with a non-success status.
    HttpError(u16),
    /// Body did not start with `{` or `[`. Carries the head of the body.
    NotJson(String),
    /// Body looked like JSON but failed to parse.
    ParseError(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Network(msg) => write!(f, "network error: {msg}"),
            FetchError::HttpError(status) => write!(f, "HTTP {status}"),
            FetchError::NotJson(preview) => {
                write!(f, "expected JSON, got non-JSON. Head: {preview}")
            }
            FetchError::ParseError(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for FetchError {}

/// Retrieves and parses a JSON resource. No retry; the caller decides.
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    async fn fetch_json(&self, url: &str) -> Result<serde_json::Value, FetchError>;
}

/// Existence-only check for a remote resource.
///
/// Implementations never fail: a transport error and a missing resource
/// both answer `false`.
#[async_trait]
pub trait ResourceProbe: Send + Sync {
    async fn exists(&self, url: &str) -> bool;
}

/// Applies the JSON guard to a successful response body.
///
/// HTML error pages served with a 200 are the reason this exists: they must
/// surface as `NotJson` rather than parse into something empty.
pub fn parse_guarded(body: &str) -> Result<serde_json::Value, FetchError> {
    let trimmed = body.trim();
    if !(trimmed.starts_with('{') || trimmed.starts_with('[')) {
        let preview: String = body.chars().take(PREVIEW_CHARS).collect();
        return Err(FetchError::NotJson(preview));
    }
    serde_json::from_str(trimmed).map_err(|e| FetchError::ParseError(e.to_string()))
}
