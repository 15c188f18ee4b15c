//! HTTP content source.
//!
//! Lesson content is static JSON that authors edit in place, so every request
//! asks intermediaries not to serve a cached copy.

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::header::{CACHE_CONTROL, HeaderMap, HeaderValue, PRAGMA};

use crate::content::source::{ContentFetcher, FetchError, ResourceProbe, parse_guarded};

const APP_USER_AGENT: &str = concat!("hobd/", env!("CARGO_PKG_VERSION"));

/// Builds the shared client with no-cache headers on every request.
pub fn build_http_client() -> Result<reqwest::Client, reqwest::Error> {
    let mut default_headers = HeaderMap::new();
    default_headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    default_headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));

    reqwest::Client::builder()
        .user_agent(APP_USER_AGENT)
        .default_headers(default_headers)
        .build()
}

/// Fetches and probes content over HTTP.
#[derive(Clone)]
pub struct HttpContentSource {
    client: reqwest::Client,
}

impl HttpContentSource {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ContentFetcher for HttpContentSource {
    async fn fetch_json(&self, url: &str) -> Result<serde_json::Value, FetchError> {
        debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!("HTTP {} for {}", status.as_u16(), url);
            return Err(FetchError::HttpError(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        parse_guarded(&body).inspect_err(|e| warn!("Bad content from {}: {}", url, e))
    }
}

#[async_trait]
impl ResourceProbe for HttpContentSource {
    async fn exists(&self, url: &str) -> bool {
        match self.client.get(url).send().await {
            Ok(response) => {
                let found = response.status().is_success();
                debug!("Probe {} -> {}", url, response.status());
                found
            }
            Err(e) => {
                debug!("Probe {} failed, treating as absent: {}", url, e);
                false
            }
        }
    }
}
