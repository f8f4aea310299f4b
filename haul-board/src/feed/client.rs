//! HTTP client for the data store API.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::de::DeserializeOwned;

use crate::domain::{Allocation, CanonicalEntity, JourneyEvent, SiteId};

use super::error::FeedError;
use super::{FeedSource, decode_rows};

/// Default base URL for a locally running data store.
const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/api";

/// Default request timeout.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Configuration for the feed client.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Base URL for the API, without trailing slash
    pub base_url: String,
    /// API key sent as `x-apikey`, if the store requires one
    pub api_key: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl FeedConfig {
    /// Create a config for the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set the API key.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// Client for the data store's read API.
///
/// Endpoints:
/// - `GET /allocations`
/// - `GET /journeys?siteId=<n>`
/// - `GET /transporters`
#[derive(Debug, Clone)]
pub struct FeedClient {
    http: reqwest::Client,
    base_url: String,
}

impl FeedClient {
    /// Create a new feed client.
    pub fn new(config: FeedConfig) -> Result<Self, FeedError> {
        let mut headers = HeaderMap::new();

        if let Some(key) = &config.api_key {
            let value = HeaderValue::from_str(key).map_err(|_| FeedError::Api {
                status: 0,
                message: "Invalid API key format".to_string(),
            })?;
            headers.insert(HeaderName::from_static("x-apikey"), value);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
        })
    }

    /// GET a JSON array from the API, skipping rows that do not decode.
    async fn get_rows<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, FeedError> {
        let url = format!("{}{}", self.base_url, path);

        let response = self.http.get(&url).query(query).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(FeedError::Unauthorized);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FeedError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        decode_rows(path, &body)
    }
}

impl FeedSource for FeedClient {
    async fn allocations(&self) -> Result<Vec<Allocation>, FeedError> {
        self.get_rows("/allocations", &[]).await
    }

    async fn site_events(&self, site: SiteId) -> Result<Vec<JourneyEvent>, FeedError> {
        self.get_rows("/journeys", &[("siteId", site.to_string())])
            .await
    }

    async fn transporters(&self) -> Result<Vec<CanonicalEntity>, FeedError> {
        self.get_rows("/transporters", &[]).await
    }
}
