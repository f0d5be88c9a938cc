pub mod error;
pub mod types;

pub use error::{Result, TavilyError};
pub use types::{SearchRequest, SearchResponse, SearchResult};

use std::time::Duration;

const BASE_URL: &str = "https://api.tavily.com";

/// Transport timeout for a single search call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

pub struct TavilyClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl TavilyClient {
    pub fn new(api_key: String) -> Result<Self> {
        Self::with_base_url(api_key, BASE_URL.to_string())
    }

    /// Point the client at a different host. Used by tests and proxies.
    pub fn with_base_url(api_key: String, base_url: String) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(TavilyError::MissingApiKey);
        }
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Run one search. A single failed call is returned as-is, no retries.
    pub async fn search(&self, request: &SearchRequest) -> Result<SearchResponse> {
        tracing::debug!(
            query = %request.query,
            max_results = request.max_results,
            "Tavily search"
        );

        let url = format!("{}/search", self.base_url);
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let message = if body.is_empty() {
                status.canonical_reason().unwrap_or_default().to_string()
            } else {
                body
            };
            return Err(TavilyError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = resp.text().await?;
        let parsed: SearchResponse = serde_json::from_str(&body)?;
        tracing::debug!(
            count = parsed.results.len(),
            response_time = ?parsed.response_time,
            "Tavily search complete"
        );
        Ok(parsed)
    }
}
