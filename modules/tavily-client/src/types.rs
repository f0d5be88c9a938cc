use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Body of a `POST /search` call.
#[derive(Debug, Clone, Serialize)]
pub struct SearchRequest {
    pub query: String,
    pub max_results: u32,
    pub search_depth: String,
    pub include_domains: Vec<String>,
    pub exclude_domains: Vec<String>,
}

/// Top-level search response.
///
/// Result records are kept as raw JSON so one malformed entry can be dropped
/// without failing the whole response. Use [`SearchResult::from_value`] on each.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<serde_json::Value>,
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub response_time: Option<f64>,
}

/// A single search hit.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub content: String,
    #[serde(default)]
    pub score: f64,
}

impl SearchResult {
    /// Validate one raw result record against the expected schema.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }
}
