// Trait seam between the search pipeline and the outside world.
//
// WebSearcher is the only suspend point of a search. The Tavily client
// implements it for production; testing::MockSearcher implements it for tests.

use async_trait::async_trait;
use tracing::{info, warn};

use tavily_client::{SearchRequest, SearchResult, TavilyClient};
use vgrank_common::{GatewayScope, RawResult, Result};

#[async_trait]
pub trait WebSearcher: Send + Sync {
    /// Run one bounded search restricted by `scope`. No retries.
    async fn search(&self, query: &str, scope: &GatewayScope) -> Result<Vec<RawResult>>;
}

#[async_trait]
impl WebSearcher for TavilyClient {
    async fn search(&self, query: &str, scope: &GatewayScope) -> Result<Vec<RawResult>> {
        let request = SearchRequest {
            query: query.to_string(),
            max_results: scope.max_results,
            search_depth: scope.search_depth.clone(),
            include_domains: scope.include_domains.clone(),
            exclude_domains: scope.exclude_domains.clone(),
        };

        let response = TavilyClient::search(self, &request).await?;
        let results = parse_results(response.results);
        info!(count = results.len(), "Tavily search complete");
        Ok(results)
    }
}

/// Validate raw result records one at a time. Malformed records are dropped
/// with a warning and never fail the batch.
pub fn parse_results(values: Vec<serde_json::Value>) -> Vec<RawResult> {
    values
        .into_iter()
        .enumerate()
        .filter_map(|(i, value)| match SearchResult::from_value(value) {
            Ok(r) => Some(RawResult::from(r)),
            Err(e) => {
                warn!(index = i, error = %e, "Dropping malformed search result");
                None
            }
        })
        .collect()
}
