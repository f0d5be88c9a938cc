use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use tavily_client::TavilyClient;
use vgrank_common::{Catalog, Config, Result, SearchError, SiteRanking};

use crate::classifier::ProductClassifier;
use crate::query::build_query;
use crate::ranking::{build_rankings, SiteNormalizer};
use crate::traits::WebSearcher;

/// "Search by term": query → gateway → classify → group → rank.
///
/// Holds no per-search state; one instance can serve concurrent callers.
pub struct ProductSearch {
    searcher: Option<Arc<dyn WebSearcher>>,
    catalog: Arc<Catalog>,
    classifier: ProductClassifier,
    normalizer: SiteNormalizer,
}

impl ProductSearch {
    pub fn new(searcher: Arc<dyn WebSearcher>, catalog: Catalog) -> Self {
        Self::build(Some(searcher), catalog)
    }

    /// Wire up the Tavily gateway from config. A missing or unusable key is
    /// not fatal here; every search then fails with a configuration error.
    pub fn from_config(config: &Config, catalog: Catalog) -> Self {
        let searcher = match config.tavily_api_key.clone().map(TavilyClient::new) {
            Some(Ok(client)) => Some(Arc::new(client) as Arc<dyn WebSearcher>),
            Some(Err(e)) => {
                warn!(error = %e, "Tavily client unavailable");
                None
            }
            None => None,
        };
        Self::build(searcher, catalog)
    }

    fn build(searcher: Option<Arc<dyn WebSearcher>>, catalog: Catalog) -> Self {
        Self {
            searcher,
            classifier: ProductClassifier::from_catalog(&catalog),
            normalizer: SiteNormalizer::from_catalog(&catalog),
            catalog: Arc::new(catalog),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Validation runs before the credential check, and both run before any
    /// network call.
    pub async fn search_by_term(&self, term: &str) -> Result<Vec<SiteRanking>> {
        let term = term.trim();
        if term.is_empty() {
            return Err(SearchError::Validation("Search term is required".to_string()));
        }

        let searcher = self.searcher.as_ref().ok_or_else(|| {
            SearchError::Config("Tavily API key is not configured".to_string())
        })?;

        let query = build_query(term, &self.catalog.query);
        info!(term, query = %query, "Searching products");

        let results = searcher.search(&query, &self.catalog.gateway).await?;
        let rankings = build_rankings(&results, &self.classifier, &self.normalizer, Utc::now());

        info!(
            term,
            results = results.len(),
            products = rankings.iter().map(|r| r.product_count).sum::<usize>(),
            sites = rankings.len(),
            "Search complete"
        );
        Ok(rankings)
    }
}
