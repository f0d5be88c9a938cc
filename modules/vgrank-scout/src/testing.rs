// Test doubles for the search pipeline.
//
// MockSearcher (WebSearcher): query-keyed canned results, records every
// query it receives so tests can assert nothing reached the gateway.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use vgrank_common::{GatewayScope, RawResult, Result, SearchError};

use crate::traits::WebSearcher;

/// Builder pattern: `.on()`, `.on_any()`, `.failing()`.
/// Returns an upstream error for queries with nothing registered.
pub struct MockSearcher {
    by_query: HashMap<String, Vec<RawResult>>,
    fallback: Option<Vec<RawResult>>,
    failure: Option<(Option<u16>, String)>,
    queries: Mutex<Vec<String>>,
    scopes: Mutex<Vec<GatewayScope>>,
}

impl Default for MockSearcher {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSearcher {
    pub fn new() -> Self {
        Self {
            by_query: HashMap::new(),
            fallback: None,
            failure: None,
            queries: Mutex::new(Vec::new()),
            scopes: Mutex::new(Vec::new()),
        }
    }

    pub fn on(mut self, query: &str, results: Vec<RawResult>) -> Self {
        self.by_query.insert(query.to_string(), results);
        self
    }

    /// Results for any query without an exact registration.
    pub fn on_any(mut self, results: Vec<RawResult>) -> Self {
        self.fallback = Some(results);
        self
    }

    /// Every search fails with an upstream error.
    pub fn failing(mut self, status: Option<u16>, message: &str) -> Self {
        self.failure = Some((status, message.to_string()));
        self
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().map(|q| q.clone()).unwrap_or_default()
    }

    pub fn scopes(&self) -> Vec<GatewayScope> {
        self.scopes.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl WebSearcher for MockSearcher {
    async fn search(&self, query: &str, scope: &GatewayScope) -> Result<Vec<RawResult>> {
        if let Ok(mut q) = self.queries.lock() {
            q.push(query.to_string());
        }
        if let Ok(mut s) = self.scopes.lock() {
            s.push(scope.clone());
        }

        if let Some((status, message)) = &self.failure {
            return Err(SearchError::Upstream {
                status: *status,
                message: message.clone(),
            });
        }

        self.by_query
            .get(query)
            .or(self.fallback.as_ref())
            .cloned()
            .ok_or_else(|| SearchError::Upstream {
                status: None,
                message: format!("MockSearcher: no results registered for {query}"),
            })
    }
}

// ---------------------------------------------------------------------------
// Fixture helpers
// ---------------------------------------------------------------------------

pub fn raw(title: &str, url: &str, content: &str) -> RawResult {
    RawResult {
        title: title.to_string(),
        url: url.to_string(),
        content: content.to_string(),
        score: 0.5,
    }
}

/// One DVD listing and one card-game listing, both on Amazon.
pub fn title_x_results() -> Vec<RawResult> {
    vec![
        raw(
            "Title X DVD 実写版",
            "https://amazon.co.jp/x",
            "価格 ¥3000円 在庫あり",
        ),
        raw("Title X カードゲーム", "https://amazon.co.jp/y", "..."),
    ]
}
