use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use tracing::{error, warn};

use vgrank_common::SearchError;

use crate::AppState;

#[derive(Deserialize)]
pub struct SearchRequest {
    #[serde(rename = "searchTerm")]
    search_term: Option<String>,
}

/// POST /api/search: run one search and return the per-site ranking.
pub async fn api_search(
    State(state): State<Arc<AppState>>,
    body: Result<Json<SearchRequest>, JsonRejection>,
) -> Response {
    let term = match body {
        Ok(Json(body)) => body.search_term.unwrap_or_default(),
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "Unreadable search request");
            return failed_search(rejection.body_text());
        }
    };

    match state.search.search_by_term(&term).await {
        Ok(rankings) => Json(serde_json::json!({
            "success": true,
            "data": rankings,
            "searchTerm": term,
        }))
        .into_response(),
        Err(SearchError::Validation(message)) => (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": message })),
        )
            .into_response(),
        Err(SearchError::Config(message)) => {
            warn!(%message, "Search rejected: gateway not configured");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": message })),
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, kind = e.kind(), "Search failed");
            failed_search(e.to_string())
        }
    }
}

fn failed_search(details: String) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({
            "error": "Failed to search products",
            "details": details,
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request};
    use serde_json::Value;
    use tower::ServiceExt;

    use vgrank_common::Catalog;
    use vgrank_scout::search::ProductSearch;
    use vgrank_scout::testing::{title_x_results, MockSearcher};

    fn router_with(mock: MockSearcher) -> axum::Router {
        let state = Arc::new(AppState {
            search: ProductSearch::new(Arc::new(mock), Catalog::default()),
        });
        crate::app(state)
    }

    fn post_search(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/search")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn send(router: axum::Router, req: Request<Body>) -> (StatusCode, Value, Option<String>) {
        let resp = router.oneshot(req).await.unwrap();
        let status = resp.status();
        let cache = resp
            .headers()
            .get(header::CACHE_CONTROL)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json, cache)
    }

    #[tokio::test]
    async fn success_wraps_rankings() {
        let router = router_with(MockSearcher::new().on_any(title_x_results()));
        let (status, body, cache) = send(router, post_search(r#"{"searchTerm":"Title X"}"#)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(cache.as_deref(), Some("no-store"));
        assert_eq!(body["success"], true);
        assert_eq!(body["searchTerm"], "Title X");
        assert_eq!(body["data"][0]["site"], "Amazon");
        assert_eq!(body["data"][0]["siteUrl"], "https://amazon.co.jp");
        assert_eq!(body["data"][0]["productCount"], 1);
        assert_eq!(body["data"][0]["products"][0]["price"], 3000);
    }

    #[tokio::test]
    async fn missing_term_is_a_bad_request() {
        let mock = Arc::new(MockSearcher::new().on_any(Vec::new()));
        let state = Arc::new(AppState {
            search: ProductSearch::new(mock.clone(), Catalog::default()),
        });

        for body in [r#"{}"#, r#"{"searchTerm":""}"#, r#"{"searchTerm":"   "}"#] {
            let (status, json, _) = send(crate::app(state.clone()), post_search(body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(json["error"], "Search term is required");
        }
        assert!(mock.queries().is_empty());
    }

    #[tokio::test]
    async fn upstream_failure_reports_details() {
        let router = router_with(MockSearcher::new().failing(Some(401), "Tavily API error: 401 Unauthorized"));
        let (status, body, _) = send(router, post_search(r#"{"searchTerm":"Title X"}"#)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to search products");
        assert!(body["details"].as_str().unwrap().contains("401"));
    }

    #[tokio::test]
    async fn missing_api_key_is_a_server_error() {
        let config = vgrank_common::Config {
            tavily_api_key: None,
            data_dir: ".vgrank".into(),
            catalog_path: None,
            web_host: "127.0.0.1".to_string(),
            web_port: 0,
        };
        let state = Arc::new(AppState {
            search: ProductSearch::from_config(&config, Catalog::default()),
        });
        let (status, body, _) =
            send(crate::app(state), post_search(r#"{"searchTerm":"Title X"}"#)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Tavily API key is not configured");
        assert!(body.get("details").is_none());
    }

    #[tokio::test]
    async fn unreadable_bodies_get_the_json_error_shape() {
        let mock = Arc::new(MockSearcher::new().on_any(Vec::new()));
        let state = Arc::new(AppState {
            search: ProductSearch::new(mock.clone(), Catalog::default()),
        });

        let text_plain = Request::builder()
            .method("POST")
            .uri("/api/search")
            .header(header::CONTENT_TYPE, "text/plain")
            .body(Body::from(r#"{"searchTerm":"Title X"}"#))
            .unwrap();
        let requests = [
            post_search("{not json"),
            post_search(r#"{"searchTerm": 5}"#),
            text_plain,
        ];

        for req in requests {
            let (status, body, _) = send(crate::app(state.clone()), req).await;
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(body["error"], "Failed to search products");
            assert!(body["details"].is_string());
        }
        assert!(mock.queries().is_empty());
    }

    #[tokio::test]
    async fn health_check_is_plain_ok() {
        let router = router_with(MockSearcher::new());
        let req = Request::builder().uri("/").body(Body::empty()).unwrap();
        let resp = router.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"ok");
    }
}
