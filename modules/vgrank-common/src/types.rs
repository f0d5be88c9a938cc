use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// --- Search gateway output ---

/// One hit returned by the search gateway, already validated against the
/// expected schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawResult {
    pub title: String,
    pub url: String,
    pub content: String,
    #[serde(default)]
    pub score: f64,
}

impl From<tavily_client::SearchResult> for RawResult {
    fn from(r: tavily_client::SearchResult) -> Self {
        Self {
            title: r.title,
            url: r.url,
            content: r.content,
            score: r.score,
        }
    }
}

// --- Products and rankings ---

/// One discovered listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub title: String,
    /// Whole yen. `0` means no price was found, not "free".
    pub price: u64,
    pub availability: bool,
    pub product_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seller: Option<String>,
}

/// All products found on one normalized site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteRanking {
    pub site: String,
    pub site_url: String,
    pub product_count: usize,
    pub products: Vec<Product>,
    pub last_updated: DateTime<Utc>,
}

impl SiteRanking {
    pub fn new(
        site: String,
        site_url: String,
        products: Vec<Product>,
        last_updated: DateTime<Utc>,
    ) -> Self {
        Self {
            site,
            site_url,
            product_count: products.len(),
            products,
            last_updated,
        }
    }
}

// --- Filter preferences ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: u64,
    pub max: u64,
}

impl PriceRange {
    pub fn contains(&self, price: u64) -> bool {
        price >= self.min && price <= self.max
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    Price,
    Title,
    Site,
    Date,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// User-selected narrowing of a ranking snapshot. Every field is optional;
/// an all-`None` value leaves the snapshot untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_range: Option<PriceRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sites: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<SortBy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn product() -> Product {
        Product {
            title: "Title X DVD".to_string(),
            price: 3000,
            availability: true,
            product_url: "https://amazon.co.jp/x".to_string(),
            image_url: None,
            description: "価格 ¥3000円...".to_string(),
            seller: None,
        }
    }

    #[test]
    fn product_uses_camel_case_and_omits_empty_optionals() {
        let value = serde_json::to_value(product()).unwrap();
        assert_eq!(value["productUrl"], "https://amazon.co.jp/x");
        assert!(value.get("imageUrl").is_none());
        assert!(value.get("seller").is_none());
    }

    #[test]
    fn site_ranking_count_tracks_products() {
        let ranking = SiteRanking::new(
            "Amazon".to_string(),
            "https://amazon.co.jp".to_string(),
            vec![product(), product()],
            Utc::now(),
        );
        assert_eq!(ranking.product_count, 2);
    }

    #[test]
    fn last_updated_round_trips_through_iso_text() {
        let ts: DateTime<Utc> = "2026-10-19T09:30:00Z".parse().unwrap();
        let ranking = SiteRanking::new(
            "Amazon".to_string(),
            "https://amazon.co.jp".to_string(),
            vec![product()],
            ts,
        );
        let value = serde_json::to_value(&ranking).unwrap();
        assert_eq!(value["lastUpdated"], "2026-10-19T09:30:00Z");

        let restored: SiteRanking = serde_json::from_value(value).unwrap();
        assert_eq!(restored.last_updated, ts);
    }

    #[test]
    fn filters_accept_original_field_names() {
        let filters: SearchFilters = serde_json::from_value(json!({
            "priceRange": {"min": 1000, "max": 5000},
            "availability": true,
            "sortBy": "price",
            "sortOrder": "desc"
        }))
        .unwrap();
        assert_eq!(filters.price_range, Some(PriceRange { min: 1000, max: 5000 }));
        assert_eq!(filters.sort_by, Some(SortBy::Price));
        assert_eq!(filters.sort_order, Some(SortOrder::Desc));
        assert!(filters.sites.is_none());
    }
}
