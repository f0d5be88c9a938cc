use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;
use url::Url;

use vgrank_common::{Catalog, ExtractionRules, KeywordRules, Product, RawResult};

/// Optional yen sign, a run of digits/commas, optional 円 suffix.
static PRICE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[¥￥]?([0-9,]+)円?").expect("valid price regex"));

/// Decides whether a search hit is a relevant product listing and, if so,
/// extracts a [`Product`] from its snippet.
///
/// Keywords are lowercased once at construction; matching is plain substring
/// search over the lowercased `title + " " + content`.
#[derive(Debug, Clone)]
pub struct ProductClassifier {
    include: Vec<String>,
    exclude: Vec<String>,
    out_of_stock: Vec<String>,
    extraction: ExtractionRules,
}

impl ProductClassifier {
    pub fn new(keywords: &KeywordRules, extraction: &ExtractionRules) -> Self {
        fn lower(list: &[String]) -> Vec<String> {
            list.iter().map(|k| k.to_lowercase()).collect()
        }
        Self {
            include: lower(&keywords.include),
            exclude: lower(&keywords.exclude),
            out_of_stock: lower(&keywords.out_of_stock),
            extraction: extraction.clone(),
        }
    }

    pub fn from_catalog(catalog: &Catalog) -> Self {
        Self::new(&catalog.keywords, &catalog.extraction)
    }

    /// Returns `None` for anything that is not a relevant product. Exclusion
    /// always wins over inclusion.
    pub fn classify(&self, result: &RawResult) -> Option<Product> {
        let haystack = format!("{} {}", result.title, result.content).to_lowercase();

        if self.exclude.iter().any(|k| haystack.contains(k.as_str())) {
            return None;
        }
        if !self.include.iter().any(|k| haystack.contains(k.as_str())) {
            return None;
        }

        if let Err(e) = parse_listing_url(&result.url) {
            warn!(url = %result.url, error = %e, "Dropping result with unusable URL");
            return None;
        }

        Some(Product {
            title: result.title.clone(),
            price: extract_price(&result.content),
            availability: self.is_available(&result.content),
            product_url: result.url.clone(),
            image_url: None,
            description: self.describe(&result.content),
            seller: None,
        })
    }

    fn is_available(&self, content: &str) -> bool {
        let content = content.to_lowercase();
        !self.out_of_stock.iter().any(|p| content.contains(p.as_str()))
    }

    /// First `description_limit` characters plus the marker. The marker is
    /// appended even when nothing was cut.
    fn describe(&self, content: &str) -> String {
        let mut description: String = content
            .chars()
            .take(self.extraction.description_limit)
            .collect();
        description.push_str(&self.extraction.truncation_marker);
        description
    }
}

/// First price-looking run in `content`, commas stripped. `0` when there is
/// no match or the match has no parsable digits.
pub fn extract_price(content: &str) -> u64 {
    PRICE_RE
        .captures(content)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().replace(',', "").parse().ok())
        .unwrap_or(0)
}

/// A listing URL must be absolute and carry a host so it can be grouped.
pub(crate) fn parse_listing_url(raw: &str) -> Result<Url, url::ParseError> {
    let url = Url::parse(raw)?;
    if url.host_str().is_none() {
        return Err(url::ParseError::EmptyHost);
    }
    Ok(url)
}
