use std::collections::HashMap;

use chrono::{DateTime, Utc};
use url::Url;

use vgrank_common::{Catalog, Product, RawResult, SiteLabel, SiteRanking};

use crate::classifier::ProductClassifier;

pub const UNKNOWN_SITE: &str = "Unknown Site";

/// Maps a listing URL to a human-readable marketplace label.
#[derive(Debug, Clone)]
pub struct SiteNormalizer {
    sites: Vec<SiteLabel>,
}

impl SiteNormalizer {
    pub fn new(sites: Vec<SiteLabel>) -> Self {
        Self { sites }
    }

    pub fn from_catalog(catalog: &Catalog) -> Self {
        Self::new(catalog.sites.clone())
    }

    /// Table entries are checked in order and the first hostname substring
    /// match wins. Otherwise the second-from-last hostname label is used when
    /// there are more than two labels, else the whole hostname.
    pub fn site_name(&self, url: &str) -> String {
        let Some(hostname) = Url::parse(url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
        else {
            return UNKNOWN_SITE.to_string();
        };

        if let Some(entry) = self.sites.iter().find(|s| hostname.contains(&s.pattern)) {
            return entry.label.clone();
        }

        let parts: Vec<&str> = hostname.split('.').collect();
        if parts.len() > 2 {
            parts[parts.len() - 2].to_string()
        } else {
            hostname
        }
    }
}

/// Scheme + host (+ non-default port) of `url`.
pub fn origin(url: &str) -> Option<String> {
    Url::parse(url).ok().map(|u| u.origin().ascii_serialization())
}

/// Group products by normalized site in first-seen order. Each site's URL is
/// the origin of the first product assigned to it.
pub fn group_by_site<I>(
    normalizer: &SiteNormalizer,
    products: I,
    now: DateTime<Utc>,
) -> Vec<SiteRanking>
where
    I: IntoIterator<Item = (String, Product)>,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(String, String, Vec<Product>)> = Vec::new();

    for (url, product) in products {
        let site = normalizer.site_name(&url);
        match index.get(&site) {
            Some(&i) => groups[i].2.push(product),
            None => {
                index.insert(site.clone(), groups.len());
                let site_url = origin(&url).unwrap_or_default();
                groups.push((site, site_url, vec![product]));
            }
        }
    }

    groups
        .into_iter()
        .map(|(site, site_url, products)| SiteRanking::new(site, site_url, products, now))
        .collect()
}

/// Order by descending product count. Stable, so ties keep arrival order.
pub fn rank(mut rankings: Vec<SiteRanking>) -> Vec<SiteRanking> {
    rankings.sort_by(|a, b| b.product_count.cmp(&a.product_count));
    rankings
}

/// Classify every raw result, then group and rank the accepted products.
pub fn build_rankings(
    results: &[RawResult],
    classifier: &ProductClassifier,
    normalizer: &SiteNormalizer,
    now: DateTime<Utc>,
) -> Vec<SiteRanking> {
    let accepted = results
        .iter()
        .filter_map(|r| classifier.classify(r).map(|p| (r.url.clone(), p)));
    rank(group_by_site(normalizer, accepted, now))
}
