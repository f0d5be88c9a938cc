use serde::Serialize;

use vgrank_common::SiteRanking;

/// Aggregate figures for one ranking snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingStats {
    pub total_products: usize,
    pub site_count: usize,
    /// Mean of per-site mean prices. Zero prices count.
    pub average_price: f64,
    pub available_products: usize,
    /// Percentage, 0.0 when there are no products.
    pub availability_rate: f64,
    pub sites: Vec<SiteShare>,
    pub price_summaries: Vec<PriceSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiteShare {
    pub site: String,
    pub product_count: usize,
    /// Relative to the busiest site, for bar widths.
    pub share_of_max: f64,
    pub share_of_total: f64,
}

/// Price spread over a site's priced products.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSummary {
    pub site: String,
    pub min: u64,
    pub average: f64,
    pub max: u64,
}

impl RankingStats {
    pub fn compute(rankings: &[SiteRanking]) -> Self {
        let total_products: usize = rankings.iter().map(|s| s.product_count).sum();
        let max_count = rankings.iter().map(|s| s.product_count).max().unwrap_or(0);

        let average_price = if rankings.is_empty() {
            0.0
        } else {
            let sum_of_site_means: f64 = rankings
                .iter()
                .map(|s| mean(s.products.iter().map(|p| p.price)).unwrap_or(0.0))
                .sum();
            sum_of_site_means / rankings.len() as f64
        };

        let available_products = rankings
            .iter()
            .flat_map(|s| s.products.iter())
            .filter(|p| p.availability)
            .count();
        let availability_rate = percent(available_products, total_products);

        let sites = rankings
            .iter()
            .map(|s| SiteShare {
                site: s.site.clone(),
                product_count: s.product_count,
                share_of_max: percent(s.product_count, max_count),
                share_of_total: percent(s.product_count, total_products),
            })
            .collect();

        let price_summaries = rankings
            .iter()
            .filter_map(|s| {
                let prices: Vec<u64> = s
                    .products
                    .iter()
                    .map(|p| p.price)
                    .filter(|&p| p > 0)
                    .collect();
                Some(PriceSummary {
                    site: s.site.clone(),
                    min: *prices.iter().min()?,
                    average: mean(prices.iter().copied())?,
                    max: *prices.iter().max()?,
                })
            })
            .collect();

        Self {
            total_products,
            site_count: rankings.len(),
            average_price,
            available_products,
            availability_rate,
            sites,
            price_summaries,
        }
    }
}

fn mean(values: impl Iterator<Item = u64>) -> Option<f64> {
    let (sum, n) = values.fold((0u128, 0usize), |(sum, n), v| (sum + v as u128, n + 1));
    (n > 0).then(|| sum as f64 / n as f64)
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use vgrank_common::Product;

    fn product(price: u64, availability: bool) -> Product {
        Product {
            title: "t".to_string(),
            price,
            availability,
            product_url: "https://amazon.co.jp/x".to_string(),
            image_url: None,
            description: "...".to_string(),
            seller: None,
        }
    }

    fn site(name: &str, products: Vec<Product>) -> SiteRanking {
        SiteRanking::new(
            name.to_string(),
            format!("https://{name}.example"),
            products,
            Utc::now(),
        )
    }

    #[test]
    fn empty_snapshot_is_all_zero() {
        let stats = RankingStats::compute(&[]);
        assert_eq!(stats.total_products, 0);
        assert_eq!(stats.site_count, 0);
        assert_eq!(stats.average_price, 0.0);
        assert_eq!(stats.availability_rate, 0.0);
        assert!(stats.price_summaries.is_empty());
    }

    #[test]
    fn average_price_is_mean_of_site_means() {
        let stats = RankingStats::compute(&[
            site("a", vec![product(1000, true), product(3000, true)]),
            site("b", vec![product(0, false)]),
        ]);
        // site a: 2000, site b: 0
        assert_eq!(stats.average_price, 1000.0);
        assert_eq!(stats.total_products, 3);
        assert_eq!(stats.available_products, 2);
        assert!((stats.availability_rate - 66.666).abs() < 0.01);
    }

    #[test]
    fn shares_are_relative_to_max_and_total() {
        let stats = RankingStats::compute(&[
            site("a", vec![product(1, true); 4]),
            site("b", vec![product(1, true); 1]),
        ]);
        assert_eq!(stats.sites[0].share_of_max, 100.0);
        assert_eq!(stats.sites[1].share_of_max, 25.0);
        assert_eq!(stats.sites[1].share_of_total, 20.0);
    }

    #[test]
    fn price_summary_skips_unpriced_products_and_sites() {
        let stats = RankingStats::compute(&[
            site("a", vec![product(0, true), product(1500, true), product(4500, true)]),
            site("b", vec![product(0, true)]),
        ]);
        assert_eq!(
            stats.price_summaries,
            vec![PriceSummary {
                site: "a".to_string(),
                min: 1500,
                average: 3000.0,
                max: 4500,
            }]
        );
    }
}
