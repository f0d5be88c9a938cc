use std::cmp::Ordering;

use vgrank_common::{SearchFilters, SiteRanking, SortBy, SortOrder};

use crate::ranking::rank;

/// Narrow a ranking snapshot with saved filter preferences.
///
/// Product-level filters (price range, availability) run first; sites left
/// without products are dropped and counts recomputed. `price`/`title` sorts
/// reorder products inside each site, `site`/`date` sorts reorder the sites.
/// Without a site-level sort the result is re-ranked by count.
pub fn apply_filters(rankings: Vec<SiteRanking>, filters: &SearchFilters) -> Vec<SiteRanking> {
    let order = filters.sort_order.unwrap_or_default();

    let mut filtered: Vec<SiteRanking> = rankings
        .into_iter()
        .filter(|s| {
            filters
                .sites
                .as_ref()
                .map_or(true, |allowed| allowed.iter().any(|a| a == &s.site))
        })
        .filter_map(|s| {
            let mut products: Vec<_> = s
                .products
                .into_iter()
                .filter(|p| filters.price_range.map_or(true, |r| r.contains(p.price)))
                .filter(|p| filters.availability.map_or(true, |a| p.availability == a))
                .collect();
            if products.is_empty() {
                return None;
            }
            match filters.sort_by {
                Some(SortBy::Price) => {
                    products.sort_by(|a, b| directed(a.price.cmp(&b.price), order))
                }
                Some(SortBy::Title) => {
                    products.sort_by(|a, b| directed(a.title.cmp(&b.title), order))
                }
                _ => {}
            }
            Some(SiteRanking::new(s.site, s.site_url, products, s.last_updated))
        })
        .collect();

    match filters.sort_by {
        Some(SortBy::Site) => {
            filtered.sort_by(|a, b| directed(a.site.cmp(&b.site), order));
            filtered
        }
        Some(SortBy::Date) => {
            filtered.sort_by(|a, b| directed(a.last_updated.cmp(&b.last_updated), order));
            filtered
        }
        _ => rank(filtered),
    }
}

fn directed(ordering: Ordering, order: SortOrder) -> Ordering {
    match order {
        SortOrder::Asc => ordering,
        SortOrder::Desc => ordering.reverse(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use vgrank_common::{PriceRange, Product};

    fn product(title: &str, price: u64, availability: bool) -> Product {
        Product {
            title: title.to_string(),
            price,
            availability,
            product_url: format!("https://example.com/{title}"),
            image_url: None,
            description: "...".to_string(),
            seller: None,
        }
    }

    fn snapshot() -> Vec<SiteRanking> {
        let now = Utc::now();
        vec![
            SiteRanking::new(
                "Amazon".to_string(),
                "https://amazon.co.jp".to_string(),
                vec![
                    product("b", 3000, true),
                    product("a", 1000, false),
                    product("c", 8000, true),
                ],
                now,
            ),
            SiteRanking::new(
                "HMV&BOOKS".to_string(),
                "https://hmv.co.jp".to_string(),
                vec![product("d", 500, true), product("e", 0, true)],
                now - Duration::hours(1),
            ),
        ]
    }

    #[test]
    fn default_filters_keep_everything() {
        let out = apply_filters(snapshot(), &SearchFilters::default());
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].product_count, 3);
        assert_eq!(out[1].product_count, 2);
    }

    #[test]
    fn price_range_drops_products_and_empty_sites() {
        let filters = SearchFilters {
            price_range: Some(PriceRange { min: 2000, max: 9000 }),
            ..Default::default()
        };
        let out = apply_filters(snapshot(), &filters);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].site, "Amazon");
        assert_eq!(out[0].product_count, 2);
    }

    #[test]
    fn availability_filter_recomputes_counts_and_reranks() {
        let filters = SearchFilters {
            availability: Some(true),
            ..Default::default()
        };
        let out = apply_filters(snapshot(), &filters);
        let counts: Vec<(&str, usize)> =
            out.iter().map(|s| (s.site.as_str(), s.product_count)).collect();
        assert_eq!(counts, vec![("Amazon", 2), ("HMV&BOOKS", 2)]);
    }

    #[test]
    fn site_allow_list() {
        let filters = SearchFilters {
            sites: Some(vec!["HMV&BOOKS".to_string()]),
            ..Default::default()
        };
        let out = apply_filters(snapshot(), &filters);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].site, "HMV&BOOKS");
    }

    #[test]
    fn price_sort_descending_within_site() {
        let filters = SearchFilters {
            sort_by: Some(SortBy::Price),
            sort_order: Some(SortOrder::Desc),
            ..Default::default()
        };
        let out = apply_filters(snapshot(), &filters);
        let prices: Vec<u64> = out[0].products.iter().map(|p| p.price).collect();
        assert_eq!(prices, vec![8000, 3000, 1000]);
    }

    #[test]
    fn date_sort_orders_sites() {
        let filters = SearchFilters {
            sort_by: Some(SortBy::Date),
            ..Default::default()
        };
        let out = apply_filters(snapshot(), &filters);
        assert_eq!(out[0].site, "HMV&BOOKS");
        assert_eq!(out[1].site, "Amazon");
    }
}
