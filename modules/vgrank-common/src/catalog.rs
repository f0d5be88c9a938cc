//! Static tables that drive query construction, classification and site
//! normalization. The built-in defaults target live-action BL videograms sold
//! on Japanese marketplaces; any section can be overridden from TOML.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::Config;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Catalog {
    pub query: QueryTerms,
    pub gateway: GatewayScope,
    pub keywords: KeywordRules,
    pub extraction: ExtractionRules,
    /// Ordered hostname-substring table. First match wins.
    pub sites: Vec<SiteLabel>,
}

/// Terms spliced into the search-engine query string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryTerms {
    pub include: Vec<String>,
    pub exclude: Vec<String>,
}

/// Parameters sent to the search gateway alongside the query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayScope {
    pub max_results: u32,
    pub search_depth: String,
    pub include_domains: Vec<String>,
    pub exclude_domains: Vec<String>,
}

/// Keyword sets the classifier matches case-insensitively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordRules {
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    pub out_of_stock: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionRules {
    /// Max characters of content kept in a product description.
    pub description_limit: usize,
    /// Appended to every description, truncated or not.
    pub truncation_marker: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteLabel {
    pub pattern: String,
    pub label: String,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for QueryTerms {
    fn default() -> Self {
        Self {
            include: strings(&[
                "BL",
                "ボーイズラブ",
                "Boys Love",
                "実写BL",
                "DVD",
                "Blu-ray",
                "ビデオグラム",
                "映画",
                "ドラマ",
            ]),
            exclude: strings(&[
                "カード",
                "TCG",
                "トレーディング",
                "カードゲーム",
                "プレイマット",
                "スリーブ",
                "デッキ",
                "ポケモン",
                "遊戯王",
                "カードショップ",
            ]),
        }
    }
}

impl Default for GatewayScope {
    fn default() -> Self {
        Self {
            max_results: 30,
            search_depth: "advanced".to_string(),
            include_domains: strings(&[
                "amazon.co.jp",
                "rakuten.co.jp",
                "yahoo.co.jp",
                "tsutaya.co.jp",
                "hmv.co.jp",
            ]),
            exclude_domains: strings(&[
                "google.com",
                "bing.com",
                "cardshop.jp",
                "tcg.jp",
                "cardlab.jp",
                "toretoku.jp",
                "hareruya.com",
                "bigmagic.net",
                "fullahead.jp",
                "pokemon.co.jp",
                "yugioh-card.com",
            ]),
        }
    }
}

impl Default for KeywordRules {
    fn default() -> Self {
        Self {
            include: strings(&[
                "bl",
                "ボーイズラブ",
                "boys love",
                "実写",
                "dvd",
                "blu-ray",
                "ビデオグラム",
                "映画",
                "ドラマ",
            ]),
            exclude: strings(&[
                "カード",
                "TCG",
                "トレーディング",
                "カードゲーム",
                "プレイマット",
                "スリーブ",
                "デッキ",
                "ポケモン",
                "遊戯王",
            ]),
            out_of_stock: strings(&["売り切れ", "品切れ", "在庫なし"]),
        }
    }
}

impl Default for ExtractionRules {
    fn default() -> Self {
        Self {
            description_limit: 200,
            truncation_marker: "...".to_string(),
        }
    }
}

impl Default for Catalog {
    fn default() -> Self {
        let sites = [
            ("amazon", "Amazon"),
            ("rakuten", "楽天市場"),
            ("yahoo", "Yahoo!ショッピング"),
            ("mercari", "メルカリ"),
            ("tsutaya", "TSUTAYA"),
            ("hmv", "HMV&BOOKS"),
            ("7net", "セブンネット"),
            ("yodobashi", "ヨドバシ"),
            ("biccamera", "ビックカメラ"),
        ]
        .into_iter()
        .map(|(pattern, label)| SiteLabel {
            pattern: pattern.to_string(),
            label: label.to_string(),
        })
        .collect();

        Self {
            query: QueryTerms::default(),
            gateway: GatewayScope::default(),
            keywords: KeywordRules::default(),
            extraction: ExtractionRules::default(),
            sites,
        }
    }
}

impl Catalog {
    /// Built-in tables, or the TOML file named in the config.
    pub fn from_config(config: &Config) -> Result<Self> {
        match &config.catalog_path {
            Some(path) => load_catalog(path),
            None => Ok(Self::default()),
        }
    }
}

/// Load and parse a TOML catalog file. Missing sections keep their defaults.
pub fn load_catalog(path: &Path) -> Result<Catalog> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog file: {}", path.display()))?;
    let catalog: Catalog = toml::from_str(&content)
        .with_context(|| format!("Failed to parse catalog file: {}", path.display()))?;
    tracing::info!(
        path = %path.display(),
        sites = catalog.sites.len(),
        "Loaded catalog"
    );
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn site_table_keeps_amazon_first() {
        let catalog = Catalog::default();
        let patterns: Vec<&str> = catalog.sites.iter().map(|s| s.pattern.as_str()).collect();
        assert_eq!(
            patterns,
            vec!["amazon", "rakuten", "yahoo", "mercari", "tsutaya", "hmv", "7net", "yodobashi", "biccamera"]
        );
    }

    #[test]
    fn query_exclusions_are_a_superset_of_classifier_exclusions() {
        let catalog = Catalog::default();
        for kw in &catalog.keywords.exclude {
            assert!(catalog.query.exclude.contains(kw), "{kw} missing from query");
        }
        assert!(catalog.query.exclude.contains(&"カードショップ".to_string()));
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let catalog: Catalog = toml::from_str(
            r#"
            [gateway]
            max_results = 10

            [keywords]
            include = ["anime"]
            "#,
        )
        .unwrap();

        assert_eq!(catalog.gateway.max_results, 10);
        assert_eq!(catalog.gateway.search_depth, "advanced");
        assert_eq!(catalog.keywords.include, vec!["anime".to_string()]);
        assert_eq!(catalog.keywords.out_of_stock.len(), 3);
        assert_eq!(catalog.sites, Catalog::default().sites);
    }

    #[test]
    fn load_catalog_reads_sites_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            [[sites]]
            pattern = "animate"
            label = "アニメイト"
            "#
        )
        .unwrap();

        let catalog = load_catalog(file.path()).unwrap();
        assert_eq!(catalog.sites.len(), 1);
        assert_eq!(catalog.sites[0].label, "アニメイト");
    }

    #[test]
    fn load_catalog_reports_missing_file() {
        let err = load_catalog(Path::new("/nonexistent/vgrank.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read catalog file"));
    }
}
