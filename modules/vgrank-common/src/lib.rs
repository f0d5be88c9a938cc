pub mod catalog;
pub mod config;
pub mod error;
pub mod types;

pub use catalog::{
    load_catalog, Catalog, ExtractionRules, GatewayScope, KeywordRules, QueryTerms, SiteLabel,
};
pub use config::Config;
pub use error::{ErrorCategory, Result, SearchError};
pub use types::*;
