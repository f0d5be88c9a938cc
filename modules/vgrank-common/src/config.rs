use std::env;
use std::path::PathBuf;

/// Application configuration loaded from environment variables.
/// Keyword and site tables live in the [`Catalog`](crate::Catalog), which can
/// be overridden from a TOML file named by `VGRANK_CATALOG`.
#[derive(Debug, Clone)]
pub struct Config {
    // Search gateway
    pub tavily_api_key: Option<String>,

    // Local state
    pub data_dir: PathBuf,
    pub catalog_path: Option<PathBuf>,

    // Web server
    pub web_host: String,
    pub web_port: u16,
}

impl Config {
    /// Load configuration from the environment (and `.env` if present).
    ///
    /// A missing `TAVILY_API_KEY` is not fatal here: it surfaces as a
    /// configuration error on the first search.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            tavily_api_key: optional_env("TAVILY_API_KEY"),
            data_dir: optional_env("VGRANK_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".vgrank")),
            catalog_path: optional_env("VGRANK_CATALOG").map(PathBuf::from),
            web_host: env::var("WEB_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            web_port: env::var("WEB_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
        }
    }

    /// Log which settings are present without leaking secrets.
    pub fn log_redacted(&self) {
        fn preview(val: &str) -> String {
            let n = val.char_indices().nth(5).map(|(i, _)| i).unwrap_or(val.len());
            format!("{}...({} chars)", &val[..n], val.len())
        }

        tracing::info!("Config loaded:");
        tracing::info!(
            "  TAVILY_API_KEY: {}",
            self.tavily_api_key
                .as_deref()
                .map(preview)
                .unwrap_or_else(|| "<not set>".to_string())
        );
        tracing::info!("  VGRANK_DATA_DIR: {}", self.data_dir.display());
        tracing::info!(
            "  VGRANK_CATALOG: {}",
            self.catalog_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "<built-in>".to_string())
        );
        tracing::info!("  WEB: {}:{}", self.web_host, self.web_port);
    }
}

fn optional_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}
