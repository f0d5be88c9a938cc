use thiserror::Error;

use tavily_client::TavilyError;

pub type Result<T> = std::result::Result<T, SearchError>;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Upstream error: {message}")]
    Upstream {
        status: Option<u16>,
        message: String,
    },

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Coarse grouping callers use to pick a response class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Bad input from the caller (4xx).
    Client,
    /// Misconfiguration or upstream failure (5xx).
    Server,
}

impl SearchError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SearchError::Validation(_) => ErrorCategory::Client,
            SearchError::Config(_) | SearchError::Upstream { .. } | SearchError::Parse(_) => {
                ErrorCategory::Server
            }
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            SearchError::Validation(_) => "validation",
            SearchError::Config(_) => "configuration",
            SearchError::Upstream { .. } => "upstream",
            SearchError::Parse(_) => "parse",
        }
    }
}

impl From<TavilyError> for SearchError {
    fn from(err: TavilyError) -> Self {
        match err {
            TavilyError::MissingApiKey => SearchError::Config(err.to_string()),
            TavilyError::Api { status, .. } => SearchError::Upstream {
                status: Some(status),
                message: err.to_string(),
            },
            TavilyError::Network(_) | TavilyError::Parse(_) => SearchError::Upstream {
                status: None,
                message: err.to_string(),
            },
        }
    }
}

impl From<serde_json::Error> for SearchError {
    fn from(err: serde_json::Error) -> Self {
        SearchError::Parse(err.to_string())
    }
}
