use axum::http::HeaderName;
use rd_core::{ArticleQueryService, Error, Result};

pub struct AppState {
    pub query: ArticleQueryService,
    pub default_subreddit: String,
    pub default_load_count: u32,
    pub api_key: Option<ApiKey>,
}

impl AppState {
    pub fn new(query: ArticleQueryService, default_subreddit: impl Into<String>, default_load_count: u32) -> Self {
        Self {
            query,
            default_subreddit: default_subreddit.into(),
            default_load_count,
            api_key: None,
        }
    }

    pub fn with_api_key(mut self, api_key: Option<ApiKey>) -> Self {
        self.api_key = api_key;
        self
    }
}

/// Header every request must carry when authentication is enabled.
#[derive(Clone)]
pub struct ApiKey {
    pub header: HeaderName,
    pub value: String,
}

impl ApiKey {
    /// Authentication is enabled only when both parts are configured and non-empty.
    pub fn from_config(name: Option<&str>, value: Option<&str>) -> Result<Option<Self>> {
        let (Some(name), Some(value)) = (
            name.filter(|n| !n.is_empty()),
            value.filter(|v| !v.is_empty()),
        ) else {
            return Ok(None);
        };
        let header = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| Error::Config(format!("Invalid auth header name {}: {}", name, e)))?;
        Ok(Some(Self {
            header,
            value: value.to_string(),
        }))
    }
}
