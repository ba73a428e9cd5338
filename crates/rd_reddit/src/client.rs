use async_trait::async_trait;
use rd_core::{ArticleSource, Error, FetchParams, RawPost, Result, Target, TargetKind};
use reqwest::{Response, StatusCode};
use serde::Deserialize;
use std::fmt;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use url::Url;
use crate::listing::{ApiError, Listing};
use crate::logging::Logger;

pub const DEFAULT_AUTH_BASE: &str = "https://www.reddit.com";
pub const DEFAULT_API_BASE: &str = "https://oauth.reddit.com";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const TOKEN_REFRESH_MARGIN: Duration = Duration::from_secs(60);
const MAX_TOKEN_LIFETIME: Duration = Duration::from_secs(7 * 24 * 60 * 60);

#[derive(Clone)]
pub struct RedditCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub user_agent: String,
}

impl fmt::Debug for RedditCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedditCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: u64,
}

#[derive(Clone)]
struct AccessToken {
    value: String,
    expires_at: Instant,
}

impl AccessToken {
    fn is_fresh(&self) -> bool {
        Instant::now() + TOKEN_REFRESH_MARGIN < self.expires_at
    }
}

/// Application-only OAuth client for the listing endpoints.
pub struct RedditClient {
    http: reqwest::Client,
    credentials: RedditCredentials,
    auth_base: Url,
    api_base: Url,
    token: RwLock<Option<AccessToken>>,
}

impl fmt::Debug for RedditClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedditClient")
            .field("credentials", &self.credentials)
            .field("auth_base", &self.auth_base.as_str())
            .field("api_base", &self.api_base.as_str())
            .finish()
    }
}

impl RedditClient {
    pub fn new(credentials: RedditCredentials) -> Result<Self> {
        Self::with_base_urls(credentials, DEFAULT_AUTH_BASE, DEFAULT_API_BASE)
    }

    pub fn with_base_urls(credentials: RedditCredentials, auth_base: &str, api_base: &str) -> Result<Self> {
        if credentials.client_id.is_empty() || credentials.user_agent.is_empty() {
            return Err(Error::Config("Reddit client id and user agent are required".to_string()));
        }
        let http = reqwest::Client::builder()
            .user_agent(credentials.user_agent.clone())
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            credentials,
            auth_base: parse_base(auth_base)?,
            api_base: parse_base(api_base)?,
            token: RwLock::new(None),
        })
    }

    async fn access_token(&self) -> Result<String> {
        if let Some(token) = self.token.read().await.as_ref().filter(|t| t.is_fresh()) {
            return Ok(token.value.clone());
        }

        let mut slot = self.token.write().await;
        // another request may have refreshed while we waited for the lock
        if let Some(token) = slot.as_ref().filter(|t| t.is_fresh()) {
            return Ok(token.value.clone());
        }

        let token = self.request_token().await?;
        let value = token.value.clone();
        *slot = Some(token);
        Ok(value)
    }

    async fn request_token(&self) -> Result<AccessToken> {
        let url = join(&self.auth_base, &["api", "v1", "access_token"])?;
        tracing::debug!("🔑 Requesting access token from {}", url);

        let response = self
            .http
            .post(url)
            .basic_auth(&self.credentials.client_id, Some(&self.credentials.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;
        let response = check_status(response, "Failed to obtain access token").await?;
        let token: TokenResponse = serde_json::from_str(&response.text().await?)?;

        let lifetime = Duration::from_secs(token.expires_in).min(MAX_TOKEN_LIFETIME);
        Ok(AccessToken {
            value: token.access_token,
            expires_at: Instant::now() + lifetime,
        })
    }

    fn listing_url(&self, target: &Target, params: &FetchParams) -> Result<Url> {
        target.validate()?;
        params.validate_for(target)?;
        let mut url = match target.kind {
            TargetKind::Subreddit => join(
                &self.api_base,
                &["r", target.name.as_str(), params.sort.unwrap_or_default().as_str()],
            )?,
            TargetKind::User => join(&self.api_base, &["user", target.name.as_str(), "submitted"])?,
        };

        {
            let mut query = url.query_pairs_mut();
            if target.kind == TargetKind::User {
                if let Some(sort) = params.sort {
                    query.append_pair("sort", sort.as_str());
                }
            }
            if let Some(time) = params.time {
                query.append_pair("t", time.as_str());
            }
            if let Some(limit) = params.limit {
                query.append_pair("limit", &limit.to_string());
            }
            query.append_pair("raw_json", "1");
        }

        Ok(url)
    }
}

#[async_trait]
impl ArticleSource for RedditClient {
    fn name(&self) -> &str {
        "reddit"
    }

    async fn fetch_posts(&self, target: &Target, params: &FetchParams) -> Result<Vec<RawPost>> {
        let log = Logger::new().with_prefix("[reddit]").with_prefix(target.to_string());
        let url = self.listing_url(target, params)?;
        log.debug(&format!("GET {}", url));

        let token = self.access_token().await?;
        let response = self.http.get(url).bearer_auth(token).send().await;
        let response = match response {
            Ok(response) => response,
            Err(e) => {
                log.warn(&format!("request failed: {}", e));
                return Err(e.into());
            }
        };

        let response = match check_status(response, &format!("Failed to fetch {}", target)).await {
            Ok(response) => response,
            Err(e) => {
                log.warn(&e.to_string());
                return Err(e);
            }
        };

        let listing: Listing = serde_json::from_str(&response.text().await?)?;
        let posts = listing.into_posts();
        log.info(&format!("received {} posts", posts.len()));
        Ok(posts)
    }
}

fn parse_base(base: &str) -> Result<Url> {
    let url = Url::parse(base).map_err(|e| Error::Config(format!("Invalid base URL {}: {}", base, e)))?;
    if url.cannot_be_a_base() {
        return Err(Error::Config(format!("Invalid base URL: {}", base)));
    }
    Ok(url)
}

fn join(base: &Url, segments: &[&str]) -> Result<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| Error::Config(format!("Invalid base URL: {}", base)))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

async fn check_status(response: Response, context: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(Error::upstream(
        Some(status.as_u16()),
        format!("{}: {}", context, error_detail(status, &body)),
    ))
}

fn error_detail(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<ApiError>(body)
        .ok()
        .and_then(|e| e.message.or(e.reason))
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error").to_string())
}
