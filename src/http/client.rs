//! Trello API client
//!
//! Wraps reqwest with key/token authentication, bounded retries with
//! backoff, and rate limiting. Streams never retry on top of this layer;
//! once a request fails here it is fatal to the sync.

use super::rate_limit::{RateLimiter, RateLimiterConfig};
use crate::config::TapConfig;
use crate::error::{Error, Result};
use crate::types::BackoffType;
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Default API root
pub const ENDPOINT_BASE: &str = "https://api.trello.com/1";

/// Fetch capability consumed by streams
///
/// `get_list` is the one request shape the extraction core needs: an
/// authenticated GET returning a JSON array of records. Tests substitute
/// their own implementations to script responses.
#[async_trait]
pub trait TrelloApi: Send + Sync {
    /// The authenticated member's id, used to fill top-level endpoint
    /// templates like `/members/{}/boards`
    fn member_id(&self) -> &str;

    /// GET an endpoint expected to return a JSON array
    async fn get_list(&self, endpoint: &str, params: &[(String, String)]) -> Result<Vec<Value>>;
}

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL for all requests
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// Maximum number of retries
    pub max_retries: u32,
    /// Initial delay for backoff
    pub initial_backoff: Duration,
    /// Maximum delay for backoff
    pub max_backoff: Duration,
    /// Type of backoff strategy
    pub backoff_type: BackoffType,
    /// Rate limiter configuration; None disables rate limiting
    pub rate_limit: Option<RateLimiterConfig>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: ENDPOINT_BASE.to_string(),
            timeout: Duration::from_secs(30),
            max_retries: 3,
            initial_backoff: Duration::from_secs(10),
            max_backoff: Duration::from_secs(60),
            backoff_type: BackoffType::Constant,
            rate_limit: Some(RateLimiterConfig::default()),
        }
    }
}

/// Authenticated Trello API client
pub struct TrelloClient {
    client: Client,
    config: ClientConfig,
    api_key: String,
    api_token: String,
    member_id: String,
    rate_limiter: Option<RateLimiter>,
}

impl TrelloClient {
    /// Build a client from tap configuration and resolve the
    /// authenticated member id via `GET /members/me`.
    pub async fn connect(tap_config: &TapConfig) -> Result<Self> {
        let mut config = ClientConfig::default();
        if let Some(url) = &tap_config.api_url {
            config.base_url = url.trim_end_matches('/').to_string();
        }
        Self::connect_with_config(tap_config, config).await
    }

    /// Build a client with explicit HTTP configuration
    pub async fn connect_with_config(
        tap_config: &TapConfig,
        config: ClientConfig,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(format!("trello-tap/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        let rate_limiter = config.rate_limit.as_ref().map(RateLimiter::new);

        let mut this = Self {
            client,
            config,
            api_key: tap_config.api_key.clone(),
            api_token: tap_config.api_token.clone(),
            member_id: String::new(),
            rate_limiter,
        };

        let me = this.get_json("/members/me", &[]).await?;
        this.member_id = me
            .get("id")
            .and_then(|v| v.as_str())
            .ok_or_else(|| {
                Error::unexpected_response("/members/me", "response has no 'id' field")
            })?
            .to_string();
        info!(member_id = %this.member_id, "resolved authenticated member");

        Ok(this)
    }

    /// GET an endpoint and decode the body as JSON
    pub async fn get_json(&self, endpoint: &str, params: &[(String, String)]) -> Result<Value> {
        let response = self.request_with_retries(endpoint, params).await?;
        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| Error::unexpected_response(endpoint, format!("invalid JSON body: {e}")))
    }

    async fn request_with_retries(
        &self,
        endpoint: &str,
        params: &[(String, String)],
    ) -> Result<Response> {
        let url = format!("{}{}", self.config.base_url, endpoint);
        let max_retries = self.config.max_retries;
        let mut last_error = None;
        let mut attempt = 0;

        while attempt <= max_retries {
            if let Some(ref limiter) = self.rate_limiter {
                limiter.wait().await;
            }

            debug!(%url, ?params, attempt, "GET");

            let req = self
                .client
                .get(&url)
                .query(params)
                .query(&[("key", self.api_key.as_str()), ("token", self.api_token.as_str())]);

            match req.send().await {
                Ok(response) => {
                    let status = response.status();

                    if status == StatusCode::TOO_MANY_REQUESTS {
                        let retry_after = extract_retry_after(&response);
                        if attempt < max_retries {
                            warn!(
                                "Rate limited (429), attempt {}/{}, waiting {}s",
                                attempt + 1,
                                max_retries + 1,
                                retry_after
                            );
                            tokio::time::sleep(Duration::from_secs(retry_after)).await;
                            attempt += 1;
                            continue;
                        }
                        return Err(Error::RateLimited {
                            retry_after_seconds: retry_after,
                        });
                    }

                    if is_retryable_status(status) && attempt < max_retries {
                        let delay = self.calculate_backoff(attempt);
                        warn!(
                            "Request failed with {}, attempt {}/{}, retrying in {:?}",
                            status.as_u16(),
                            attempt + 1,
                            max_retries + 1,
                            delay
                        );
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                        last_error = Some(Error::HttpStatus {
                            status: status.as_u16(),
                            body: String::new(),
                        });
                        continue;
                    }

                    if status.is_client_error() || status.is_server_error() {
                        let body = response.text().await.unwrap_or_default();
                        return Err(Error::HttpStatus {
                            status: status.as_u16(),
                            body,
                        });
                    }

                    return Ok(response);
                }
                Err(e) => {
                    if (e.is_timeout() || e.is_connect()) && attempt < max_retries {
                        let delay = self.calculate_backoff(attempt);
                        warn!(
                            "Transport error, attempt {}/{}, retrying in {:?}: {}",
                            attempt + 1,
                            max_retries + 1,
                            delay,
                            e
                        );
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                        last_error = Some(Error::Http(e));
                        continue;
                    }
                    return Err(Error::Http(e));
                }
            }
        }

        Err(last_error.unwrap_or(Error::MaxRetriesExceeded { max_retries }))
    }

    /// Calculate backoff delay for a given attempt
    fn calculate_backoff(&self, attempt: u32) -> Duration {
        let delay = match self.config.backoff_type {
            BackoffType::Constant => self.config.initial_backoff,
            BackoffType::Linear => self.config.initial_backoff * (attempt + 1),
            BackoffType::Exponential => {
                let factor = 2u32.saturating_pow(attempt);
                self.config.initial_backoff * factor
            }
        };

        std::cmp::min(delay, self.config.max_backoff)
    }
}

#[async_trait]
impl TrelloApi for TrelloClient {
    fn member_id(&self) -> &str {
        &self.member_id
    }

    async fn get_list(&self, endpoint: &str, params: &[(String, String)]) -> Result<Vec<Value>> {
        match self.get_json(endpoint, params).await? {
            Value::Array(records) => Ok(records),
            other => Err(Error::unexpected_response(
                endpoint,
                format!(
                    "expected a JSON array of records, got {}",
                    json_type_name(&other)
                ),
            )),
        }
    }
}

impl std::fmt::Debug for TrelloClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrelloClient")
            .field("config", &self.config)
            .field("member_id", &self.member_id)
            .finish_non_exhaustive()
    }
}

/// Check if an HTTP status is retryable
fn is_retryable_status(status: StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 500 | 502 | 503 | 504)
}

/// Extract retry-after header value
fn extract_retry_after(response: &Response) -> u64 {
    response
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse().ok())
        .unwrap_or(10)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
