//! HTTP client for collection pages
//!
//! A thin reqwest wrapper that:
//! - Optionally carries an `AuthContext` (the "authenticated client")
//! - Optionally throttles request issuance
//! - Classifies failures into request / malformed-response errors
//!
//! Each call issues exactly one request. There is no retry.

use super::rate_limit::{RateLimiter, RateLimiterConfig};
use super::transport::Transport;
use crate::auth::AuthContext;
use crate::error::{Error, Result};
use crate::types::{JsonValue, StringMap};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Default per-request timeout (none unless the caller sets one)
    pub timeout: Option<Duration>,
    /// Rate limiter configuration (off unless the caller sets one)
    pub rate_limit: Option<RateLimiterConfig>,
    /// Default headers for all requests
    pub default_headers: StringMap,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: None,
            rate_limit: None,
            default_headers: StringMap::new(),
            user_agent: format!("dirpager/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }
}

/// Builder for HTTP client config
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Set the default request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    /// Set rate limiter
    pub fn rate_limit(mut self, config: RateLimiterConfig) -> Self {
        self.config.rate_limit = Some(config);
        self
    }

    /// Add a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// HTTP client issuing single GET requests for collection pages
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
    auth: Option<AuthContext>,
    rate_limiter: Option<RateLimiter>,
}

impl HttpClient {
    /// Create a new HTTP client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(HttpClientConfig::default())
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {e}")))?;

        let rate_limiter = config.rate_limit.as_ref().map(RateLimiter::new);

        Ok(Self {
            client,
            config,
            auth: None,
            rate_limiter,
        })
    }

    /// Create an authenticated client that attaches `auth` to every request
    pub fn with_auth(config: HttpClientConfig, auth: AuthContext) -> Result<Self> {
        let mut client = Self::with_config(config)?;
        client.auth = Some(auth);
        Ok(client)
    }

    /// Set the authentication context
    pub fn set_auth(&mut self, auth: AuthContext) {
        self.auth = Some(auth);
    }

    /// Check if this client attaches credentials itself
    pub fn is_authenticated(&self) -> bool {
        self.auth.as_ref().is_some_and(|a| !a.is_anonymous())
    }

    /// Get the underlying reqwest client
    pub fn inner(&self) -> &Client {
        &self.client
    }

    /// Check if rate limiting is enabled
    pub fn has_rate_limiter(&self) -> bool {
        self.rate_limiter.is_some()
    }
}

#[async_trait]
impl Transport for HttpClient {
    async fn get_json(
        &self,
        url: &str,
        headers: Option<&StringMap>,
        timeout: Option<Duration>,
    ) -> Result<JsonValue> {
        if let Some(ref limiter) = self.rate_limiter {
            if !limiter.try_acquire() {
                debug!("Throttling request to {}", url);
                limiter.wait().await;
            }
        }

        // Later layers replace same-named headers from earlier ones
        let mut req = self
            .client
            .get(url)
            .headers(header_map(&self.config.default_headers)?);

        if let Some(ref auth) = self.auth {
            if auth.is_expired() {
                warn!("Credential for {} is past its expiry", url);
            }
            req = auth.apply(req)?;
        }

        if let Some(headers) = headers {
            req = req.headers(header_map(headers)?);
        }

        if let Some(timeout) = timeout.or(self.config.timeout) {
            req = req.timeout(timeout);
        }

        let response = req
            .send()
            .await
            .map_err(|e| Error::transport(url, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::http_status(url, status.as_u16(), body));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::transport(url, e))?;

        debug!("GET {} -> {} ({} bytes)", url, status.as_u16(), body.len());

        serde_json::from_str(&body)
            .map_err(|e| Error::malformed(url, format!("body is not valid JSON: {e}")))
    }
}

/// Convert a header mapping into a typed `HeaderMap`
///
/// Names differing only in case collapse into one entry.
pub(crate) fn header_map(headers: &StringMap) -> Result<HeaderMap> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (key, value) in headers {
        let name = HeaderName::from_bytes(key.as_bytes())
            .map_err(|e| Error::config(format!("Invalid header name '{key}': {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| Error::config(format!("Invalid value for header '{key}': {e}")))?;
        map.insert(name, value);
    }
    Ok(map)
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .field("auth", &self.auth)
            .field("has_rate_limiter", &self.has_rate_limiter())
            .finish_non_exhaustive()
    }
}
