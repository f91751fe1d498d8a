//! Authenticator implementation
//!
//! Resolves an `AuthConfig` into an `AuthContext`. Token acquisition happens
//! here, once, before any collection is fetched.

use super::context::AuthContext;
use super::types::{AccessToken, AuthConfig};
use crate::error::{Error, Result};
use crate::types::StringMap;
use base64::Engine as _;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, info};

/// Authenticator turns credentials into a ready-to-use `AuthContext`
pub struct Authenticator {
    /// Auth configuration
    config: AuthConfig,
    /// HTTP client for token requests
    http_client: Client,
}

impl Authenticator {
    /// Create a new authenticator with the given config
    pub fn new(config: AuthConfig) -> Self {
        Self {
            config,
            http_client: Client::new(),
        }
    }

    /// Create an authenticator with a custom HTTP client
    pub fn with_client(config: AuthConfig, http_client: Client) -> Self {
        Self {
            config,
            http_client,
        }
    }

    /// Acquire credentials and build the context
    pub async fn authenticate(&self) -> Result<AuthContext> {
        debug!(kind = self.config.kind(), "Resolving credentials");

        match &self.config {
            AuthConfig::None => Ok(AuthContext::anonymous()),

            AuthConfig::Bearer { token } => {
                if token.is_empty() {
                    return Err(Error::auth("Bearer token is empty"));
                }
                Ok(AuthContext::bearer(token))
            }

            AuthConfig::ApiKey {
                header_name,
                prefix,
                value,
            } => {
                let header = header_name.as_deref().unwrap_or("Authorization");
                let val = format!("{}{}", prefix.as_deref().unwrap_or(""), value);
                let mut headers = StringMap::new();
                headers.insert(header.to_string(), val);
                Ok(AuthContext::from_headers(headers))
            }

            AuthConfig::Basic { username, password } => {
                let encoded = base64::engine::general_purpose::STANDARD
                    .encode(format!("{username}:{password}"));
                let mut headers = StringMap::new();
                headers.insert("Authorization".to_string(), format!("Basic {encoded}"));
                Ok(AuthContext::from_headers(headers))
            }

            AuthConfig::Oauth2ClientCredentials {
                token_url,
                client_id,
                client_secret,
                scopes,
                token_body,
            } => {
                let token = self
                    .fetch_client_credentials(
                        token_url,
                        client_id,
                        client_secret,
                        scopes,
                        token_body,
                    )
                    .await?;
                info!(
                    expires_at = ?token.expires_at,
                    "Acquired access token via client credentials"
                );
                Ok(AuthContext::bearer(&token.token).with_expiry(token.expires_at))
            }

            AuthConfig::CustomHeaders { headers } => {
                Ok(AuthContext::from_headers(headers.clone()))
            }
        }
    }

    /// Fetch an OAuth2 token using the client credentials flow
    async fn fetch_client_credentials(
        &self,
        token_url: &str,
        client_id: &str,
        client_secret: &str,
        scopes: &[String],
        extra_body: &HashMap<String, String>,
    ) -> Result<AccessToken> {
        let mut form = vec![
            ("grant_type", "client_credentials".to_string()),
            ("client_id", client_id.to_string()),
            ("client_secret", client_secret.to_string()),
        ];

        if !scopes.is_empty() {
            form.push(("scope", scopes.join(" ")));
        }

        for (key, value) in extra_body {
            form.push((key.as_str(), value.clone()));
        }

        let response = self
            .http_client
            .post(token_url)
            .form(&form)
            .send()
            .await
            .map_err(|e| Error::auth(format!("Token request to {token_url} failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::auth(format!(
                "Token request failed with status {status}: {body}"
            )));
        }

        let token_response: TokenResponse = response
            .json()
            .await
            .map_err(|e| Error::auth(format!("Invalid token response: {e}")))?;
        Ok(token_response.into_access_token())
    }

    /// Get the current auth config
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }
}

/// OAuth2 token response
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

impl TokenResponse {
    fn into_access_token(self) -> AccessToken {
        match self.expires_in {
            Some(secs) => AccessToken::expires_in(self.access_token, secs),
            None => AccessToken::new(self.access_token, None),
        }
    }
}
