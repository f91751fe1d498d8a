//! Fetch profiles
//!
//! A profile describes one collection endpoint: where it lives, how its
//! envelope is shaped, how requests are dispatched and which credentials to
//! use. Profiles are written in YAML (JSON works too, being valid YAML).
//!
//! ```yaml
//! name: intune-devices
//! url: https://graph.example.com/v1.0/deviceManagement/managedDevices
//! dispatch: client
//! timeout_secs: 60
//! auth:
//!   type: oauth2_client_credentials
//!   token_url: https://login.example.com/${TENANT_ID}/oauth2/v2.0/token
//!   client_id: ${CLIENT_ID}
//!   client_secret: ${CLIENT_SECRET}
//!   scopes: ["https://graph.example.com/.default"]
//! ```

use crate::auth::{AuthConfig, Authenticator};
use crate::error::{Error, Result};
use crate::http::{HttpClient, HttpClientConfig, RateLimiterConfig};
use crate::pagination::{DispatchMode, EnvelopeKeys, PagedCollectionFetcher};
use crate::template;
use crate::types::{DispatchKind, ODATA_ITEMS_KEY, ODATA_NEXT_LINK_KEY};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::info;

// ============================================================================
// Profile
// ============================================================================

/// One collection endpoint and how to reach it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchProfile {
    /// Human-readable profile name
    #[serde(default)]
    pub name: Option<String>,

    /// Initial endpoint URL (may contain `${VAR}` placeholders)
    pub url: String,

    /// Envelope key holding the item array
    #[serde(default = "default_items_key")]
    pub items_key: String,

    /// Envelope key holding the continuation reference
    #[serde(default = "default_continuation_key")]
    pub continuation_key: String,

    /// Request dispatch mode
    #[serde(default)]
    pub dispatch: DispatchKind,

    /// Per-request timeout in seconds
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Throttle (requests per second)
    #[serde(default)]
    pub rate_limit_rps: Option<u32>,

    /// User agent override
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Extra non-credential headers sent with every request
    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// Credentials
    #[serde(default)]
    pub auth: AuthDefinition,
}

fn default_items_key() -> String {
    ODATA_ITEMS_KEY.to_string()
}

fn default_continuation_key() -> String {
    ODATA_NEXT_LINK_KEY.to_string()
}

// ============================================================================
// Auth Definition
// ============================================================================

/// Credential definition as written in a profile
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuthDefinition {
    /// No credentials
    #[default]
    None,
    /// Static bearer token
    Bearer {
        /// Token value
        token: String,
    },
    /// API key header
    ApiKey {
        /// Header name (defaults to `Authorization`)
        #[serde(default)]
        header: Option<String>,
        /// Value prefix, e.g. `SSWS `
        #[serde(default)]
        prefix: Option<String>,
        /// Key value
        value: String,
    },
    /// HTTP Basic
    Basic {
        /// Username
        username: String,
        /// Password
        password: String,
    },
    /// OAuth2 client credentials
    #[serde(rename = "oauth2_client_credentials")]
    OAuth2ClientCredentials {
        /// Token URL
        token_url: String,
        /// Client ID
        client_id: String,
        /// Client secret
        client_secret: String,
        /// Scopes
        #[serde(default)]
        scopes: Vec<String>,
        /// Extra token request form fields
        #[serde(default)]
        token_body: HashMap<String, String>,
    },
    /// Arbitrary credential headers
    CustomHeaders {
        /// Header mapping
        headers: HashMap<String, String>,
    },
}

impl AuthDefinition {
    /// Resolve placeholders and produce the runtime auth config
    pub fn resolve(&self) -> Result<AuthConfig> {
        let r = template::render_env;
        Ok(match self {
            AuthDefinition::None => AuthConfig::None,
            AuthDefinition::Bearer { token } => AuthConfig::Bearer { token: r(token)? },
            AuthDefinition::ApiKey {
                header,
                prefix,
                value,
            } => AuthConfig::ApiKey {
                header_name: header.clone(),
                prefix: prefix.clone(),
                value: r(value)?,
            },
            AuthDefinition::Basic { username, password } => AuthConfig::Basic {
                username: r(username)?,
                password: r(password)?,
            },
            AuthDefinition::OAuth2ClientCredentials {
                token_url,
                client_id,
                client_secret,
                scopes,
                token_body,
            } => AuthConfig::Oauth2ClientCredentials {
                token_url: r(token_url)?,
                client_id: r(client_id)?,
                client_secret: r(client_secret)?,
                scopes: scopes.clone(),
                token_body: resolve_map(token_body)?,
            },
            AuthDefinition::CustomHeaders { headers } => AuthConfig::CustomHeaders {
                headers: resolve_map(headers)?,
            },
        })
    }

    /// Check if this definition carries no credentials
    pub fn is_none(&self) -> bool {
        matches!(self, AuthDefinition::None)
    }

    /// The values `resolve` runs through environment interpolation
    fn templated_values(&self) -> Vec<&str> {
        match self {
            AuthDefinition::None => Vec::new(),
            AuthDefinition::Bearer { token } => vec![token.as_str()],
            AuthDefinition::ApiKey { value, .. } => vec![value.as_str()],
            AuthDefinition::Basic { username, password } => {
                vec![username.as_str(), password.as_str()]
            }
            AuthDefinition::OAuth2ClientCredentials {
                token_url,
                client_id,
                client_secret,
                token_body,
                ..
            } => [token_url, client_id, client_secret]
                .into_iter()
                .chain(token_body.values())
                .map(String::as_str)
                .collect(),
            AuthDefinition::CustomHeaders { headers } => {
                headers.values().map(String::as_str).collect()
            }
        }
    }
}

fn resolve_map(map: &HashMap<String, String>) -> Result<HashMap<String, String>> {
    map.iter()
        .map(|(k, v)| Ok((k.clone(), template::render_env(v)?)))
        .collect()
}

// ============================================================================
// Loading
// ============================================================================

/// Load a profile from a YAML or JSON file
pub fn load_profile(path: impl AsRef<Path>) -> Result<FetchProfile> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::config(format!("Profile '{}' not found", path.display()))
        } else {
            Error::config(format!(
                "Failed to read profile '{}': {}",
                path.display(),
                e
            ))
        }
    })?;
    load_profile_from_str(&content)
}

/// Load a profile from a YAML or JSON string
pub fn load_profile_from_str(content: &str) -> Result<FetchProfile> {
    let profile: FetchProfile = serde_yaml::from_str(content)
        .map_err(|e| Error::config(format!("Failed to parse profile: {e}")))?;

    profile.validate()?;
    Ok(profile)
}

impl FetchProfile {
    /// Validate the profile without touching the network
    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(Error::missing_field("url"));
        }

        // URLs with placeholders are checked once resolved
        if !template::has_variables(&self.url) {
            url::Url::parse(&self.url)?;
        }

        self.envelope_keys().validate()?;

        if self.dispatch == DispatchKind::Raw && self.auth.is_none() {
            return Err(Error::config(
                "dispatch 'raw' requires credentials; set an auth definition",
            ));
        }

        Ok(())
    }

    /// Display name: the profile name, or the URL
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.url)
    }

    /// Initial URL with placeholders resolved
    pub fn resolved_url(&self) -> Result<String> {
        template::render_env(&self.url)
    }

    /// Envelope keys for this endpoint family
    pub fn envelope_keys(&self) -> EnvelopeKeys {
        EnvelopeKeys::new(&self.items_key, &self.continuation_key)
    }

    /// Per-request timeout
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Environment variables referenced by the profile that are not set
    pub fn unset_variables(&self) -> Vec<String> {
        let mut names: Vec<String> = std::iter::once(self.url.as_str())
            .chain(self.headers.values().map(String::as_str))
            .chain(self.auth.templated_values())
            .flat_map(template::extract_variables)
            .filter(|name| std::env::var_os(name).is_none())
            .collect();
        names.sort();
        names.dedup();
        names
    }

    /// HTTP client settings derived from the profile, header values resolved
    pub fn http_config(&self) -> Result<HttpClientConfig> {
        let mut builder = HttpClientConfig::builder();
        if let Some(rps) = self.rate_limit_rps {
            builder = builder.rate_limit(RateLimiterConfig::per_second(rps));
        }
        if let Some(agent) = &self.user_agent {
            builder = builder.user_agent(agent);
        }
        for (key, value) in resolve_map(&self.headers)? {
            builder = builder.header(key, value);
        }
        Ok(builder.build())
    }

    /// Authenticate once and build a ready fetcher
    ///
    /// `url_override` replaces the profile URL, e.g. to reuse one profile's
    /// credentials against a different collection. It is interpolated the
    /// same way.
    pub async fn build_fetcher(
        &self,
        url_override: Option<&str>,
    ) -> Result<PagedCollectionFetcher<HttpClient>> {
        let url = match url_override {
            Some(url) => template::render_env(url)?,
            None => self.resolved_url()?,
        };

        let mut client = HttpClient::with_config(self.http_config()?)?;
        let auth = Authenticator::with_client(self.auth.resolve()?, client.inner().clone())
            .authenticate()
            .await?;

        let dispatch = match self.dispatch {
            DispatchKind::Client => {
                client.set_auth(auth);
                DispatchMode::AuthenticatedClient
            }
            DispatchKind::Raw => DispatchMode::raw_from(&auth),
        };

        info!(
            profile = self.display_name(),
            dispatch = %self.dispatch,
            authenticated_client = client.is_authenticated(),
            throttled = client.has_rate_limiter(),
            "Prepared collection fetch"
        );

        let fetcher = PagedCollectionFetcher::new(client, url, dispatch, self.envelope_keys())?;
        Ok(match self.timeout() {
            Some(timeout) => fetcher.with_timeout(timeout),
            None => fetcher,
        })
    }
}
