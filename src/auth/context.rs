//! Resolved authentication context
//!
//! An `AuthContext` is produced once by the `Authenticator` and then only
//! read. The authenticated client applies it to every request; raw dispatch
//! takes its header mapping directly.

use crate::error::Result;
use crate::http::header_map;
use crate::types::StringMap;
use chrono::{DateTime, Utc};
use reqwest::RequestBuilder;

/// Immutable credential handle shared across all pages of a fetch
#[derive(Clone, Default)]
pub struct AuthContext {
    headers: StringMap,
    expires_at: Option<DateTime<Utc>>,
}

impl AuthContext {
    /// Context that attaches nothing
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Build a context from a ready header mapping
    pub fn from_headers(headers: StringMap) -> Self {
        Self {
            headers,
            expires_at: None,
        }
    }

    /// Context carrying a single `Authorization: Bearer <token>` header
    pub fn bearer(token: impl AsRef<str>) -> Self {
        let mut headers = StringMap::new();
        headers.insert(
            "Authorization".to_string(),
            format!("Bearer {}", token.as_ref()),
        );
        Self::from_headers(headers)
    }

    /// Record when the underlying credential stops being valid
    #[must_use]
    pub fn with_expiry(mut self, expires_at: Option<DateTime<Utc>>) -> Self {
        self.expires_at = expires_at;
        self
    }

    /// Header mapping for raw dispatch
    pub fn headers(&self) -> &StringMap {
        &self.headers
    }

    /// Owned copy of the header mapping
    pub fn to_headers(&self) -> StringMap {
        self.headers.clone()
    }

    /// The `Authorization` header value, looked up case-insensitively
    pub fn authorization(&self) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case("authorization"))
            .map(|(_, v)| v.as_str())
    }

    /// Check if this context attaches any credential
    pub fn is_anonymous(&self) -> bool {
        self.headers.is_empty()
    }

    /// When the credential expires, if known
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// Check if the credential is known to be expired (30 second buffer)
    pub fn is_expired(&self) -> bool {
        self.expires_at
            .is_some_and(|at| Utc::now() + chrono::Duration::seconds(30) >= at)
    }

    /// Attach the credential headers to a request, replacing any
    /// same-named header already set on it
    pub fn apply(&self, req: RequestBuilder) -> Result<RequestBuilder> {
        Ok(req.headers(header_map(&self.headers)?))
    }
}

impl std::fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&str> = self.headers.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("AuthContext")
            .field("headers", &names)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}
