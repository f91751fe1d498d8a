//! Error types for dirpager
//!
//! Every fallible operation in the crate returns `Result<T, Error>`.
//! Fetch failures carry the URL that was being requested so callers can
//! report which page (or which profile) went wrong.

use thiserror::Error;

/// The main error type for dirpager
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Authentication Errors
    // ============================================================================
    #[error("Authentication failed: {message}")]
    Auth { message: String },

    // ============================================================================
    // Fetch Errors
    // ============================================================================
    #[error("Request to {url} failed: {message}")]
    Request {
        url: String,
        status: Option<u16>,
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    #[error("Malformed response from {url}: {message}")]
    MalformedResponse { url: String, message: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create an auth error
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    /// Create a request error for a non-success HTTP status
    pub fn http_status(url: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        let message = if body.is_empty() {
            format!("HTTP {status}")
        } else {
            format!("HTTP {status}: {body}")
        };
        Self::Request {
            url: url.into(),
            status: Some(status),
            message,
            source: None,
        }
    }

    /// Create a request error from a transport failure
    pub fn transport(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Request {
            url: url.into(),
            status: source.status().map(|s| s.as_u16()),
            message: source.to_string(),
            source: Some(source),
        }
    }

    /// Create a malformed response error
    pub fn malformed(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            url: url.into(),
            message: message.into(),
        }
    }

    /// The URL of the request that failed, if this error came from a fetch
    pub fn url(&self) -> Option<&str> {
        match self {
            Error::Request { url, .. } | Error::MalformedResponse { url, .. } => Some(url),
            _ => None,
        }
    }

    /// HTTP status code of a failed request, if the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Request { status, .. } => *status,
            _ => None,
        }
    }

    /// Check if this is a configuration error
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            Error::Configuration { .. } | Error::MissingConfigField { .. }
        )
    }
}

/// Result type alias for dirpager
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::config("headers required");
        assert_eq!(err.to_string(), "Configuration error: headers required");

        let err = Error::missing_field("url");
        assert_eq!(err.to_string(), "Missing required config field: url");

        let err = Error::http_status("https://graph.example.com/devices", 404, "Not found");
        assert_eq!(
            err.to_string(),
            "Request to https://graph.example.com/devices failed: HTTP 404: Not found"
        );

        let err = Error::malformed("https://graph.example.com/devices", "missing 'value'");
        assert_eq!(
            err.to_string(),
            "Malformed response from https://graph.example.com/devices: missing 'value'"
        );
    }

    #[test]
    fn test_http_status_without_body() {
        let err = Error::http_status("https://x.test/a", 503, "");
        assert_eq!(err.to_string(), "Request to https://x.test/a failed: HTTP 503");
        assert_eq!(err.status(), Some(503));
    }

    #[test]
    fn test_error_url() {
        let err = Error::http_status("https://x.test/page2", 500, "");
        assert_eq!(err.url(), Some("https://x.test/page2"));

        let err = Error::malformed("https://x.test/page3", "not json");
        assert_eq!(err.url(), Some("https://x.test/page3"));
        assert_eq!(err.status(), None);

        assert_eq!(Error::config("nope").url(), None);
    }

    #[test]
    fn test_is_config() {
        assert!(Error::config("x").is_config());
        assert!(Error::missing_field("x").is_config());
        assert!(!Error::auth("x").is_config());
        assert!(!Error::malformed("u", "m").is_config());
    }
}
