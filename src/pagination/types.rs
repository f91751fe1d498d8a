//! Pagination types
//!
//! Envelope keys, parsed pages and dispatch modes shared by the fetcher.

use crate::auth::AuthContext;
use crate::error::{Error, Result};
use crate::types::{JsonObject, JsonValue, StringMap, ODATA_ITEMS_KEY, ODATA_NEXT_LINK_KEY};

/// Names of the two envelope fields the fetcher reads
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvelopeKeys {
    /// Key holding the page's item array
    pub items_key: String,
    /// Key holding the continuation reference
    pub continuation_key: String,
}

impl EnvelopeKeys {
    /// Create envelope keys for an endpoint family
    pub fn new(items_key: impl Into<String>, continuation_key: impl Into<String>) -> Self {
        Self {
            items_key: items_key.into(),
            continuation_key: continuation_key.into(),
        }
    }

    /// OData / Graph style: `value` + `@odata.nextLink`
    pub fn odata() -> Self {
        Self::new(ODATA_ITEMS_KEY, ODATA_NEXT_LINK_KEY)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.items_key.is_empty() {
            return Err(Error::config("items key cannot be empty"));
        }
        if self.continuation_key.is_empty() {
            return Err(Error::config("continuation key cannot be empty"));
        }
        Ok(())
    }
}

/// One parsed collection response envelope
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Page {
    /// Items in server-returned order
    pub items: Vec<JsonObject>,
    /// Continuation reference, used verbatim for the next request
    pub next_link: Option<String>,
}

impl Page {
    /// Parse a response body fetched from `url`
    ///
    /// The items key must be present and hold an array of objects. A
    /// continuation value that is missing, `null` or an empty string means
    /// the collection ends here.
    pub fn from_body(body: JsonValue, keys: &EnvelopeKeys, url: &str) -> Result<Self> {
        let JsonValue::Object(mut envelope) = body else {
            return Err(Error::malformed(url, "response body is not a JSON object"));
        };

        let items = match envelope.remove(&keys.items_key) {
            Some(JsonValue::Array(values)) => values
                .into_iter()
                .enumerate()
                .map(|(idx, value)| match value {
                    JsonValue::Object(item) => Ok(item),
                    other => Err(Error::malformed(
                        url,
                        format!(
                            "item {idx} under '{}' is not an object: {other}",
                            keys.items_key
                        ),
                    )),
                })
                .collect::<Result<Vec<_>>>()?,
            Some(other) => {
                return Err(Error::malformed(
                    url,
                    format!("'{}' is not an array: {other}", keys.items_key),
                ))
            }
            None => {
                return Err(Error::malformed(
                    url,
                    format!("missing items key '{}'", keys.items_key),
                ))
            }
        };

        let next_link = match envelope.remove(&keys.continuation_key) {
            None | Some(JsonValue::Null) => None,
            Some(JsonValue::String(link)) if link.is_empty() => None,
            Some(JsonValue::String(link)) => Some(link),
            Some(other) => {
                return Err(Error::malformed(
                    url,
                    format!("'{}' is not a string: {other}", keys.continuation_key),
                ))
            }
        };

        Ok(Self { items, next_link })
    }

    /// Number of items on this page
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the page carried no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Check if another page follows
    pub fn has_next(&self) -> bool {
        self.next_link.is_some()
    }
}

/// How each page request is dispatched
#[derive(Clone)]
pub enum DispatchMode {
    /// The transport is pre-authenticated and attaches credentials itself
    AuthenticatedClient,
    /// Plain transport; the header mapping is attached to every request
    RawTransport {
        /// Credential headers; required in this mode
        headers: Option<StringMap>,
    },
}

impl DispatchMode {
    /// Raw dispatch with the given credential headers
    pub fn raw(headers: StringMap) -> Self {
        Self::RawTransport {
            headers: Some(headers),
        }
    }

    /// Raw dispatch using the headers of a resolved auth context
    pub fn raw_from(auth: &AuthContext) -> Self {
        Self::raw(auth.to_headers())
    }

    /// Headers to pass to the transport for each request
    pub fn request_headers(&self) -> Result<Option<&StringMap>> {
        match self {
            DispatchMode::AuthenticatedClient => Ok(None),
            DispatchMode::RawTransport { headers: Some(h) } => Ok(Some(h)),
            DispatchMode::RawTransport { headers: None } => Err(Error::config(
                "raw transport dispatch requires a header mapping carrying the authorization credential",
            )),
        }
    }

    /// Short name, safe to log
    pub fn name(&self) -> &'static str {
        match self {
            DispatchMode::AuthenticatedClient => "client",
            DispatchMode::RawTransport { .. } => "raw",
        }
    }
}

impl std::fmt::Debug for DispatchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DispatchMode::AuthenticatedClient => f.write_str("AuthenticatedClient"),
            DispatchMode::RawTransport { headers } => {
                let names = headers.as_ref().map(|h| {
                    let mut names: Vec<&str> = h.keys().map(String::as_str).collect();
                    names.sort_unstable();
                    names
                });
                f.debug_struct("RawTransport")
                    .field("headers", &names)
                    .finish()
            }
        }
    }
}
