//! Common types used throughout dirpager
//!
//! Collection items are kept as opaque JSON objects. Nothing in the crate
//! interprets device, user or group fields; that is left to callers.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type, used for every collection item
pub type JsonObject = serde_json::Map<String, JsonValue>;

/// Header mapping with string keys and values
pub type StringMap = HashMap<String, String>;

// ============================================================================
// Envelope Key Presets
// ============================================================================

/// Items key used by OData / Graph collection responses
pub const ODATA_ITEMS_KEY: &str = "value";

/// Continuation key used by OData / Graph collection responses
pub const ODATA_NEXT_LINK_KEY: &str = "@odata.nextLink";

// ============================================================================
// Dispatch Kind
// ============================================================================

/// How requests are dispatched, as written in a fetch profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchKind {
    /// Pre-authenticated client attaches credentials itself
    #[default]
    Client,
    /// Raw transport with an explicit credential header mapping
    Raw,
}

impl std::fmt::Display for DispatchKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DispatchKind::Client => write!(f, "client"),
            DispatchKind::Raw => write!(f, "raw"),
        }
    }
}
