// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # dirpager
//!
//! Paged collection retrieval for cloud directory and device-management
//! REST APIs.
//!
//! Administrative scripts over these APIs all share one motif: ask for a
//! collection (devices, group members, recovery keys), then keep following
//! the continuation link in each response until there is none. This crate
//! does that part, and leaves filtering, joins and exports to the caller.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use dirpager::auth::{AuthConfig, Authenticator};
//! use dirpager::http::{HttpClient, HttpClientConfig};
//! use dirpager::pagination::{DispatchMode, EnvelopeKeys, PagedCollectionFetcher};
//! use futures::TryStreamExt;
//!
//! #[tokio::main]
//! async fn main() -> dirpager::Result<()> {
//!     // Acquire credentials once
//!     let auth = Authenticator::new(AuthConfig::Bearer { token: "...".into() })
//!         .authenticate()
//!         .await?;
//!
//!     // Authenticated client: credentials travel with the client
//!     let client = HttpClient::with_auth(HttpClientConfig::default(), auth)?;
//!     let fetcher = PagedCollectionFetcher::new(
//!         client,
//!         "https://graph.example.com/v1.0/deviceManagement/managedDevices",
//!         DispatchMode::AuthenticatedClient,
//!         EnvelopeKeys::odata(),
//!     )?;
//!
//!     let mut items = std::pin::pin!(fetcher.items());
//!     while let Some(device) = items.try_next().await? {
//!         println!("{}", device["deviceName"]);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │              PagedCollectionFetcher                       │
//! │  FETCHING(url) ──GET──▶ Page{items, next} ──▶ DONE        │
//! └───────────────────────────────────────────────────────────┘
//!                               │
//! ┌──────────────┬──────────────┴────────┬────────────────────┐
//! │     Auth     │      Transport        │      Config        │
//! ├──────────────┼───────────────────────┼────────────────────┤
//! │ Bearer       │ HttpClient (reqwest)  │ YAML profiles      │
//! │ API Key      │ Authenticated / raw   │ ${ENV} secrets     │
//! │ Basic        │ Timeout               │                    │
//! │ OAuth2 CC    │ Rate limit (optional) │                    │
//! └──────────────┴───────────────────────┴────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Authentication implementations
pub mod auth;

/// HTTP transport
pub mod http;

/// Continuation-reference pagination
pub mod pagination;

/// Fetch profiles
pub mod config;

/// Environment interpolation
pub mod template;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use pagination::{DispatchMode, EnvelopeKeys, Page, PagedCollectionFetcher};
pub use types::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
