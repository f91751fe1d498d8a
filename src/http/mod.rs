//! HTTP transport module
//!
//! Provides the transport the collection fetcher talks to.
//!
//! # Features
//!
//! - **Transport trait**: the GET-and-parse-JSON seam the fetcher depends on
//! - **Authenticated client**: `HttpClient` optionally carries an `AuthContext`
//! - **Rate Limiting**: optional token bucket throttle using governor
//! - **Timeouts**: per-client default plus per-request override

mod client;
mod rate_limit;
mod transport;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder};
pub(crate) use client::header_map;
pub use rate_limit::{RateLimiter, RateLimiterConfig};
pub use transport::Transport;

#[cfg(test)]
mod tests;
