//! Transport seam used by the collection fetcher

use crate::error::Result;
use crate::types::{JsonValue, StringMap};
use async_trait::async_trait;
use std::time::Duration;

/// A GET-capable transport returning parsed JSON bodies
///
/// `url` is always absolute when it comes from a continuation reference and
/// must be requested verbatim. `headers` are attached as given; `None` means
/// the transport relies on whatever credentials it carries itself.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue one GET and parse the body as JSON
    async fn get_json(
        &self,
        url: &str,
        headers: Option<&StringMap>,
        timeout: Option<Duration>,
    ) -> Result<JsonValue>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for &T {
    async fn get_json(
        &self,
        url: &str,
        headers: Option<&StringMap>,
        timeout: Option<Duration>,
    ) -> Result<JsonValue> {
        (**self).get_json(url, headers, timeout).await
    }
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn get_json(
        &self,
        url: &str,
        headers: Option<&StringMap>,
        timeout: Option<Duration>,
    ) -> Result<JsonValue> {
        (**self).get_json(url, headers, timeout).await
    }
}
