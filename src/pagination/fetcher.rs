//! Paged collection fetcher
//!
//! Turns a paginated endpoint into one lazy stream of items. The fetcher
//! issues the first GET, emits that page, and keeps following the
//! continuation reference until a response comes back without one.

use super::types::{DispatchMode, EnvelopeKeys, Page};
use crate::error::{Error, Result};
use crate::http::Transport;
use crate::types::JsonObject;
use futures::stream::{self, Stream, TryStreamExt};
use std::time::Duration;
use tracing::{debug, info};

/// Where a fetch currently stands
#[derive(Debug, Clone, PartialEq, Eq)]
enum FetchState {
    /// A URL still has to be requested
    Fetching {
        url: String,
        page: usize,
        items_so_far: usize,
    },
    /// The last response carried no continuation reference
    Done,
}

/// Retrieves every item behind a paginated endpoint
///
/// Items come out in page order, then in within-page order. Each call to
/// [`pages`](Self::pages) or [`items`](Self::items) starts a fresh request
/// sequence from the initial URL. Dropping the stream early simply stops
/// further requests.
#[derive(Debug)]
pub struct PagedCollectionFetcher<T> {
    transport: T,
    url: String,
    keys: EnvelopeKeys,
    dispatch: DispatchMode,
    timeout: Option<Duration>,
}

impl<T: Transport> PagedCollectionFetcher<T> {
    /// Create a fetcher for `url`
    ///
    /// Fails with a configuration error, before any request is made, when
    /// the URL is empty, the envelope keys are empty, or raw dispatch was
    /// chosen without a header mapping.
    pub fn new(
        transport: T,
        url: impl Into<String>,
        dispatch: DispatchMode,
        keys: EnvelopeKeys,
    ) -> Result<Self> {
        let url = url.into();
        if url.trim().is_empty() {
            return Err(Error::config("endpoint URL cannot be empty"));
        }
        url::Url::parse(&url)?;
        keys.validate()?;
        dispatch.request_headers()?;

        Ok(Self {
            transport,
            url,
            keys,
            dispatch,
            timeout: None,
        })
    }

    /// Set a timeout applied to every page request
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// The initial endpoint URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The envelope keys in use
    pub fn keys(&self) -> &EnvelopeKeys {
        &self.keys
    }

    /// The dispatch mode in use
    pub fn dispatch(&self) -> &DispatchMode {
        &self.dispatch
    }

    /// Fetch and parse a single page
    pub async fn fetch_page(&self, url: &str) -> Result<Page> {
        let headers = self.dispatch.request_headers()?;
        let body = self.transport.get_json(url, headers, self.timeout).await?;
        Page::from_body(body, &self.keys, url)
    }

    /// Lazy stream of whole pages
    ///
    /// After an error is yielded the stream ends.
    pub fn pages(&self) -> impl Stream<Item = Result<Page>> + '_ {
        let initial = FetchState::Fetching {
            url: self.url.clone(),
            page: 1,
            items_so_far: 0,
        };

        stream::try_unfold(initial, move |state| async move {
            let FetchState::Fetching {
                url,
                page,
                items_so_far,
            } = state
            else {
                return Ok::<_, Error>(None);
            };

            let fetched = self.fetch_page(&url).await?;
            let items_so_far = items_so_far + fetched.len();

            debug!(
                page,
                items = fetched.len(),
                has_next = fetched.has_next(),
                dispatch = self.dispatch.name(),
                "Fetched page from {url}"
            );

            let next = match &fetched.next_link {
                Some(link) => FetchState::Fetching {
                    url: link.clone(),
                    page: page + 1,
                    items_so_far,
                },
                None => {
                    info!(
                        pages = page,
                        items = items_so_far,
                        "Collection complete for {}",
                        self.url
                    );
                    FetchState::Done
                }
            };

            Ok(Some((fetched, next)))
        })
    }

    /// Lazy stream of individual items across all pages
    pub fn items(&self) -> impl Stream<Item = Result<JsonObject>> + '_ {
        self.pages()
            .map_ok(|page| stream::iter(page.items.into_iter().map(Ok::<JsonObject, Error>)))
            .try_flatten()
    }

    /// Drain every item into memory; the first error fails the call
    pub async fn collect_all(&self) -> Result<Vec<JsonObject>> {
        self.items().try_collect().await
    }

    /// Count items without keeping them
    pub async fn count(&self) -> Result<usize> {
        self.pages()
            .try_fold(0usize, |total, page| async move { Ok::<_, Error>(total + page.len()) })
            .await
    }
}
