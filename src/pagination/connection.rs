//! Memoized page connection
//!
//! `PageConnection::compute` is the only place a request is issued. The
//! first accessor spawns the fetch as its own task and stores a shared handle
//! to it; every accessor, concurrent or later, awaits that handle. Dropping an
//! accessor's future never cancels or restarts the fetch.

use super::types::{JobNode, PageInfo, PageOptions, PageResult, ResolveStatus};
use crate::cursor::{decode_jobs_cursor, encode_jobs_cursor, Cursor};
use crate::decode::{
    JsonPayloadDecoder, LinkHeaderExtractor, NextLocationExtractor, PayloadDecoder,
};
use crate::error::{Error, Result};
use crate::http::RequestExecutor;
use crate::types::StringMap;
use futures::future::{BoxFuture, FutureExt, Shared};
use std::num::NonZeroU32;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, warn};

type Outcome = std::result::Result<Arc<PageResult>, Error>;

/// Handle to the spawned fetch, cloned by every accessor
type SharedFetch = Shared<BoxFuture<'static, Outcome>>;

/// The collaborators a connection fetches through
#[derive(Clone)]
pub struct JobsBackend {
    executor: Arc<dyn RequestExecutor>,
    decoder: Arc<dyn PayloadDecoder>,
    next_location: Arc<dyn NextLocationExtractor>,
}

impl JobsBackend {
    /// Create a backend with JSON payloads and Link header continuation
    pub fn new(executor: Arc<dyn RequestExecutor>) -> Self {
        Self {
            executor,
            decoder: Arc::new(JsonPayloadDecoder),
            next_location: Arc::new(LinkHeaderExtractor::default()),
        }
    }

    /// Replace the payload decoder
    #[must_use]
    pub fn with_decoder(mut self, decoder: impl PayloadDecoder + 'static) -> Self {
        self.decoder = Arc::new(decoder);
        self
    }

    /// Replace the next location extractor
    #[must_use]
    pub fn with_next_location(mut self, extractor: impl NextLocationExtractor + 'static) -> Self {
        self.next_location = Arc::new(extractor);
        self
    }

    /// Replace the next location extractor with a shared one
    #[must_use]
    pub fn with_next_location_arc(mut self, extractor: Arc<dyn NextLocationExtractor>) -> Self {
        self.next_location = extractor;
        self
    }

    /// Start a page view from explicit options
    pub fn connection(&self, options: PageOptions) -> PageConnection {
        PageConnection::new(self.clone(), options)
    }

    /// Start a page view from caller arguments.
    ///
    /// `after` is a cursor from a previous page's `end_cursor`. It is decoded
    /// here, so a bad cursor fails before anything is fetched.
    pub fn new_connection(
        &self,
        status_filter: impl Into<String>,
        text_query: Option<String>,
        limit: Option<u32>,
        after: Option<&Cursor>,
    ) -> Result<PageConnection> {
        let mut options = PageOptions::new(status_filter);

        if let Some(query) = text_query {
            options = options.with_query(query);
        }

        if let Some(limit) = limit {
            let limit = NonZeroU32::new(limit)
                .ok_or_else(|| Error::invalid_argument("limit", "must be positive"))?;
            options = options.with_limit(limit);
        }

        if let Some(cursor) = after {
            options = options.with_continuation(decode_jobs_cursor(cursor)?);
        }

        Ok(self.connection(options))
    }
}

impl std::fmt::Debug for JobsBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobsBackend").finish_non_exhaustive()
    }
}

/// A single-use, lazily fetched view over one page of jobs
pub struct PageConnection {
    options: PageOptions,
    backend: JobsBackend,
    /// `None` until the first accessor starts the fetch
    fetch: Mutex<Option<SharedFetch>>,
}

impl PageConnection {
    /// Create an unresolved connection
    pub fn new(backend: JobsBackend, options: PageOptions) -> Self {
        Self {
            options,
            backend,
            fetch: Mutex::new(None),
        }
    }

    /// The options this connection was built from
    pub fn options(&self) -> &PageOptions {
        &self.options
    }

    /// Current lifecycle state
    pub fn status(&self) -> ResolveStatus {
        let fetch = self.fetch.lock().unwrap_or_else(PoisonError::into_inner);
        match fetch.as_ref().map(Shared::peek) {
            None => ResolveStatus::Unresolved,
            Some(None) => ResolveStatus::Resolving,
            Some(Some(Ok(_))) => ResolveStatus::Resolved,
            Some(Some(Err(_))) => ResolveStatus::Failed,
        }
    }

    /// The cached page, fetching it on first use
    pub async fn result(&self) -> Result<Arc<PageResult>> {
        self.compute().await
    }

    /// Jobs on this page, in service order
    pub async fn items(&self) -> Result<Vec<JobNode>> {
        let page = self.compute().await?;
        Ok(page.items.iter().cloned().map(JobNode::new).collect())
    }

    /// Total number of jobs matching the request
    pub async fn total_count(&self) -> Result<u64> {
        Ok(self.compute().await?.total_count)
    }

    /// Forward page information
    pub async fn page_info(&self) -> Result<PageInfo> {
        let page = self.compute().await?;
        Ok(match page.next_token() {
            Some(token) => PageInfo::next(&token),
            None => PageInfo::last(),
        })
    }

    /// Whether a further page exists
    pub async fn has_next_page(&self) -> Result<bool> {
        Ok(self.compute().await?.has_next_page())
    }

    /// Cursor for the following page, `None` on the last page
    pub async fn next_cursor(&self) -> Result<Option<Cursor>> {
        let page = self.compute().await?;
        Ok(page.next_token().map(|token| encode_jobs_cursor(&token)))
    }

    /// A fresh connection for the following page with the same query and
    /// limit, or `None` on the last page
    pub async fn next_page(&self) -> Result<Option<PageConnection>> {
        let page = self.compute().await?;
        Ok(page.next_token().map(|token| {
            let options = self.options.clone().with_continuation(token);
            self.backend.connection(options)
        }))
    }

    async fn compute(&self) -> Result<Arc<PageResult>> {
        let fetch = {
            let mut slot = self.fetch.lock().unwrap_or_else(PoisonError::into_inner);
            slot.get_or_insert_with(|| self.spawn_fetch()).clone()
        };
        fetch.await
    }

    /// Start the request on its own task so it outlives any single caller
    fn spawn_fetch(&self) -> SharedFetch {
        let backend = self.backend.clone();
        let target = self.options.request_target();
        let params = self.options.request_params();
        debug!(
            "Fetching jobs page: target={} first_page={} params={:?}",
            target,
            self.options.is_first_page(),
            params
        );

        let task = tokio::spawn(async move { fetch_page(&backend, &target, &params).await });
        async move {
            match task.await {
                Ok(outcome) => outcome.map(Arc::new),
                Err(e) => Err(Error::Other(format!("Jobs fetch task failed: {e}"))),
            }
        }
        .boxed()
        .shared()
    }
}

async fn fetch_page(backend: &JobsBackend, target: &str, params: &StringMap) -> Result<PageResult> {
    let response = backend
        .executor
        .execute(target, params)
        .await
        .inspect_err(|e| warn!("Jobs request to {} failed: {}", target, e))?;

    let payload = backend
        .decoder
        .decode(&response)
        .inspect_err(|e| warn!("Jobs payload from {} rejected: {}", target, e))?;

    let next_continuation = backend.next_location.extract(&response);
    debug!(
        "Fetched {} jobs (total {}), next={:?}",
        payload.jobs.len(),
        payload.total_count,
        next_continuation
    );

    Ok(PageResult {
        items: payload.jobs,
        total_count: payload.total_count,
        next_continuation,
    })
}

impl std::fmt::Debug for PageConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageConnection")
            .field("options", &self.options)
            .field("status", &self.status())
            .finish_non_exhaustive()
    }
}
