//! Pagination types
//!
//! Request options and the cached page result.

use crate::cursor::{encode_jobs_cursor, ContinuationToken, Cursor};
use crate::types::{Job, StringMap};
use serde::Serialize;
use std::num::NonZeroU32;

/// Query parameter carrying the free-text filter
pub const QUERY_PARAM: &str = "query";

/// Query parameter carrying the page size
pub const LIMIT_PARAM: &str = "limit";

/// Immutable filter and paging options for one page request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageOptions {
    status_filter: String,
    text_query: Option<String>,
    limit: Option<NonZeroU32>,
    continuation: Option<ContinuationToken>,
}

impl PageOptions {
    /// Options for the first page of jobs with the given status
    pub fn new(status_filter: impl Into<String>) -> Self {
        Self {
            status_filter: status_filter.into(),
            text_query: None,
            limit: None,
            continuation: None,
        }
    }

    /// Filter jobs by free text
    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.text_query = Some(query.into());
        self
    }

    /// Set the page size
    #[must_use]
    pub fn with_limit(mut self, limit: NonZeroU32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Continue from a location returned by a previous page
    #[must_use]
    pub fn with_continuation(mut self, token: ContinuationToken) -> Self {
        self.continuation = Some(token);
        self
    }

    pub fn status_filter(&self) -> &str {
        &self.status_filter
    }

    pub fn text_query(&self) -> Option<&str> {
        self.text_query.as_deref()
    }

    pub fn limit(&self) -> Option<NonZeroU32> {
        self.limit
    }

    pub fn continuation(&self) -> Option<&ContinuationToken> {
        self.continuation.as_ref()
    }

    /// Whether these options ask for the first page
    pub fn is_first_page(&self) -> bool {
        self.continuation.is_none()
    }

    /// The request target.
    ///
    /// A continuation already encodes the service's filter state and is used
    /// verbatim; otherwise the target is `/jobs/{status}` in lowercase.
    pub fn request_target(&self) -> String {
        match &self.continuation {
            Some(token) => token.as_str().to_string(),
            None => format!("/jobs/{}", self.status_filter.to_lowercase()),
        }
    }

    /// Query parameters for the request.
    ///
    /// `query` and `limit` are applied on continuation requests too, so the
    /// page size may change between pages.
    pub fn request_params(&self) -> StringMap {
        let mut params = StringMap::new();
        if let Some(query) = &self.text_query {
            params.insert(QUERY_PARAM.to_string(), query.clone());
        }
        if let Some(limit) = self.limit {
            params.insert(LIMIT_PARAM.to_string(), limit.to_string());
        }
        params
    }
}

/// The single cached outcome of a successful page fetch
#[derive(Debug, Clone, PartialEq)]
pub struct PageResult {
    /// Jobs in service order
    pub items: Vec<Job>,
    /// Total number of matching jobs
    pub total_count: u64,
    /// Location of the next page; empty on the last page
    pub next_continuation: String,
}

impl PageResult {
    /// Whether a further page exists
    pub fn has_next_page(&self) -> bool {
        !self.next_continuation.is_empty()
    }

    /// The next page location, if any
    pub fn next_token(&self) -> Option<ContinuationToken> {
        self.has_next_page()
            .then(|| ContinuationToken::new(self.next_continuation.clone()))
    }
}

/// Forward page information
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub has_next_page: bool,
    pub end_cursor: Option<Cursor>,
}

impl PageInfo {
    /// Page info pointing at a following page
    pub fn next(token: &ContinuationToken) -> Self {
        Self {
            has_next_page: true,
            end_cursor: Some(encode_jobs_cursor(token)),
        }
    }

    /// Page info for the last page
    pub fn last() -> Self {
        Self {
            has_next_page: false,
            end_cursor: None,
        }
    }
}

/// A job wrapped for the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct JobNode {
    job: Job,
}

impl JobNode {
    pub fn new(job: Job) -> Self {
        Self { job }
    }

    pub fn job(&self) -> &Job {
        &self.job
    }

    pub fn id(&self) -> Option<&serde_json::Value> {
        self.job.id()
    }

    pub fn into_job(self) -> Job {
        self.job
    }
}

/// Observable lifecycle of a [`PageConnection`](super::PageConnection)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveStatus {
    /// No accessor has been called yet
    Unresolved,
    /// The fetch is in flight
    Resolving,
    /// The fetch succeeded and its result is cached
    Resolved,
    /// The fetch failed and its error is cached
    Failed,
}

impl ResolveStatus {
    /// Whether the connection reached a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Resolved | Self::Failed)
    }
}
