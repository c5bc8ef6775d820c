//! Request execution seam
//!
//! The pagination core never talks to the network directly; it hands a
//! target and a parameter map to a [`RequestExecutor`] and receives a
//! [`PageResponse`] back.

use crate::error::Result;
use crate::types::StringMap;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::HeaderMap;

/// A raw response from the remote service
#[derive(Debug, Clone, Default)]
pub struct PageResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: HeaderMap,
    /// Response body
    pub body: Bytes,
}

impl PageResponse {
    /// Create a successful response with the given body
    pub fn new(body: impl Into<Bytes>) -> Self {
        Self {
            status: 200,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// Create a response from a JSON value
    pub fn json(value: &serde_json::Value) -> Self {
        Self::new(value.to_string())
    }

    /// Attach headers
    #[must_use]
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Get a header value as a string
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// Executes one request against the remote service.
///
/// Implementations own transport concerns: base URL resolution, headers,
/// timeouts, tracing. `params` are query parameters that must be set on the
/// request, replacing any parameter of the same name already in `target`.
#[async_trait]
pub trait RequestExecutor: Send + Sync {
    /// Execute a GET request for `target` with `params`
    async fn execute(&self, target: &str, params: &StringMap) -> Result<PageResponse>;
}
