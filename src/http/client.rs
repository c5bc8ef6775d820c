//! HTTP client for the remote job-listing service
//!
//! Provides a reqwest-backed [`RequestExecutor`] that handles:
//! - Resolving relative targets against a base URL
//! - Passing absolute continuation locations through untouched
//! - Overriding embedded query parameters with request parameters
//! - Default headers and status classification

use super::executor::{PageResponse, RequestExecutor};
use crate::error::{Error, Result};
use crate::types::StringMap;
use async_trait::async_trait;
use reqwest::Client;
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;
use tracing::{debug, warn};
use url::{form_urlencoded, Url};

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Base URL for relative targets
    pub base_url: Option<String>,
    /// Request timeout
    pub timeout: Duration,
    /// Default headers for all requests
    pub default_headers: HashMap<String, String>,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: Duration::from_secs(30),
            default_headers: HashMap::new(),
            user_agent: format!("jobpager/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }
}

/// Builder for HTTP client config
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = Some(url.into());
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Add a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// HTTP client that executes page requests
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
}

impl HttpClient {
    /// Create a new HTTP client with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self { client, config })
    }

    /// Get the underlying reqwest client
    pub fn inner(&self) -> &Client {
        &self.client
    }

    /// Get the client configuration
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// Resolve `target` to a full URL and set `params` on it.
    ///
    /// Absolute targets are used as-is; relative ones are appended to the
    /// base URL. Query pairs already in the target survive unless `params`
    /// names the same key.
    pub fn build_url(&self, target: &str, params: &StringMap) -> Result<Url> {
        let mut url = if target.starts_with("http://") || target.starts_with("https://") {
            Url::parse(target)?
        } else {
            let base = self
                .config
                .base_url
                .as_deref()
                .ok_or_else(|| Error::config("No base URL configured for relative target"))?;
            let base = base.trim_end_matches('/');
            let path = target.trim_start_matches('/');
            Url::parse(&format!("{base}/{path}"))?
        };

        if params.is_empty() {
            return Ok(url);
        }

        // Existing segments stay byte for byte; only overridden keys go.
        let mut query: Vec<String> = url
            .query()
            .unwrap_or_default()
            .split('&')
            .filter(|segment| !segment.is_empty())
            .filter(|segment| {
                !matches!(
                    form_urlencoded::parse(segment.as_bytes()).next(),
                    Some((key, _)) if params.contains_key(key.as_ref())
                )
            })
            .map(str::to_string)
            .collect();

        // Sorted so the request line is deterministic.
        let overrides: BTreeMap<&String, &String> = params.iter().collect();
        query.push(
            form_urlencoded::Serializer::new(String::new())
                .extend_pairs(overrides)
                .finish(),
        );
        url.set_query(Some(&query.join("&")));

        Ok(url)
    }

    fn classify(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                timeout_ms: self.config.timeout.as_millis() as u64,
            }
        } else {
            Error::from(err)
        }
    }
}

#[async_trait]
impl RequestExecutor for HttpClient {
    async fn execute(&self, target: &str, params: &StringMap) -> Result<PageResponse> {
        let url = self.build_url(target, params)?;
        debug!("GET {}", url);

        let mut req = self.client.get(url.clone());
        for (key, value) in &self.config.default_headers {
            req = req.header(key.as_str(), value.as_str());
        }

        let response = req.send().await.map_err(|e| self.classify(e))?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Request to {} failed with {}", url, status.as_u16());
            return Err(Error::http_status(status.as_u16(), body));
        }

        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(|e| self.classify(e))?;
        debug!("Request succeeded: {} ({} bytes)", url, body.len());

        Ok(PageResponse {
            status: status.as_u16(),
            headers,
            body,
        })
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
