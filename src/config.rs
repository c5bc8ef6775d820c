//! Configuration for the remote job-listing service
//!
//! Loaded from YAML:
//!
//! ```yaml
//! base_url: https://lsif.example.com
//! timeout_secs: 10
//! headers:
//!   Authorization: token abc123
//! next_link:
//!   type: link_header
//!   rel: next
//! default_limit: 50
//! ```

use crate::decode::{BodyFieldExtractor, LinkHeaderExtractor, NextLocationExtractor};
use crate::error::{Error, Result};
use crate::http::{HttpClient, HttpClientConfig};
use crate::pagination::JobsBackend;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

// ============================================================================
// Service Config
// ============================================================================

/// Connection settings for the job-listing service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Root URL of the service
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User agent override
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Headers sent with every request
    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// Where the next page location is found
    #[serde(default)]
    pub next_link: NextLinkSource,

    /// Page size used when the caller gives none
    #[serde(default)]
    pub default_limit: Option<u32>,
}

fn default_timeout_secs() -> u64 {
    30
}

/// Where a response carries the location of the following page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NextLinkSource {
    /// RFC 5988 Link header
    LinkHeader {
        #[serde(default = "default_rel")]
        rel: String,
    },
    /// A field of the JSON body
    BodyField { path: String },
}

fn default_rel() -> String {
    "next".to_string()
}

impl Default for NextLinkSource {
    fn default() -> Self {
        Self::LinkHeader { rel: default_rel() }
    }
}

impl ServiceConfig {
    /// Config with defaults for everything but the base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: default_timeout_secs(),
            user_agent: None,
            headers: HashMap::new(),
            next_link: NextLinkSource::default(),
            default_limit: None,
        }
    }

    /// Load and validate a config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Parse and validate a YAML document
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the config for values that cannot work
    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(Error::invalid_argument("base_url", "must not be empty"));
        }
        Url::parse(&self.base_url)
            .map_err(|e| Error::invalid_argument("base_url", e.to_string()))?;

        if self.timeout_secs == 0 {
            return Err(Error::invalid_argument("timeout_secs", "must be positive"));
        }
        if self.default_limit == Some(0) {
            return Err(Error::invalid_argument("default_limit", "must be positive"));
        }
        if let NextLinkSource::BodyField { path } = &self.next_link {
            if path.trim().is_empty() {
                return Err(Error::invalid_argument("next_link.path", "must not be empty"));
            }
        }
        Ok(())
    }

    /// HTTP client settings derived from this config
    pub fn http_client_config(&self) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder()
            .base_url(&self.base_url)
            .timeout(Duration::from_secs(self.timeout_secs));
        if let Some(agent) = &self.user_agent {
            builder = builder.user_agent(agent);
        }
        for (key, value) in &self.headers {
            builder = builder.header(key, value);
        }
        builder.build()
    }

    /// The next location reader for this config
    pub fn next_location_extractor(&self) -> Arc<dyn NextLocationExtractor> {
        match &self.next_link {
            NextLinkSource::LinkHeader { rel } => Arc::new(LinkHeaderExtractor::new(rel)),
            NextLinkSource::BodyField { path } => Arc::new(BodyFieldExtractor::new(path)),
        }
    }

    /// Build an HTTP-backed [`JobsBackend`]
    pub fn backend(&self) -> Result<JobsBackend> {
        self.validate()?;
        let client = HttpClient::with_config(self.http_client_config())?;
        Ok(JobsBackend::new(Arc::new(client))
            .with_next_location_arc(self.next_location_extractor()))
    }
}
