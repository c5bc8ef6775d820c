//! Decoder types and traits
//!
//! Defines the payload shape and the reader abstractions.

use crate::error::Result;
use crate::http::PageResponse;
use crate::types::Job;
use serde::{Deserialize, Deserializer, Serialize};

/// One page of jobs as sent by the remote service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobsPayload {
    /// Jobs on this page, in service order. Never absent.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub jobs: Vec<Job>,
    /// Total number of jobs matching the request
    #[serde(default)]
    pub total_count: u64,
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<Job>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Job>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Decodes a response body into a [`JobsPayload`]
pub trait PayloadDecoder: Send + Sync {
    /// Decode the payload, failing with a decode error on a malformed body
    fn decode(&self, response: &PageResponse) -> Result<JobsPayload>;
}

/// Finds the location of the following page in a response
pub trait NextLocationExtractor: Send + Sync {
    /// The next page location, or an empty string on the last page
    fn extract(&self, response: &PageResponse) -> String;
}
