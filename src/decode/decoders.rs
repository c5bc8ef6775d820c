//! Decoder implementations

use super::types::{JobsPayload, NextLocationExtractor, PayloadDecoder};
use crate::error::{Error, Result};
use crate::http::PageResponse;
use serde_json::Value;

// ============================================================================
// JSON Payload
// ============================================================================

/// Decodes `{ "jobs": [...], "totalCount": n }` bodies
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonPayloadDecoder;

impl PayloadDecoder for JsonPayloadDecoder {
    fn decode(&self, response: &PageResponse) -> Result<JobsPayload> {
        serde_json::from_slice(&response.body).map_err(|e| Error::decode(e.to_string()))
    }
}

// ============================================================================
// Link Header
// ============================================================================

/// Reads the next location from the Link header (RFC 5988)
///
/// Format: `Link: </jobs/queued?after=2>; rel="next", ...`
#[derive(Debug, Clone)]
pub struct LinkHeaderExtractor {
    /// Rel value to follow (default: "next")
    pub rel: String,
}

impl Default for LinkHeaderExtractor {
    fn default() -> Self {
        Self {
            rel: "next".to_string(),
        }
    }
}

impl LinkHeaderExtractor {
    /// Create a new link header extractor
    pub fn new(rel: impl Into<String>) -> Self {
        Self { rel: rel.into() }
    }
}

impl NextLocationExtractor for LinkHeaderExtractor {
    fn extract(&self, response: &PageResponse) -> String {
        response
            .headers
            .get_all("link")
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find_map(|header| parse_link_header(header, &self.rel))
            .unwrap_or_default()
    }
}

/// Parse a Link header and extract the URL for the given rel.
///
/// The `<...>` reference is located before any splitting, so commas inside
/// a URL do not break the link apart.
pub(crate) fn parse_link_header(header: &str, target_rel: &str) -> Option<String> {
    let mut rest = header;

    while let Some(open) = rest.find('<') {
        let after_open = &rest[open + 1..];
        let close = after_open.find('>')?;
        let url = &after_open[..close];

        let (params, remainder) = split_link_params(&after_open[close + 1..]);
        rest = remainder;

        let rels = params.split(';').find_map(|param| {
            let (name, value) = param.split_once('=')?;
            name.trim()
                .eq_ignore_ascii_case("rel")
                .then(|| value.trim().trim_matches('"').trim_matches('\''))
        });

        // rel may hold several space-separated values, e.g. rel="next last"
        if rels.is_some_and(|r| r.split_whitespace().any(|r| r.eq_ignore_ascii_case(target_rel))) {
            return Some(url.to_string());
        }
    }

    None
}

/// Split a link's parameters from the links that follow it at the first
/// comma outside a quoted string
fn split_link_params(s: &str) -> (&str, &str) {
    let mut quoted = false;
    for (i, c) in s.char_indices() {
        match c {
            '"' => quoted = !quoted,
            ',' if !quoted => return (&s[..i], &s[i + 1..]),
            _ => {}
        }
    }
    (s, "")
}

// ============================================================================
// Body Field
// ============================================================================

/// Reads the next location from a field in the JSON body
///
/// Common patterns:
/// - `{ "next": "/jobs/queued?after=2" }`
/// - `{ "pagination": { "next_url": "..." } }`
#[derive(Debug, Clone)]
pub struct BodyFieldExtractor {
    /// Dotted path to the field, optionally prefixed with `$.`
    pub path: String,
}

impl BodyFieldExtractor {
    /// Create a new body field extractor
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

impl NextLocationExtractor for BodyFieldExtractor {
    fn extract(&self, response: &PageResponse) -> String {
        let Ok(body) = serde_json::from_slice::<Value>(&response.body) else {
            return String::new();
        };

        let path = self.path.strip_prefix("$.").unwrap_or(&self.path);
        let mut current = &body;
        for part in path.split('.') {
            match current.get(part) {
                Some(next) => current = next,
                None => return String::new(),
            }
        }

        current.as_str().map(str::to_string).unwrap_or_default()
    }
}
