//! Cursor encoding and decoding
//!
//! Identifier layout: URL-safe base64 of `<kind>:<json string>`, where the
//! JSON string is the continuation location.

use super::types::{ContinuationToken, Cursor};
use crate::error::{Error, Result};
use base64::engine::general_purpose::URL_SAFE;
use base64::Engine as _;

/// Kind tag for job listing cursors
pub const JOBS_CURSOR_KIND: &str = "JobsCursor";

/// Encodes and decodes cursors of a single family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorCodec {
    kind: &'static str,
}

impl CursorCodec {
    /// Create a codec for the given cursor family
    pub const fn new(kind: &'static str) -> Self {
        Self { kind }
    }

    /// Codec for job listing cursors
    pub const fn jobs() -> Self {
        Self::new(JOBS_CURSOR_KIND)
    }

    /// The kind tag this codec writes and expects
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// Wrap a continuation token into an opaque cursor
    pub fn encode(&self, token: &ContinuationToken) -> Cursor {
        let payload = serde_json::Value::String(token.as_str().to_string()).to_string();
        Cursor::new(URL_SAFE.encode(format!("{}:{payload}", self.kind)))
    }

    /// Unwrap an opaque cursor into the continuation token it carries
    pub fn decode(&self, cursor: &Cursor) -> Result<ContinuationToken> {
        let bytes = URL_SAFE.decode(cursor.as_str())?;
        let text = String::from_utf8(bytes)
            .map_err(|_| Error::invalid_cursor("payload is not valid UTF-8"))?;

        let (kind, payload) = text
            .split_once(':')
            .ok_or_else(|| Error::invalid_cursor("missing kind separator"))?;

        if kind != self.kind {
            return Err(Error::invalid_cursor(format!(
                "expected kind '{}', got '{kind}'",
                self.kind
            )));
        }

        let raw: String = serde_json::from_str(payload)
            .map_err(|e| Error::invalid_cursor(format!("malformed payload: {e}")))?;

        Ok(ContinuationToken::new(raw))
    }
}

/// Encode a job listing continuation into a cursor
pub fn encode_jobs_cursor(token: &ContinuationToken) -> Cursor {
    CursorCodec::jobs().encode(token)
}

/// Decode a job listing cursor into its continuation
pub fn decode_jobs_cursor(cursor: &Cursor) -> Result<ContinuationToken> {
    CursorCodec::jobs().decode(cursor)
}
