//! Common types used throughout jobpager
//!
//! This module contains shared type definitions and type aliases
//! used across multiple modules.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// Generic key-value map with string keys and values
pub type StringMap = HashMap<String, String>;

// ============================================================================
// Job
// ============================================================================

/// A job record as returned by the remote service.
///
/// The record is opaque here: it is passed through to the presentation
/// layer exactly as it was received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Job(JsonValue);

impl Job {
    /// Wrap a raw JSON value
    pub fn new(value: JsonValue) -> Self {
        Self(value)
    }

    /// Borrow the raw JSON value
    pub fn as_value(&self) -> &JsonValue {
        &self.0
    }

    /// Consume into the raw JSON value
    pub fn into_value(self) -> JsonValue {
        self.0
    }

    /// The `id` field, if the record has one
    pub fn id(&self) -> Option<&JsonValue> {
        self.0.get("id")
    }
}

impl From<JsonValue> for Job {
    fn from(value: JsonValue) -> Self {
        Self(value)
    }
}
