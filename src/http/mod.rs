//! HTTP module
//!
//! Provides the request-execution seam used by the pagination core and a
//! reqwest-backed implementation of it.
//!
//! # Features
//!
//! - **RequestExecutor**: the trait the pagination core depends on
//! - **HttpClient**: reqwest implementation with base URL resolution,
//!   default headers and query parameter overriding

mod client;
mod executor;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder};
pub use executor::{PageResponse, RequestExecutor};
