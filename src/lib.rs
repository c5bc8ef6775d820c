#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]

//! # jobpager
//!
//! A read-only, paginated view over a remote job-listing service.
//!
//! ## Features
//!
//! - **Opaque Cursors**: the service's continuation locations, wrapped and tagged
//! - **Single Fetch**: any number of accessor calls share one remote request
//! - **Error Replay**: a failed page reports the same error to every accessor
//! - **Pluggable Collaborators**: request execution, payload decoding and
//!   next-location extraction are traits
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use jobpager::{Result, ServiceConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let backend = ServiceConfig::new("http://localhost:3186").backend()?;
//!
//!     let page = backend.new_connection("queued", None, Some(50), None)?;
//!     let jobs = page.items().await?;
//!     let total = page.total_count().await?; // no second request
//!     let info = page.page_info().await?;
//!
//!     if let Some(cursor) = info.end_cursor {
//!         let next = backend.new_connection("queued", None, Some(50), Some(&cursor))?;
//!         // ...
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                     PageConnection                       │
//! │   items()    total_count()    page_info()  next_page()   │
//! │                 └───── compute() (once) ─────┘           │
//! └──────────────────────────────────────────────────────────┘
//!                              │
//! ┌───────────────┬────────────┴─────────┬───────────────────┐
//! │    Cursor     │     HTTP             │      Decode       │
//! ├───────────────┼──────────────────────┼───────────────────┤
//! │ CursorCodec   │ RequestExecutor      │ PayloadDecoder    │
//! │ kind tagging  │ HttpClient (reqwest) │ Link header       │
//! │               │                      │ Body field        │
//! └───────────────┴──────────────────────┴───────────────────┘
//! ```

#![warn(clippy::all)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Opaque pagination cursors
pub mod cursor;

/// Request execution and the HTTP client
pub mod http;

/// Payload decoding and next-location extraction
pub mod decode;

/// Memoized page connections
pub mod pagination;

/// Service configuration
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::{NextLinkSource, ServiceConfig};
pub use cursor::{ContinuationToken, Cursor, CursorCodec};
pub use error::{Error, ErrorKind, Result};
pub use pagination::{JobNode, JobsBackend, PageConnection, PageInfo, PageOptions, PageResult};
pub use types::Job;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
