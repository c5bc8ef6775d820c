//! Pagination module
//!
//! A memoized, cursor-based view over one page of remote job listings.
//!
//! # Overview
//!
//! A [`PageConnection`] is built from immutable [`PageOptions`]. Its
//! accessors (`items`, `total_count`, `page_info`, ...) may be called in any
//! order and from any number of tasks; the first call performs the single
//! remote fetch and every call, earlier or later, observes that one result
//! or that one error. A fresh page needs a fresh connection.

mod connection;
mod types;

pub use connection::{JobsBackend, PageConnection};
pub use types::{JobNode, PageInfo, PageOptions, PageResult, ResolveStatus};

#[cfg(test)]
mod tests;
