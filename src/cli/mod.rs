//! CLI module
//!
//! Command-line interface for browsing job listings.
//!
//! # Commands
//!
//! - `page` - Fetch a single page
//! - `walk` - Follow cursors through consecutive pages
//! - `encode-cursor` - Wrap a continuation location into a cursor
//! - `decode-cursor` - Unwrap a cursor into its continuation location

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::{render_page, Runner};
