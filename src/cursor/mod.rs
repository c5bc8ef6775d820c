//! Cursor module
//!
//! Opaque, forward-only pagination cursors.
//!
//! # Overview
//!
//! The remote service hands back a continuation location with every page.
//! Callers never see that location directly: it is wrapped into a [`Cursor`]
//! tagged with its cursor family, and unwrapped again when the caller asks
//! for the next page. The codec does not interpret the location at all.

mod codec;
mod types;

pub use codec::{decode_jobs_cursor, encode_jobs_cursor, CursorCodec, JOBS_CURSOR_KIND};
pub use types::{ContinuationToken, Cursor};
