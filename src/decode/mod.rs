//! Response decoder module
//!
//! Supports: JSON payloads, Link header and body-field next locations
//!
//! # Overview
//!
//! A page response is read twice: once for the jobs and total count, once
//! for the location of the following page. Both readers are traits so the
//! pagination core does not depend on the payload layout.

mod decoders;
mod types;

pub use decoders::{BodyFieldExtractor, JsonPayloadDecoder, LinkHeaderExtractor};
pub use types::{JobsPayload, NextLocationExtractor, PayloadDecoder};
