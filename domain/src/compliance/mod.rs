//! Compliance domain module
//!
//! A compliance check drains two inventories (every active resource, and
//! the resources that satisfy a policy such as "carries an `Environment`
//! tag"), diffs them into a [`ComplianceResult`], and optionally remediates
//! the difference in fixed-size chunks, aggregated into a [`BatchResult`].

pub mod batch;
pub mod result;

pub use batch::{BatchResult, ChunkOutcome, DEFAULT_CHUNK_SIZE, chunk_ids};
pub use result::ComplianceResult;
