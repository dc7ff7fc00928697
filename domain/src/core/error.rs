//! Domain error types

use thiserror::Error;

/// Domain-level errors.
///
/// These are build-time or construction-time failures. Per-call failures of a
/// dispatched tool never surface as a `DomainError`; they are folded into a
/// [`ResponseEnvelope`](crate::envelope::ResponseEnvelope) instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Two descriptors were registered under the same tool name.
    #[error("Duplicate tool name '{name}' (already registered by domain '{existing_domain}', rejected from domain '{rejected_domain}')")]
    DuplicateToolName {
        name: String,
        existing_domain: String,
        rejected_domain: String,
    },

    /// A parameter schema violates its own invariants.
    #[error("Invalid schema for '{tool}': {reason}")]
    InvalidSchema { tool: String, reason: String },

    /// Chunk sizes must be at least one identifier.
    #[error("Invalid chunk size: {0}")]
    InvalidChunkSize(usize),
}

impl DomainError {
    /// Check if this error must abort catalog construction
    pub fn is_fatal_at_startup(&self) -> bool {
        matches!(
            self,
            DomainError::DuplicateToolName { .. } | DomainError::InvalidSchema { .. }
        )
    }
}
