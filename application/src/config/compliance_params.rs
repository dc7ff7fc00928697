//! Compliance parameters: scan and remediation control.
//!
//! [`ComplianceParams`] groups the static parameters that control
//! [`ComplianceEngine`](crate::use_cases::compliance::ComplianceEngine).
//! These are application-layer concerns, not domain policy.

use cloudops_domain::DEFAULT_CHUNK_SIZE;
use serde::{Deserialize, Serialize};

/// Scan and remediation control parameters.
///
/// | Field | Default | Meaning |
/// |-------|---------|---------|
/// | `required_tag` | `Environment` | Tag key every active resource must carry |
/// | `max_items` | 10 000 | Safety cap per inventory pass |
/// | `chunk_size` | 100 | Ids per remediation call |
/// | `concurrency` | 1 | Chunks in flight at once (1 = sequential) |
/// | `scan_concurrently` | false | Run both inventory passes at once |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceParams {
    pub required_tag: String,
    pub max_items: usize,
    pub chunk_size: usize,
    pub concurrency: usize,
    pub scan_concurrently: bool,
}

impl Default for ComplianceParams {
    fn default() -> Self {
        Self {
            required_tag: "Environment".to_string(),
            max_items: 10_000,
            chunk_size: DEFAULT_CHUNK_SIZE,
            concurrency: 1,
            scan_concurrently: false,
        }
    }
}

impl ComplianceParams {
    // ==================== Builder Methods ====================

    pub fn with_required_tag(mut self, tag: impl Into<String>) -> Self {
        self.required_tag = tag.into();
        self
    }

    pub fn with_max_items(mut self, max: usize) -> Self {
        self.max_items = max;
        self
    }

    pub fn with_chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn with_scan_concurrently(mut self, enabled: bool) -> Self {
        self.scan_concurrently = enabled;
        self
    }

    pub fn is_sequential(&self) -> bool {
        self.concurrency <= 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let params = ComplianceParams::default();
        assert_eq!(params.required_tag, "Environment");
        assert_eq!(params.max_items, 10_000);
        assert_eq!(params.chunk_size, 100);
        assert!(params.is_sequential());
        assert!(!params.scan_concurrently);
    }

    #[test]
    fn test_builder() {
        let params = ComplianceParams::default()
            .with_required_tag("Owner")
            .with_chunk_size(25)
            .with_concurrency(4);

        assert_eq!(params.required_tag, "Owner");
        assert_eq!(params.chunk_size, 25);
        assert!(!params.is_sequential());
    }
}
