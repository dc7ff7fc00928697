//! Compliance configuration from TOML (`[compliance]` section)

use cloudops_application::ComplianceParams;
use serde::{Deserialize, Serialize};

/// Raw compliance configuration.
///
/// Mirrors [`ComplianceParams`] field for field; defaults come from there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileComplianceConfig {
    pub required_tag: String,
    pub max_items: usize,
    pub chunk_size: usize,
    pub concurrency: usize,
    pub scan_concurrently: bool,
}

impl Default for FileComplianceConfig {
    fn default() -> Self {
        let params = ComplianceParams::default();
        Self {
            required_tag: params.required_tag,
            max_items: params.max_items,
            chunk_size: params.chunk_size,
            concurrency: params.concurrency,
            scan_concurrently: params.scan_concurrently,
        }
    }
}

impl FileComplianceConfig {
    pub fn to_params(&self) -> ComplianceParams {
        ComplianceParams::default()
            .with_required_tag(self.required_tag.clone())
            .with_max_items(self.max_items)
            .with_chunk_size(self.chunk_size)
            .with_concurrency(self.concurrency)
            .with_scan_concurrently(self.scan_concurrently)
    }
}
