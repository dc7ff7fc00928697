//! Progress reporting for scans and remediation

pub mod reporter;

pub use reporter::{ScanProgressReporter, SimpleScanProgress};
