//! Progress notification port for scans and remediation.

/// Callbacks for long-running compliance work.
///
/// All methods have empty default implementations. Implementations live in
/// the presentation layer.
pub trait ScanProgressNotifier: Send + Sync {
    /// Called before the first page of a listing is requested
    fn on_scan_start(&self, _label: &str) {}

    /// Called after each page, with the number of ids collected so far
    fn on_page_scanned(&self, _label: &str, _page: usize, _collected: usize) {}

    fn on_scan_complete(&self, _label: &str, _collected: usize, _truncated: bool) {}

    fn on_remediation_start(&self, _label: &str, _chunks: usize, _items: usize) {}

    fn on_chunk_complete(&self, _index: usize, _size: usize, _succeeded: bool) {}

    fn on_remediation_complete(&self, _succeeded: usize, _failed: usize) {}
}

/// No-op progress notifier
pub struct NoScanProgress;

impl ScanProgressNotifier for NoScanProgress {}
