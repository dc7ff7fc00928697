//! Inventory scan use case
//!
//! Drains a cursor-based [`ListOperation`] into an [`InventorySnapshot`].
//!
//! The scan stops when a page comes back without a cursor, or when the
//! snapshot reaches its item cap. Hitting the cap is not an error: the
//! snapshot is returned with `truncated = true` so the caller can decide
//! whether a partial inventory is good enough.

use crate::ports::inventory::ListOperation;
use crate::ports::scan_progress::{NoScanProgress, ScanProgressNotifier};
use cloudops_domain::{InsertOutcome, InventorySnapshot, RemoteError, ResourcePredicate};
use tracing::{debug, info};

/// Drains paginated listings.
#[derive(Debug, Clone, Copy)]
pub struct InventoryScanner {
    max_items: usize,
}

impl InventoryScanner {
    pub fn new(max_items: usize) -> Self {
        Self { max_items }
    }

    pub fn max_items(&self) -> usize {
        self.max_items
    }

    /// Drain `operation` without progress reporting.
    pub async fn drain(
        &self,
        operation: &dyn ListOperation,
        predicate: Option<&ResourcePredicate>,
    ) -> Result<InventorySnapshot, RemoteError> {
        self.drain_with_progress(operation, predicate, &NoScanProgress)
            .await
    }

    /// Drain `operation`, keeping only resources that satisfy `predicate`.
    ///
    /// # Errors
    ///
    /// A failed page aborts the scan. A cursor that repeats the one just sent
    /// is reported as [`RemoteError::UnexpectedResponse`] instead of looping.
    pub async fn drain_with_progress(
        &self,
        operation: &dyn ListOperation,
        predicate: Option<&ResourcePredicate>,
        progress: &dyn ScanProgressNotifier,
    ) -> Result<InventorySnapshot, RemoteError> {
        let label = operation.label();
        let mut snapshot = InventorySnapshot::with_capacity_limit(self.max_items);
        let mut cursor: Option<String> = None;

        progress.on_scan_start(label);

        'pages: loop {
            let page = operation.list_page(cursor.as_deref()).await?;
            snapshot.record_page();
            debug!(
                "{}: page {} returned {} item(s)",
                label,
                snapshot.pages(),
                page.items.len()
            );

            for resource in &page.items {
                if predicate.is_some_and(|p| !p.matches(resource)) {
                    continue;
                }
                if snapshot.offer(resource.id.as_str()) == InsertOutcome::Full {
                    break 'pages;
                }
            }
            progress.on_page_scanned(label, snapshot.pages(), snapshot.len());

            match page.next_cursor {
                None => break,
                Some(next) => {
                    if cursor.as_deref() == Some(next.as_str()) {
                        return Err(RemoteError::UnexpectedResponse(format!(
                            "{}: cursor did not advance past '{}'",
                            label, next
                        )));
                    }
                    if snapshot.is_full() {
                        // More pages exist but nothing more fits
                        snapshot.mark_truncated();
                        break;
                    }
                    cursor = Some(next);
                }
            }
        }

        if snapshot.is_truncated() {
            progress.on_page_scanned(label, snapshot.pages(), snapshot.len());
        }
        info!(
            "{}: collected {} id(s) over {} page(s){}",
            label,
            snapshot.len(),
            snapshot.pages(),
            if snapshot.is_truncated() { " (truncated)" } else { "" }
        );
        progress.on_scan_complete(label, snapshot.len(), snapshot.is_truncated());
        Ok(snapshot)
    }
}
