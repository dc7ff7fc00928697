//! Compliance use case
//!
//! This module provides the [`ComplianceEngine`], which finds resources
//! that violate a policy and remediates them in bounded chunks.
//!
//! # Overview
//!
//! 1. **Scan all**: drain every active resource
//! 2. **Scan matching**: drain the resources that satisfy the policy
//! 3. **Diff**: `non_conforming = all - matching`
//! 4. **Remediate**: split the difference into chunks and apply a
//!    [`BatchOperation`] to each, recording every chunk's outcome
//!
//! The two scans are not transactionally consistent. A resource created or
//! deleted between them may be misclassified for one cycle; nothing here
//! retries or re-checks.

use crate::config::ComplianceParams;
use crate::ports::inventory::{BatchOperation, ListOperation};
use crate::ports::scan_progress::{NoScanProgress, ScanProgressNotifier};
use crate::use_cases::scan_inventory::InventoryScanner;
use cloudops_domain::{
    BatchResult, ChunkOutcome, ComplianceResult, DomainError, RemoteError, ResourcePredicate,
    chunk_ids,
};
use futures::StreamExt;
use futures::stream;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Errors that abort a scan or a remediation before it produces a result.
#[derive(Error, Debug)]
pub enum ComplianceError {
    /// A listing page failed; the scan has no usable result.
    #[error("Inventory scan failed: {0}")]
    Scan(#[from] RemoteError),

    /// The remediation could not be planned (e.g. a zero chunk size).
    #[error("Invalid remediation: {0}")]
    Plan(#[from] DomainError),
}

/// One inventory pass: a listing plus an optional client-side filter.
#[derive(Clone)]
pub struct ScanPass {
    pub operation: Arc<dyn ListOperation>,
    pub predicate: Option<ResourcePredicate>,
}

impl ScanPass {
    pub fn new(operation: Arc<dyn ListOperation>) -> Self {
        Self {
            operation,
            predicate: None,
        }
    }

    pub fn with_predicate(mut self, predicate: ResourcePredicate) -> Self {
        self.predicate = Some(predicate);
        self
    }
}

/// Use case for compliance scans and chunked remediation.
pub struct ComplianceEngine {
    params: ComplianceParams,
}

impl ComplianceEngine {
    pub fn new(params: ComplianceParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &ComplianceParams {
        &self.params
    }

    /// Scan without progress reporting.
    pub async fn scan(
        &self,
        all: &ScanPass,
        matching: &ScanPass,
    ) -> Result<ComplianceResult, ComplianceError> {
        self.scan_with_progress(all, matching, &NoScanProgress)
            .await
    }

    /// Drain both passes and diff them.
    ///
    /// The passes run one after the other unless `scan_concurrently` is set;
    /// either way the diff is computed only once both are complete.
    pub async fn scan_with_progress(
        &self,
        all: &ScanPass,
        matching: &ScanPass,
        progress: &dyn ScanProgressNotifier,
    ) -> Result<ComplianceResult, ComplianceError> {
        let scanner = InventoryScanner::new(self.params.max_items);
        let drain = |pass: &ScanPass| {
            let operation = Arc::clone(&pass.operation);
            let predicate = pass.predicate.clone();
            async move {
                scanner
                    .drain_with_progress(operation.as_ref(), predicate.as_ref(), progress)
                    .await
            }
        };

        let (all_ids, matching_ids) = if self.params.scan_concurrently {
            let (a, m) = futures::join!(drain(all), drain(matching));
            (a?, m?)
        } else {
            let a = drain(all).await?;
            let m = drain(matching).await?;
            (a, m)
        };

        let result = ComplianceResult::diff(&all_ids, &matching_ids);
        info!(
            "Compliance scan: {} scanned, {} matching, {} non-conforming{}",
            result.scanned_total,
            result.matching_total,
            result.non_conforming_count(),
            if result.truncated { " (truncated)" } else { "" }
        );
        Ok(result)
    }

    /// Remediate without progress reporting.
    pub async fn remediate(
        &self,
        ids: impl IntoIterator<Item = String>,
        operation: &dyn BatchOperation,
    ) -> Result<BatchResult, ComplianceError> {
        self.remediate_with_progress(ids, operation, &NoScanProgress)
            .await
    }

    /// Apply `operation` to `ids` in chunks of `chunk_size`.
    ///
    /// Ids are sorted before chunking so the chunk layout is deterministic.
    /// A failed chunk is recorded and the remaining chunks still run. With
    /// `concurrency > 1` up to that many chunks are in flight at once; the
    /// outcomes are returned in chunk order either way.
    pub async fn remediate_with_progress(
        &self,
        ids: impl IntoIterator<Item = String>,
        operation: &dyn BatchOperation,
        progress: &dyn ScanProgressNotifier,
    ) -> Result<BatchResult, ComplianceError> {
        let mut ids: Vec<String> = ids.into_iter().collect();
        ids.sort_unstable();
        ids.dedup();

        let chunks = chunk_ids(&ids, self.params.chunk_size)?;
        progress.on_remediation_start(operation.label(), chunks.len(), ids.len());
        info!(
            "{}: remediating {} id(s) in {} chunk(s)",
            operation.label(),
            ids.len(),
            chunks.len()
        );

        let run_chunk = |index: usize, chunk: Vec<String>| async move {
            let outcome = match operation.apply(&chunk).await {
                Ok(()) => ChunkOutcome::success(index, chunk),
                Err(error) => {
                    warn!(
                        "{}: chunk {} ({} id(s)) failed: {}",
                        operation.label(),
                        index,
                        chunk.len(),
                        error
                    );
                    ChunkOutcome::failure(index, chunk, error)
                }
            };
            progress.on_chunk_complete(outcome.index, outcome.ids.len(), outcome.succeeded);
            outcome
        };

        let outcomes: Vec<ChunkOutcome> = if self.params.is_sequential() {
            let mut outcomes = Vec::with_capacity(chunks.len());
            for (index, chunk) in chunks.into_iter().enumerate() {
                outcomes.push(run_chunk(index, chunk).await);
            }
            outcomes
        } else {
            stream::iter(chunks.into_iter().enumerate())
                .map(|(index, chunk)| run_chunk(index, chunk))
                .buffer_unordered(self.params.concurrency)
                .collect::<Vec<_>>()
                .await
        };

        let result = BatchResult::from_outcomes(outcomes);
        progress.on_remediation_complete(result.items_succeeded, result.items_failed);
        info!(
            "{}: {} of {} id(s) remediated, {} chunk(s) failed",
            operation.label(),
            result.items_succeeded,
            result.total_items(),
            result.chunks_failed
        );
        Ok(result)
    }
}
