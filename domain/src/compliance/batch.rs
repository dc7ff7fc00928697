//! Chunked batch remediation results.
//!
//! Control-plane mutations accept a bounded number of ids per call. A
//! remediation splits its ids into chunks, issues one call per chunk, and
//! records one [`ChunkOutcome`] per call. A failed chunk never hides the
//! chunks that succeeded.

use serde::{Deserialize, Serialize};

use crate::core::error::DomainError;
use crate::envelope::{ErrorInfo, ErrorKind, ItemOutcome, ResponseEnvelope};

/// Per-call id limit most control-plane mutations share
pub const DEFAULT_CHUNK_SIZE: usize = 100;

/// Split `ids` into consecutive chunks of at most `size` ids.
pub fn chunk_ids(ids: &[String], size: usize) -> Result<Vec<Vec<String>>, DomainError> {
    if size == 0 {
        return Err(DomainError::InvalidChunkSize(size));
    }
    Ok(ids.chunks(size).map(<[String]>::to_vec).collect())
}

/// Outcome of one chunk call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkOutcome {
    /// Position of the chunk in submission order
    pub index: usize,
    pub ids: Vec<String>,
    pub succeeded: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
}

impl ChunkOutcome {
    pub fn success(index: usize, ids: Vec<String>) -> Self {
        Self {
            index,
            ids,
            succeeded: true,
            error: None,
        }
    }

    pub fn failure(index: usize, ids: Vec<String>, error: ErrorInfo) -> Self {
        Self {
            index,
            ids,
            succeeded: false,
            error: Some(error),
        }
    }
}

/// Aggregate of every chunk call of a remediation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchResult {
    pub outcomes: Vec<ChunkOutcome>,
    pub chunks_succeeded: usize,
    pub chunks_failed: usize,
    pub items_succeeded: usize,
    pub items_failed: usize,
}

impl BatchResult {
    /// Build from outcomes in any order; they are stored in submission order.
    pub fn from_outcomes(mut outcomes: Vec<ChunkOutcome>) -> Self {
        outcomes.sort_by_key(|o| o.index);

        let mut result = Self::default();
        for outcome in &outcomes {
            if outcome.succeeded {
                result.chunks_succeeded += 1;
                result.items_succeeded += outcome.ids.len();
            } else {
                result.chunks_failed += 1;
                result.items_failed += outcome.ids.len();
            }
        }
        result.outcomes = outcomes;
        result
    }

    pub fn total_items(&self) -> usize {
        self.items_succeeded + self.items_failed
    }

    pub fn is_complete_success(&self) -> bool {
        self.chunks_failed == 0
    }

    pub fn failed_chunks(&self) -> impl Iterator<Item = &ChunkOutcome> {
        self.outcomes.iter().filter(|o| !o.succeeded)
    }

    /// Per-id outcomes, in submission order
    pub fn item_outcomes(&self) -> Vec<ItemOutcome> {
        self.outcomes
            .iter()
            .flat_map(|chunk| {
                let error = chunk.error.as_ref().map(|e| e.message.clone());
                chunk.ids.iter().map(move |id| ItemOutcome {
                    id: id.clone(),
                    succeeded: chunk.succeeded,
                    error: error.clone(),
                })
            })
            .collect()
    }

    /// Fold into a single envelope.
    ///
    /// No chunks, or all chunks succeeded: `Success`. All failed: the first
    /// chunk's error. Mixed: `PartialBatchFailure` carrying per-id outcomes.
    pub fn to_envelope(&self) -> ResponseEnvelope {
        if self.is_complete_success() {
            return ResponseEnvelope::success(serde_json::json!({
                "items": self.item_outcomes(),
                "count": self.items_succeeded,
            }));
        }

        if self.chunks_succeeded == 0
            && let Some(error) = self.failed_chunks().find_map(|c| c.error.as_ref())
        {
            return ResponseEnvelope::Failure {
                error_kind: error.kind,
                message: error.message.clone(),
                code: error.code.clone(),
                partial: None,
            };
        }

        ResponseEnvelope::failure(
            ErrorKind::PartialBatchFailure,
            format!(
                "{} of {} items failed across {} chunk(s)",
                self.items_failed,
                self.total_items(),
                self.chunks_failed
            ),
        )
        .with_partial(self.item_outcomes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    fn boom() -> ErrorInfo {
        ErrorInfo::new(ErrorKind::RemoteCallError, "TerminateInstances failed: boom")
    }

    #[test]
    fn test_chunk_ids_splits_in_order() {
        let chunks = chunk_ids(&ids(&["A", "B", "C", "D", "E"]), 2).unwrap();
        assert_eq!(chunks, vec![ids(&["A", "B"]), ids(&["C", "D"]), ids(&["E"])]);
    }

    #[test]
    fn test_chunk_ids_rejects_zero() {
        assert_eq!(
            chunk_ids(&ids(&["A"]), 0).unwrap_err(),
            DomainError::InvalidChunkSize(0)
        );
        assert!(chunk_ids(&[], 3).unwrap().is_empty());
    }

    #[test]
    fn test_mixed_outcome_is_partial_failure() {
        let result = BatchResult::from_outcomes(vec![
            ChunkOutcome::success(2, ids(&["E"])),
            ChunkOutcome::failure(1, ids(&["C", "D"]), boom()),
            ChunkOutcome::success(0, ids(&["A", "B"])),
        ]);

        assert_eq!(result.outcomes[0].index, 0);
        assert_eq!(result.chunks_succeeded, 2);
        assert_eq!(result.items_succeeded, 3);
        assert_eq!(result.items_failed, 2);
        assert_eq!(result.failed_chunks().count(), 1);

        let envelope = result.to_envelope();
        assert_eq!(envelope.error_kind(), Some(ErrorKind::PartialBatchFailure));
        let ResponseEnvelope::Failure { partial: Some(items), .. } = envelope else {
            panic!("expected partial failure");
        };
        let failed: Vec<&str> = items
            .iter()
            .filter(|i| !i.succeeded)
            .map(|i| i.id.as_str())
            .collect();
        assert_eq!(failed, vec!["C", "D"]);
        assert_eq!(items.len(), 5);
    }

    #[test]
    fn test_all_failed_reports_remote_error() {
        let result = BatchResult::from_outcomes(vec![ChunkOutcome::failure(0, ids(&["A"]), boom())]);
        let envelope = result.to_envelope();
        assert_eq!(envelope.error_kind(), Some(ErrorKind::RemoteCallError));
        assert!(envelope.message().unwrap().contains("boom"));
    }

    #[test]
    fn test_empty_batch_is_success() {
        let envelope = BatchResult::from_outcomes(Vec::new()).to_envelope();
        assert!(envelope.is_success());
        assert_eq!(envelope.data().unwrap()["count"], 0);
    }
}
