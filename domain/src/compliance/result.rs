//! Compliance scan results.

use serde::{Serialize, Serializer};
use std::collections::HashSet;

use crate::inventory::InventorySnapshot;

/// Resources present in the full inventory but absent from the matching one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ComplianceResult {
    #[serde(serialize_with = "sorted")]
    pub non_conforming_ids: HashSet<String>,
    pub scanned_total: usize,
    pub matching_total: usize,
    /// Either pass stopped at its item cap, so the difference may be wrong
    pub truncated: bool,
}

impl ComplianceResult {
    /// Compute `all \ matching`.
    ///
    /// Ids present only in `matching` (for instance a resource created
    /// between the two passes) are ignored.
    pub fn diff(all: &InventorySnapshot, matching: &InventorySnapshot) -> Self {
        let non_conforming_ids = all
            .ids()
            .iter()
            .filter(|id| !matching.contains(id))
            .cloned()
            .collect();

        Self {
            non_conforming_ids,
            scanned_total: all.len(),
            matching_total: matching.len(),
            truncated: all.is_truncated() || matching.is_truncated(),
        }
    }

    pub fn is_compliant(&self) -> bool {
        self.non_conforming_ids.is_empty()
    }

    pub fn non_conforming_count(&self) -> usize {
        self.non_conforming_ids.len()
    }

    pub fn sorted_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.non_conforming_ids.iter().cloned().collect();
        ids.sort_unstable();
        ids
    }
}

fn sorted<S: Serializer>(ids: &HashSet<String>, serializer: S) -> Result<S::Ok, S::Error> {
    let mut ids: Vec<&String> = ids.iter().collect();
    ids.sort_unstable();
    serializer.collect_seq(ids)
}
