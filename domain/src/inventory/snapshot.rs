//! Inventory snapshots: deduplicated id sets with a safety cap.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Result of offering one id to a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    /// Already present; the snapshot is unchanged
    Duplicate,
    /// The cap is reached and the id was not recorded
    Full,
}

/// Set of resource ids drained from a listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventorySnapshot {
    ids: HashSet<String>,
    max_items: usize,
    truncated: bool,
    pages: usize,
}

impl InventorySnapshot {
    pub fn with_capacity_limit(max_items: usize) -> Self {
        Self {
            ids: HashSet::new(),
            max_items,
            truncated: false,
            pages: 0,
        }
    }

    /// Offer one id.
    ///
    /// Once the cap is reached, every further new id is refused and the
    /// snapshot is marked truncated.
    pub fn offer(&mut self, id: impl Into<String>) -> InsertOutcome {
        let id = id.into();
        if self.ids.contains(&id) {
            return InsertOutcome::Duplicate;
        }
        if self.is_full() {
            self.truncated = true;
            return InsertOutcome::Full;
        }
        self.ids.insert(id);
        InsertOutcome::Inserted
    }

    pub fn record_page(&mut self) {
        self.pages += 1;
    }

    /// Mark that unscanned data remained when the scan stopped
    pub fn mark_truncated(&mut self) {
        self.truncated = true;
    }

    pub fn is_full(&self) -> bool {
        self.ids.len() >= self.max_items
    }

    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    pub fn pages(&self) -> usize {
        self.pages
    }

    pub fn max_items(&self) -> usize {
        self.max_items
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn ids(&self) -> &HashSet<String> {
        &self.ids
    }

    pub fn sorted_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.ids.iter().map(|s| s.as_str()).collect();
        ids.sort_unstable();
        ids
    }
}
