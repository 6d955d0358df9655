//! The approval table and its staged write batch.
//!
//! The table maps `(registry, transfer key)` to the number of outstanding
//! approvals. Entries are created on first approval and never removed: a
//! count that falls to zero stays in the table and reads as zero.
//!
//! All mutation goes through an [`ApprovalBatch`], which stages new counts in
//! an overlay. Reads through the batch see the staged values, so later
//! entries of a batch observe earlier ones. Nothing reaches the table until
//! [`ApprovalBatch::commit`]; dropping the batch discards every staged change.

use std::collections::HashMap;

use permit_types::{RegistryId, TransferKey};

use crate::error::LedgerError;
use crate::event::ApprovalEvent;

/// Composite key of one approval entry.
pub type EntryKey = (RegistryId, TransferKey);

/// Outstanding approval counts, namespaced per registry.
#[derive(Clone, Debug, Default)]
pub struct ApprovalTable {
    counts: HashMap<EntryKey, u64>,
}

impl ApprovalTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Outstanding approvals for `key` under `registry` (zero if never approved).
    pub fn count(&self, registry: &RegistryId, key: &TransferKey) -> u64 {
        self.counts.get(&(*registry, *key)).copied().unwrap_or(0)
    }

    pub fn is_approved(&self, registry: &RegistryId, key: &TransferKey) -> bool {
        self.count(registry, key) > 0
    }

    /// Number of entries ever created, including those at zero.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all outstanding approvals.
    pub fn total_outstanding(&self) -> u128 {
        self.counts.values().map(|c| u128::from(*c)).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&EntryKey, &u64)> {
        self.counts.iter()
    }

    /// Begin a staged write batch over this table.
    pub fn batch(&mut self) -> ApprovalBatch<'_> {
        ApprovalBatch {
            table: self,
            staged: HashMap::new(),
            events: Vec::new(),
        }
    }

    pub(crate) fn from_counts(counts: HashMap<EntryKey, u64>) -> Self {
        Self { counts }
    }
}

/// Staged changes to an [`ApprovalTable`], applied atomically on commit.
pub struct ApprovalBatch<'a> {
    table: &'a mut ApprovalTable,
    staged: HashMap<EntryKey, u64>,
    events: Vec<ApprovalEvent>,
}

impl ApprovalBatch<'_> {
    /// Count as seen through the batch: staged value if any, else the table's.
    pub fn count(&self, registry: &RegistryId, key: &TransferKey) -> u64 {
        match self.staged.get(&(*registry, *key)) {
            Some(count) => *count,
            None => self.table.count(registry, key),
        }
    }

    /// Stage one more approval. Returns the new count.
    pub fn increment(&mut self, registry: &RegistryId, key: &TransferKey) -> Result<u64, LedgerError> {
        let next = self
            .count(registry, key)
            .checked_add(1)
            .ok_or(LedgerError::CountOverflow)?;
        self.staged.insert((*registry, *key), next);
        Ok(next)
    }

    /// Stage one fewer approval. Returns the new count, or `None` (staging
    /// nothing) when the count is already zero.
    pub fn decrement(&mut self, registry: &RegistryId, key: &TransferKey) -> Option<u64> {
        let next = self.count(registry, key).checked_sub(1)?;
        self.staged.insert((*registry, *key), next);
        Some(next)
    }

    /// Queue an event to be returned by [`commit`](Self::commit).
    pub fn record(&mut self, event: ApprovalEvent) {
        self.events.push(event);
    }

    /// Number of distinct entries touched so far.
    pub fn staged_len(&self) -> usize {
        self.staged.len()
    }

    /// Apply every staged count to the table and hand back the queued events
    /// in the order they were recorded.
    pub fn commit(self) -> Vec<ApprovalEvent> {
        self.table.counts.extend(self.staged);
        self.events
    }
}
