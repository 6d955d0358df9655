//! Approval table snapshots.
//!
//! A snapshot captures every table entry, including entries whose count has
//! fallen to zero, sorted by `(registry, key)` so that two ledgers with the
//! same contents always produce byte-identical snapshots. The snapshot hash
//! is a Blake2b-256 over the sorted entries and is checked on load.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use permit_types::{RegistryId, TransferKey};

use crate::error::LedgerError;
use crate::table::ApprovalTable;

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// One approval table entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    pub registry: RegistryId,
    pub key: TransferKey,
    pub count: u64,
}

/// A point-in-time copy of the approval table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSnapshot {
    /// Snapshot version for compatibility.
    pub version: u32,
    /// Blake2b-256 of the entries.
    pub hash: [u8; 32],
    /// Entries sorted by `(registry, key)`.
    pub entries: Vec<SnapshotEntry>,
}

impl TableSnapshot {
    /// Capture the current contents of `table`.
    pub fn capture(table: &ApprovalTable) -> Self {
        let mut entries: Vec<SnapshotEntry> = table
            .iter()
            .map(|((registry, key), count)| SnapshotEntry {
                registry: *registry,
                key: *key,
                count: *count,
            })
            .collect();
        entries.sort_by(|a, b| (a.registry, a.key).cmp(&(b.registry, b.key)));
        let hash = compute_hash(&entries);
        Self {
            version: SNAPSHOT_VERSION,
            hash,
            entries,
        }
    }

    /// Check version, entry order and hash. Entries must be strictly
    /// increasing by `(registry, key)`, which also rules out duplicates.
    pub fn verify(&self) -> Result<(), LedgerError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(LedgerError::SnapshotVersion(self.version));
        }
        let ordered = self
            .entries
            .windows(2)
            .all(|w| (w[0].registry, w[0].key) < (w[1].registry, w[1].key));
        if !ordered {
            return Err(LedgerError::SnapshotCorrupt);
        }
        if compute_hash(&self.entries) != self.hash {
            return Err(LedgerError::SnapshotCorrupt);
        }
        Ok(())
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, LedgerError> {
        bincode::serialize(self).map_err(|e| LedgerError::Serialization(e.to_string()))
    }

    /// Decode and verify a snapshot.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, LedgerError> {
        let snapshot: Self =
            bincode::deserialize(bytes).map_err(|e| LedgerError::Serialization(e.to_string()))?;
        snapshot.verify()?;
        Ok(snapshot)
    }

    /// Rebuild a table from a verified snapshot.
    pub fn into_table(self) -> Result<ApprovalTable, LedgerError> {
        self.verify()?;
        let counts: HashMap<_, _> = self
            .entries
            .into_iter()
            .map(|e| ((e.registry, e.key), e.count))
            .collect();
        Ok(ApprovalTable::from_counts(counts))
    }
}

fn compute_hash(entries: &[SnapshotEntry]) -> [u8; 32] {
    let mut buf = Vec::with_capacity(entries.len() * 60);
    for entry in entries {
        buf.extend_from_slice(entry.registry.as_bytes());
        buf.extend_from_slice(entry.key.as_bytes());
        buf.extend_from_slice(&entry.count.to_le_bytes());
    }
    permit_crypto::blake2b_256(&buf)
}
