//! Transfer-approval ledger for a regulated token.
//!
//! Bound registries pre-approve `(from, to, amount)` transfers of their
//! asset. Each approval is counted under a deterministic transfer key and
//! consumed when the matching transfer executes.

pub mod authority;
pub mod config;
pub mod error;
pub mod event;
pub mod ledger;
pub mod snapshot;
pub mod table;

pub use authority::{ComplianceBindings, RegistryAuthority};
pub use config::LedgerConfig;
pub use error::LedgerError;
pub use event::{ApprovalEvent, EventBus};
pub use ledger::{ApprovalLedger, LedgerStats};
pub use permit_crypto::compute_key;
pub use snapshot::{SnapshotEntry, TableSnapshot, SNAPSHOT_VERSION};
pub use table::{ApprovalBatch, ApprovalTable};
