//! Transfer key derivation.
//!
//! A transfer key names one `(from, to, amount, asset)` tuple. Approval and
//! consumption both probe the approval table with this key, so the derivation
//! must be a pure function of its inputs.
//!
//! Canonical encoding, in order:
//!
//! ```text
//! from (20 bytes) || to (20 bytes) || amount (16 bytes, big-endian) || asset (20 bytes)
//! ```
//!
//! Every field is fixed width, so distinct tuples always encode to distinct
//! byte strings before hashing.

use permit_types::{Address, Amount, AssetId, TransferKey};

use crate::hash::blake2b_256_multi;

/// Length of the canonical encoding in bytes.
pub const CANONICAL_LEN: usize = Address::LEN * 3 + Amount::ENCODED_LEN;

/// Canonical byte encoding of a transfer tuple.
pub fn canonical_encoding(
    from: &Address,
    to: &Address,
    amount: Amount,
    asset: &AssetId,
) -> [u8; CANONICAL_LEN] {
    let mut out = [0u8; CANONICAL_LEN];
    out[..20].copy_from_slice(from.as_bytes());
    out[20..40].copy_from_slice(to.as_bytes());
    out[40..56].copy_from_slice(&amount.to_be_bytes());
    out[56..].copy_from_slice(asset.as_bytes());
    out
}

/// Derive the approval-table key for a transfer tuple.
pub fn compute_key(from: &Address, to: &Address, amount: Amount, asset: &AssetId) -> TransferKey {
    let amount_bytes = amount.to_be_bytes();
    TransferKey::new(blake2b_256_multi(&[
        from.as_bytes(),
        to.as_bytes(),
        &amount_bytes,
        asset.as_bytes(),
    ]))
}
