//! Hashing primitives for the permit workspace.
//!
//! - **Blake2b-256** for all digests
//! - Deterministic transfer-key derivation over a fixed-width canonical encoding

pub mod hash;
pub mod transfer_key;

pub use hash::{blake2b_256, blake2b_256_multi};
pub use transfer_key::{canonical_encoding, compute_key, CANONICAL_LEN};
