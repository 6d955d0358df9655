//! Fundamental types for the permit workspace.
//!
//! This crate defines the identifiers and values shared by every other crate:
//! account addresses, registry and asset identifiers, amounts, and the
//! transfer key digest that names one `(from, to, amount, asset)` tuple.

pub mod address;
pub mod amount;
pub mod error;
pub mod hash;

pub use address::{Address, AssetId, RegistryId};
pub use amount::Amount;
pub use error::PermitError;
pub use hash::TransferKey;
