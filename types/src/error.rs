//! Top-level error type shared across crates.

use thiserror::Error;

/// Errors raised while constructing or parsing primitive values.
#[derive(Debug, Error)]
pub enum PermitError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),
}
