use permit_types::RegistryId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("caller {0} is not an authorized, bound registry")]
    Unauthorized(RegistryId),

    #[error("not approved")]
    NotApproved,

    #[error("batch length mismatch: {froms} senders, {tos} recipients, {amounts} amounts")]
    LengthMismatch {
        froms: usize,
        tos: usize,
        amounts: usize,
    },

    #[error("batch of {len} entries exceeds the limit of {max}")]
    BatchTooLarge { len: usize, max: usize },

    #[error("approval count overflow")]
    CountOverflow,

    #[error("registry {0} is already bound")]
    AlreadyBound(RegistryId),

    #[error("registry {0} is not bound")]
    NotBound(RegistryId),

    #[error("snapshot hash does not match its entries")]
    SnapshotCorrupt,

    #[error("unsupported snapshot version {0}")]
    SnapshotVersion(u32),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("config error: {0}")]
    Config(String),
}
