use mdag_crypto::HasherError;
use mdag_types::Cid;

/// Errors from block store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The requested block is not in the store.
    #[error("block not found: {0}")]
    NotFound(Cid),

    /// Stored bytes do not hash to the identifier they were requested by.
    #[error("corrupt block {cid}: content hashes to {computed}")]
    CorruptData { cid: Cid, computed: Cid },

    /// I/O error from the underlying storage engine.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Engine-specific failure not attributable to I/O or corruption.
    #[error("storage backend error: {0}")]
    Backend(String),

    /// The identifier names a hash function this build cannot compute.
    #[error(transparent)]
    Hash(#[from] HasherError),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
