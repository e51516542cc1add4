use mdag_dag::DagError;
use mdag_store::StoreError;
use mdag_types::{Cid, TypeError};
use thiserror::Error;

/// Errors from import and export.
///
/// Lower-level failures are flattened into these kinds so callers can match
/// on [`NotFound`](Self::NotFound) or [`CorruptData`](Self::CorruptData)
/// without digging through nested sources. Nothing is retried internally.
#[derive(Debug, Error)]
pub enum UnixfsError {
    /// Reading the source or writing the sink failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A referenced block is not in the store.
    #[error("block not found: {0}")]
    NotFound(Cid),

    /// A block does not hash to the identifier it was fetched by.
    #[error("corrupt block {cid}: content hashes to {computed}")]
    CorruptData { cid: Cid, computed: Cid },

    /// The block store failed for a reason other than a missing or corrupt block.
    #[error("storage error: {0}")]
    Storage(String),

    /// An identifier could not be parsed from its text form.
    #[error("invalid identifier: {0}")]
    Encoding(#[from] TypeError),

    /// A verified block is not a valid node.
    #[error("malformed node: {0}")]
    Decode(String),

    /// A subtree produced a different number of bytes than its link claims.
    #[error("size mismatch under {cid}: link says {expected} bytes, subtree has {actual}")]
    SizeMismatch { cid: Cid, expected: u64, actual: u64 },

    /// The import configuration is unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<StoreError> for UnixfsError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(cid) => Self::NotFound(cid),
            StoreError::CorruptData { cid, computed } => Self::CorruptData { cid, computed },
            other => Self::Storage(other.to_string()),
        }
    }
}

impl From<DagError> for UnixfsError {
    fn from(e: DagError) -> Self {
        match e {
            DagError::Store(e) => e.into(),
            DagError::Decode { cid, reason } => Self::Decode(format!("{cid}: {reason}")),
            DagError::Malformed(reason) => Self::Decode(reason),
            DagError::Encode(reason) => Self::Storage(reason),
        }
    }
}

/// Result alias for import and export.
pub type UnixfsResult<T> = Result<T, UnixfsError>;
