//! Error types for node-level DAG operations.

use mdag_store::StoreError;
use mdag_types::Cid;

/// Errors that can occur during DAG operations.
#[derive(Debug, thiserror::Error)]
pub enum DagError {
    /// Failure in the block layer (missing block, corruption, I/O).
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A block verified against its identifier but is not a valid node.
    #[error("block {cid} is not a valid node: {reason}")]
    Decode {
        /// The block that failed to decode.
        cid: Cid,
        /// What the decoder rejected.
        reason: String,
    },

    /// Bytes that are not a valid node, outside of any block lookup.
    #[error("malformed node: {0}")]
    Malformed(String),

    /// A node could not be serialized.
    #[error("node encoding failed: {0}")]
    Encode(String),
}

/// Convenience alias for DAG results.
pub type DagResult<T> = Result<T, DagError>;
