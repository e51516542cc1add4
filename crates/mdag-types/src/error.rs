use thiserror::Error;

/// Errors produced while parsing or constructing identifiers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeError {
    #[error("input ended before the multihash was complete")]
    Truncated,

    #[error("{0} unexpected trailing bytes after multihash")]
    TrailingBytes(usize),

    #[error("digest of {len} bytes exceeds the {max}-byte limit")]
    DigestTooLong { len: u64, max: usize },

    #[error("invalid varint: {0}")]
    InvalidVarint(String),

    #[error("invalid base58 identifier: {0}")]
    InvalidBase58(String),

    #[error("empty identifier")]
    Empty,
}

/// Result alias for type operations.
pub type TypeResult<T> = Result<T, TypeError>;
