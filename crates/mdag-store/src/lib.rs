//! Content-addressed block storage for mdag.
//!
//! Two layers live here:
//!
//! - [`BlockStore`] is the raw persistence engine: put bytes under an
//!   identifier, get them back. Engines never hash or interpret data.
//!   [`InMemoryBlockStore`] and [`FsBlockStore`] are the bundled engines.
//! - [`BlockService`] is the adapter everything else talks to. It computes
//!   identifiers on write and re-hashes on every read, so a tampered or
//!   corrupted block is reported as [`StoreError::CorruptData`] instead of
//!   being handed to a caller.
//!
//! # Design Rules
//!
//! 1. Blocks are immutable once written; writing an existing identifier is a no-op.
//! 2. A block is either fully visible or not visible. No half-written reads.
//! 3. Engines are `Send + Sync` and safe under concurrent put/get.
//! 4. All I/O errors are propagated, never silently ignored.

pub mod blocks;
pub mod error;
pub mod fs;
pub mod memory;
pub mod traits;

pub use blocks::BlockService;
pub use error::{StoreError, StoreResult};
pub use fs::FsBlockStore;
pub use memory::InMemoryBlockStore;
pub use traits::BlockStore;
