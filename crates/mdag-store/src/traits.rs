use mdag_types::Cid;

use crate::error::StoreResult;

/// Raw block persistence engine.
///
/// All implementations must satisfy these invariants:
/// - `put` is idempotent: writing an identifier that already exists is a no-op.
/// - `put` is atomic from the caller's perspective, even when two threads
///   write the same identifier at once.
/// - The engine never hashes or interprets block contents. Verification is
///   the job of [`BlockService`](crate::BlockService).
/// - All I/O errors are propagated, never silently ignored.
pub trait BlockStore: Send + Sync {
    /// Read a block.
    ///
    /// Returns `Ok(None)` if the block does not exist.
    fn get(&self, cid: &Cid) -> StoreResult<Option<Vec<u8>>>;

    /// Store `data` under `cid`.
    fn put(&self, cid: &Cid, data: &[u8]) -> StoreResult<()>;

    /// Check whether a block exists.
    fn has(&self, cid: &Cid) -> StoreResult<bool>;

    /// Delete a block. Returns `true` if the block existed.
    ///
    /// Deleting a block that is still linked from elsewhere leaves a
    /// dangling reference behind.
    fn delete(&self, cid: &Cid) -> StoreResult<bool>;
}
