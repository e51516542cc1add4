use std::sync::Arc;

use mdag_crypto::HashFunction;
use mdag_types::Cid;
use tracing::{debug, error};

use crate::error::{StoreError, StoreResult};
use crate::memory::InMemoryBlockStore;
use crate::traits::BlockStore;

/// Verifying adapter over a [`BlockStore`] engine.
///
/// `BlockService` is the single place identifiers are checked: `put` derives
/// the identifier from the bytes, and `get` re-hashes whatever the engine
/// returns before handing it out. Cloning is cheap; clones share the engine.
#[derive(Clone)]
pub struct BlockService {
    store: Arc<dyn BlockStore>,
    hash: HashFunction,
}

impl BlockService {
    /// Wrap an engine, hashing new blocks with the default function.
    pub fn new(store: Arc<dyn BlockStore>) -> Self {
        Self::with_hash(store, HashFunction::default())
    }

    /// Wrap an engine, hashing new blocks with `hash`.
    pub fn with_hash(store: Arc<dyn BlockStore>, hash: HashFunction) -> Self {
        Self { store, hash }
    }

    /// A service over a fresh [`InMemoryBlockStore`].
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryBlockStore::new()))
    }

    /// Hash function used by [`put`](Self::put).
    pub fn hash_function(&self) -> HashFunction {
        self.hash
    }

    /// The underlying engine, bypassing verification.
    pub fn store(&self) -> &Arc<dyn BlockStore> {
        &self.store
    }

    /// Store `data` and return its identifier.
    pub fn put(&self, data: &[u8]) -> StoreResult<Cid> {
        self.put_with(self.hash, data)
    }

    /// Store `data` hashed with `hash` and return its identifier.
    pub fn put_with(&self, hash: HashFunction, data: &[u8]) -> StoreResult<Cid> {
        let cid = hash.cid(data);
        self.store.put(&cid, data)?;
        debug!(cid = %cid.short(), size = data.len(), "put block");
        Ok(cid)
    }

    /// Fetch a block, verifying that it hashes to `cid`.
    ///
    /// Fails with [`StoreError::NotFound`] if the engine has no such block
    /// and [`StoreError::CorruptData`] if the bytes do not match.
    pub fn get(&self, cid: &Cid) -> StoreResult<Vec<u8>> {
        let data = self.store.get(cid)?.ok_or(StoreError::NotFound(*cid))?;
        if !HashFunction::verify(&data, cid.multihash())? {
            let computed = HashFunction::from_code(cid.multihash().code())
                .unwrap_or(self.hash)
                .cid(&data);
            error!(expected = %cid, actual = %computed, "block corruption detected on read");
            return Err(StoreError::CorruptData {
                cid: *cid,
                computed,
            });
        }
        Ok(data)
    }

    /// Check whether a block exists, without reading or verifying it.
    pub fn has(&self, cid: &Cid) -> StoreResult<bool> {
        self.store.has(cid)
    }
}

impl std::fmt::Debug for BlockService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockService")
            .field("hash", &self.hash)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::FsBlockStore;
    use mdag_types::Multihash;

    #[test]
    fn put_then_get() {
        let blocks = BlockService::in_memory();
        let cid = blocks.put(b"verified content").unwrap();
        assert_eq!(blocks.get(&cid).unwrap(), b"verified content");
        assert!(blocks.has(&cid).unwrap());
    }

    #[test]
    fn identifier_depends_only_on_content() {
        let a = BlockService::in_memory();
        let b = BlockService::in_memory();
        assert_eq!(a.put(b"same").unwrap(), b.put(b"same").unwrap());
        assert_ne!(a.put(b"same").unwrap(), a.put(b"different").unwrap());
    }

    #[test]
    fn hash_function_is_recorded_in_identifier() {
        let blocks = BlockService::with_hash(Arc::new(InMemoryBlockStore::new()), HashFunction::Blake3);
        let cid = blocks.put(b"blake").unwrap();
        assert_eq!(cid.multihash().code(), HashFunction::Blake3.code());
        // a sha2-256 block in the same store still verifies
        let other = blocks.put_with(HashFunction::Sha2_256, b"sha").unwrap();
        assert_eq!(blocks.get(&other).unwrap(), b"sha");
        assert_eq!(blocks.get(&cid).unwrap(), b"blake");
    }

    #[test]
    fn missing_block_is_not_found() {
        let blocks = BlockService::in_memory();
        let cid = HashFunction::Sha2_256.cid(b"never stored");
        assert!(matches!(blocks.get(&cid), Err(StoreError::NotFound(c)) if c == cid));
    }

    #[test]
    fn tampered_block_is_corrupt() {
        let blocks = BlockService::in_memory();
        let cid = blocks.put(b"original bytes").unwrap();

        blocks.store().delete(&cid).unwrap();
        blocks.store().put(&cid, b"tampered bytes").unwrap();

        match blocks.get(&cid) {
            Err(StoreError::CorruptData { cid: bad, computed }) => {
                assert_eq!(bad, cid);
                assert_eq!(computed, HashFunction::Sha2_256.cid(b"tampered bytes"));
            }
            other => panic!("expected CorruptData, got {other:?}"),
        }
    }

    #[test]
    fn tampered_file_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let engine = Arc::new(FsBlockStore::open(dir.path()).unwrap());
        let blocks = BlockService::new(engine.clone());
        let cid = blocks.put(b"on disk").unwrap();

        std::fs::write(engine.block_path(&cid), b"flipped").unwrap();
        assert!(matches!(blocks.get(&cid), Err(StoreError::CorruptData { .. })));
    }

    #[test]
    fn unknown_hash_code_cannot_be_verified() {
        let blocks = BlockService::in_memory();
        let cid = Cid::new(Multihash::wrap(0x99, &[1, 2, 3]).unwrap());
        blocks.store().put(&cid, b"opaque").unwrap();
        assert!(matches!(blocks.get(&cid), Err(StoreError::Hash(_))));
    }

    #[test]
    fn clones_share_the_engine() {
        let blocks = BlockService::in_memory();
        let clone = blocks.clone();
        let cid = blocks.put(b"shared").unwrap();
        assert_eq!(clone.get(&cid).unwrap(), b"shared");
    }

    #[test]
    fn debug_shows_hash() {
        let debug = format!("{:?}", BlockService::in_memory());
        assert!(debug.contains("Sha2_256"));
    }
}
