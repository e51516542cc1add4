//! File-backed block storage engine.
//!
//! One file per block, under a two-level fan-out keyed on the digest:
//! `{root}/{digest[0..2]}/{digest[2..4]}/{multihash hex}`. The fan-out uses
//! the digest rather than the full multihash because every block hashed with
//! the same function shares the multihash prefix.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use mdag_types::Cid;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::StoreResult;
use crate::traits::BlockStore;

/// Block store that keeps each block in its own file.
///
/// Writes go to a temporary file in the destination directory, which is
/// then renamed into place. A reader therefore sees either the whole block
/// or nothing, and two writers racing on the same block both leave a
/// complete file behind.
#[derive(Debug, Clone)]
pub struct FsBlockStore {
    root: PathBuf,
    sync: bool,
}

impl FsBlockStore {
    /// Open (creating if needed) a store rooted at `root`.
    pub fn open(root: impl AsRef<Path>) -> StoreResult<Self> {
        let root = root.as_ref().to_path_buf();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root, sync: false })
    }

    /// `fsync` every block before it is renamed into place.
    pub fn with_sync(mut self, sync: bool) -> Self {
        self.sync = sync;
        self
    }

    /// Root directory of the store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file holding `cid`.
    pub fn block_path(&self, cid: &Cid) -> PathBuf {
        let digest = hex::encode(cid.multihash().digest());
        let name = hex::encode(cid.to_bytes());
        let (a, b) = match digest.len() {
            0..=1 => ("00", "00"),
            2..=3 => (&digest[0..2], "00"),
            _ => (&digest[0..2], &digest[2..4]),
        };
        self.root.join(a).join(b).join(name)
    }
}

impl BlockStore for FsBlockStore {
    fn get(&self, cid: &Cid) -> StoreResult<Option<Vec<u8>>> {
        match std::fs::read(self.block_path(cid)) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn put(&self, cid: &Cid, data: &[u8]) -> StoreResult<()> {
        let path = self.block_path(cid);
        if path.is_file() {
            return Ok(());
        }
        let dir = path.parent().unwrap_or(&self.root);
        std::fs::create_dir_all(dir)?;

        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(data)?;
        if self.sync {
            tmp.as_file().sync_all()?;
        }
        tmp.persist(&path).map_err(|e| e.error)?;

        debug!(cid = %cid.short(), size = data.len(), "stored block file");
        Ok(())
    }

    fn has(&self, cid: &Cid) -> StoreResult<bool> {
        match std::fs::metadata(self.block_path(cid)) {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn delete(&self, cid: &Cid) -> StoreResult<bool> {
        match std::fs::remove_file(self.block_path(cid)) {
            Ok(()) => {
                debug!(cid = %cid.short(), "deleted block file");
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
