use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use tracing::info;

use mdag_dag::{DagNode, MerkleDag};

use crate::builder::DagBuilder;
use crate::chunker::Chunker;
use crate::config::ImportConfig;
use crate::error::UnixfsResult;

/// Chunk `reader` and store it in `dag` as a merkle DAG, returning the root.
///
/// The root identifies the whole stream: the same bytes imported with the
/// same configuration always produce the same root, whatever store they
/// land in. At most one chunk is held in memory at a time.
///
/// On error nothing is rolled back. Nodes stored before the failure stay in
/// the store, unreferenced by any root.
pub fn import<R: Read>(dag: &MerkleDag, reader: R, config: &ImportConfig) -> UnixfsResult<DagNode> {
    config.validate()?;
    let chunker = Chunker::new(reader, config.chunk_size)?;
    let mut builder = DagBuilder::new(dag, config);
    for chunk in chunker {
        builder.push_chunk(chunk?)?;
    }
    let root = builder.finish()?;
    info!(
        cid = %root.cid(),
        size = root.total_size(),
        hash = %config.hash,
        "imported"
    );
    Ok(root)
}

/// Import the file at `path`.
pub fn import_file(dag: &MerkleDag, path: impl AsRef<Path>, config: &ImportConfig) -> UnixfsResult<DagNode> {
    let path = path.as_ref();
    let file = File::open(path)?;
    info!(path = %path.display(), "importing file");
    import(dag, BufReader::new(file), config)
}
