//! Bottom-up DAG construction from a chunk sequence.
//!
//! The first chunk becomes the root's payload. Every later chunk is stored
//! immediately as a leaf and its link queued at level 0. With
//! [`Layout::Flat`] all leaf links end up on the root. With
//! [`Layout::Balanced`], a level that fills up to `max_links` is flushed
//! into an index node whose link is queued one level higher; on
//! [`finish`](DagBuilder::finish) the partial levels are folded upward and
//! the root links to whatever is left at the top.
//!
//! # Invariants
//!
//! - A node is stored before any node that links to it.
//! - Links at every level appear in chunk order: a level only ever receives
//!   links to content that follows everything already queued there.

use tracing::{debug, trace};

use mdag_crypto::HashFunction;
use mdag_dag::{DagNode, Link, MerkleDag, Node};

use crate::config::{ImportConfig, Layout};
use crate::error::UnixfsResult;

/// Incrementally builds a file DAG, storing nodes as they are completed.
pub struct DagBuilder<'a> {
    dag: &'a MerkleDag,
    hash: HashFunction,
    layout: Layout,
    root_data: Option<Vec<u8>>,
    levels: Vec<Vec<Link>>,
    chunks: u64,
    nodes: u64,
}

impl<'a> DagBuilder<'a> {
    /// A builder storing into `dag` according to `config`.
    ///
    /// `config` is assumed valid; see [`ImportConfig::validate`].
    pub fn new(dag: &'a MerkleDag, config: &ImportConfig) -> Self {
        Self {
            dag,
            hash: config.hash,
            layout: config.layout,
            root_data: None,
            levels: vec![Vec::new()],
            chunks: 0,
            nodes: 0,
        }
    }

    /// Number of chunks consumed so far.
    pub fn chunk_count(&self) -> u64 {
        self.chunks
    }

    /// Add the next chunk of the stream.
    pub fn push_chunk(&mut self, chunk: Vec<u8>) -> UnixfsResult<()> {
        self.chunks += 1;
        if self.root_data.is_none() {
            self.root_data = Some(chunk);
            return Ok(());
        }
        let leaf = self.store(Node::leaf(chunk))?;
        trace!(chunk = self.chunks, cid = %leaf.cid().short(), "stored leaf");
        self.queue(0, leaf.to_link())
    }

    /// Store the root and return it.
    ///
    /// An empty stream yields the empty node as root.
    pub fn finish(mut self) -> UnixfsResult<DagNode> {
        let top = self.levels.len() - 1;
        for level in 0..top {
            let mut links = std::mem::take(&mut self.levels[level]);
            let link = match links.len() {
                0 => continue,
                1 => links.remove(0),
                _ => self.store(Node::with_links(Vec::new(), links))?.to_link(),
            };
            self.levels[level + 1].push(link);
        }

        let links = std::mem::take(&mut self.levels[top]);
        let data = self.root_data.take().unwrap_or_default();
        let root = self.store(Node::with_links(data, links))?;
        debug!(
            cid = %root.cid(),
            chunks = self.chunks,
            nodes = self.nodes,
            depth = top + 1,
            size = root.total_size(),
            "built file DAG"
        );
        Ok(root)
    }

    fn store(&mut self, node: Node) -> UnixfsResult<DagNode> {
        let stored = self.dag.put_with(self.hash, node)?;
        self.nodes += 1;
        Ok(stored)
    }

    fn queue(&mut self, level: usize, link: Link) -> UnixfsResult<()> {
        if level == self.levels.len() {
            self.levels.push(Vec::new());
        }
        self.levels[level].push(link);

        if let Layout::Balanced { max_links } = self.layout {
            if self.levels[level].len() >= max_links {
                let links = std::mem::take(&mut self.levels[level]);
                let index = self.store(Node::with_links(Vec::new(), links))?;
                trace!(level, cid = %index.cid().short(), "flushed index node");
                return self.queue(level + 1, index.to_link());
            }
        }
        Ok(())
    }
}
