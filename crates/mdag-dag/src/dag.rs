//! Node-level access to a block store.
//!
//! [`MerkleDag`] is a thin layer over [`BlockService`]: `put` encodes a node
//! and stores the resulting block; `get` fetches a block (verified against
//! its identifier by the block service) and decodes it.

use tracing::{debug, warn};

use mdag_crypto::HashFunction;
use mdag_store::BlockService;
use mdag_types::Cid;

use crate::codec;
use crate::error::{DagError, DagResult};
use crate::node::{DagNode, Node};

/// Stores and resolves merkle DAG nodes.
///
/// Holds no state besides the block service handle. Clones share the store.
#[derive(Clone, Debug)]
pub struct MerkleDag {
    blocks: BlockService,
}

impl MerkleDag {
    /// A DAG over `blocks`.
    pub fn new(blocks: BlockService) -> Self {
        Self { blocks }
    }

    /// A DAG over a fresh in-memory store.
    pub fn in_memory() -> Self {
        Self::new(BlockService::in_memory())
    }

    /// The underlying block service.
    pub fn blocks(&self) -> &BlockService {
        &self.blocks
    }

    /// Encode and store `node` with the block service's hash function.
    pub fn put(&self, node: Node) -> DagResult<DagNode> {
        self.put_with(self.blocks.hash_function(), node)
    }

    /// Encode and store `node`, hashing with `hash`.
    ///
    /// Every link of `node` must already point at a stored node; this is
    /// what keeps construction bottom-up. It is not checked here, since
    /// doing so would cost one store lookup per link.
    pub fn put_with(&self, hash: HashFunction, node: Node) -> DagResult<DagNode> {
        let bytes = codec::encode(&node)?;
        let cid = self.blocks.put_with(hash, &bytes)?;
        debug!(
            cid = %cid.short(),
            payload = node.data.len(),
            links = node.links.len(),
            "stored node"
        );
        Ok(DagNode::new(cid, node, bytes.len()))
    }

    /// Fetch, verify, and decode the node stored under `cid`.
    pub fn get(&self, cid: &Cid) -> DagResult<DagNode> {
        let bytes = self.blocks.get(cid)?;
        let node = codec::decode(&bytes).map_err(|e| {
            let reason = match e {
                DagError::Malformed(reason) => reason,
                other => other.to_string(),
            };
            warn!(cid = %cid, %reason, "stored block is not a node");
            DagError::Decode { cid: *cid, reason }
        })?;
        Ok(DagNode::new(*cid, node, bytes.len()))
    }

    /// Check whether a node is stored under `cid`.
    pub fn has(&self, cid: &Cid) -> DagResult<bool> {
        Ok(self.blocks.has(cid)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Link;
    use mdag_store::StoreError;

    #[test]
    fn put_then_get() {
        let dag = MerkleDag::in_memory();
        let stored = dag.put(Node::leaf(b"leaf".to_vec())).unwrap();
        let fetched = dag.get(&stored.cid()).unwrap();
        assert_eq!(fetched, stored);
        assert_eq!(fetched.data(), b"leaf");
        assert!(dag.has(&stored.cid()).unwrap());
    }

    #[test]
    fn identifier_covers_links() {
        let dag = MerkleDag::in_memory();
        let a = dag.put(Node::leaf(b"a".to_vec())).unwrap();
        let b = dag.put(Node::leaf(b"b".to_vec())).unwrap();

        let ab = dag
            .put(Node::with_links(Vec::new(), vec![a.to_link(), b.to_link()]))
            .unwrap();
        let ba = dag
            .put(Node::with_links(Vec::new(), vec![b.to_link(), a.to_link()]))
            .unwrap();
        assert_ne!(ab.cid(), ba.cid());
        assert_eq!(ab.total_size(), 2);

        let fetched = dag.get(&ab.cid()).unwrap();
        assert_eq!(fetched.links()[0].cid, a.cid());
        assert_eq!(fetched.links()[1].cid, b.cid());
    }

    #[test]
    fn identical_nodes_share_identifier() {
        let dag = MerkleDag::in_memory();
        let node = Node::with_links(b"x".to_vec(), vec![Link::new(HashFunction::Sha2_256.cid(b"c"), 3)]);
        assert_eq!(dag.put(node.clone()).unwrap().cid(), dag.put(node).unwrap().cid());
    }

    #[test]
    fn block_size_is_encoded_length() {
        let dag = MerkleDag::in_memory();
        let stored = dag.put(Node::leaf(vec![0; 100])).unwrap();
        assert_eq!(stored.block_size(), 116);
        assert_eq!(dag.get(&stored.cid()).unwrap().block_size(), 116);
    }

    #[test]
    fn missing_node_is_not_found() {
        let dag = MerkleDag::in_memory();
        let cid = HashFunction::Sha2_256.cid(b"never stored");
        assert!(matches!(
            dag.get(&cid),
            Err(DagError::Store(StoreError::NotFound(c))) if c == cid
        ));
    }

    #[test]
    fn tampered_node_is_corrupt() {
        let dag = MerkleDag::in_memory();
        let stored = dag.put(Node::leaf(b"genuine".to_vec())).unwrap();
        let store = dag.blocks().store();
        store.delete(&stored.cid()).unwrap();
        store
            .put(&stored.cid(), &codec::encode(&Node::leaf(b"forged".to_vec())).unwrap())
            .unwrap();
        assert!(matches!(
            dag.get(&stored.cid()),
            Err(DagError::Store(StoreError::CorruptData { .. }))
        ));
    }

    #[test]
    fn non_node_block_fails_to_decode() {
        let dag = MerkleDag::in_memory();
        let cid = dag.blocks().put(b"raw bytes, not a node").unwrap();
        match dag.get(&cid) {
            Err(DagError::Decode { cid: bad, .. }) => assert_eq!(bad, cid),
            other => panic!("expected Decode, got {other:?}"),
        }
    }

    #[test]
    fn explicit_hash_function() {
        let dag = MerkleDag::in_memory();
        let stored = dag
            .put_with(HashFunction::Blake3, Node::leaf(b"b3".to_vec()))
            .unwrap();
        assert_eq!(stored.cid().multihash().code(), HashFunction::Blake3.code());
        assert_eq!(dag.get(&stored.cid()).unwrap().data(), b"b3");
    }
}
