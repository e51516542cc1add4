//! Node and link types of the merkle DAG.
//!
//! A [`Node`] never carries its own identifier: the identifier is the hash
//! of the node's encoded bytes and is computed when the node is stored.
//! [`DagNode`] is the snapshot type that pairs the two once that has
//! happened.

use serde::{Deserialize, Serialize};

use mdag_types::Cid;

/// A reference from a parent node to a child node.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Link {
    /// Optional label. Empty for file chunks.
    pub name: String,
    /// Identifier of the child node.
    pub cid: Cid,
    /// The child's total size: its payload plus everything it links to.
    pub size: u64,
}

impl Link {
    /// An unnamed link.
    pub fn new(cid: Cid, size: u64) -> Self {
        Self {
            name: String::new(),
            cid,
            size,
        }
    }

    /// A labelled link.
    pub fn named(name: impl Into<String>, cid: Cid, size: u64) -> Self {
        Self {
            name: name.into(),
            cid,
            size,
        }
    }
}

/// A vertex of the merkle DAG: payload bytes plus ordered child links.
///
/// Link order is significant. Reassembling a byte stream emits a node's
/// payload first, then each linked subtree in link order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Node {
    /// Opaque payload. Empty for pure index nodes.
    pub data: Vec<u8>,
    /// Ordered references to child nodes.
    pub links: Vec<Link>,
}

impl Node {
    /// A leaf node holding `data`.
    pub fn leaf(data: Vec<u8>) -> Self {
        Self {
            data,
            links: Vec::new(),
        }
    }

    /// A node with both payload and links.
    pub fn with_links(data: Vec<u8>, links: Vec<Link>) -> Self {
        Self { data, links }
    }

    /// The empty node: no payload, no links.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns `true` if this node has no links.
    pub fn is_leaf(&self) -> bool {
        self.links.is_empty()
    }

    /// Payload length plus the cached size of every link.
    pub fn total_size(&self) -> u64 {
        self.data.len() as u64 + self.links.iter().map(|l| l.size).sum::<u64>()
    }

    /// Identifiers of all children, in link order.
    pub fn link_cids(&self) -> Vec<Cid> {
        self.links.iter().map(|l| l.cid).collect()
    }
}

/// A node together with the identifier it is stored under.
///
/// `DagNode` is a short-lived snapshot: it is produced by storing a node or
/// fetching one, read, and dropped. It is never modified after creation;
/// changing a node means building a new one and storing that.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DagNode {
    cid: Cid,
    node: Node,
    block_size: usize,
}

impl DagNode {
    pub(crate) fn new(cid: Cid, node: Node, block_size: usize) -> Self {
        Self {
            cid,
            node,
            block_size,
        }
    }

    /// Identifier of the node.
    pub fn cid(&self) -> Cid {
        self.cid
    }

    /// The node itself.
    pub fn node(&self) -> &Node {
        &self.node
    }

    /// The node's payload.
    pub fn data(&self) -> &[u8] {
        &self.node.data
    }

    /// The node's links.
    pub fn links(&self) -> &[Link] {
        &self.node.links
    }

    /// See [`Node::total_size`].
    pub fn total_size(&self) -> u64 {
        self.node.total_size()
    }

    /// Length of the encoded block this node is stored as.
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// A link pointing at this node, for use in a parent.
    pub fn to_link(&self) -> Link {
        Link::new(self.cid, self.total_size())
    }

    /// Discard the identifier and keep the node.
    pub fn into_node(self) -> Node {
        self.node
    }
}
