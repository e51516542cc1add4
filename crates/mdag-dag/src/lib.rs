//! Merkle DAG nodes for mdag.
//!
//! A [`Node`] is an opaque payload plus an ordered list of [`Link`]s to
//! child nodes. Nodes are serialized by [`codec`] and stored as blocks, so a
//! node's identifier covers its payload *and* the identifiers of every child.
//! [`MerkleDag`] puts and gets whole nodes through a
//! [`BlockService`](mdag_store::BlockService), returning [`DagNode`]
//! snapshots that pair a node with its identifier.

pub mod codec;
pub mod dag;
pub mod error;
pub mod node;

pub use dag::MerkleDag;
pub use error::{DagError, DagResult};
pub use node::{DagNode, Link, Node};
