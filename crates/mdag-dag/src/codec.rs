//! Binary block encoding of [`Node`]s.
//!
//! Layout (bincode, fixed-width little-endian integers):
//!
//! ```text
//! [u64: payload length][payload bytes]
//! [u64: link count]
//! per link:
//!   [u64: multihash length][multihash bytes]
//!   [u64: name length][name, UTF-8]
//!   [u64: size]
//! ```
//!
//! Node identifiers are hashes of exactly these bytes, so the layout must
//! not change without changing every identifier with it.

use bincode::Options;
use serde::{Deserialize, Serialize};

use mdag_types::Cid;

use crate::error::{DagError, DagResult};
use crate::node::{Link, Node};

#[derive(Serialize)]
struct WireNodeRef<'a> {
    #[serde(with = "serde_bytes")]
    data: &'a [u8],
    links: Vec<WireLinkRef<'a>>,
}

#[derive(Serialize)]
struct WireLinkRef<'a> {
    #[serde(with = "serde_bytes")]
    hash: Vec<u8>,
    name: &'a str,
    size: u64,
}

#[derive(Deserialize)]
struct WireNode {
    #[serde(with = "serde_bytes")]
    data: Vec<u8>,
    links: Vec<WireLink>,
}

#[derive(Deserialize)]
struct WireLink {
    #[serde(with = "serde_bytes")]
    hash: Vec<u8>,
    name: String,
    size: u64,
}

fn options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .with_little_endian()
        .reject_trailing_bytes()
}

/// Serialize a node into its block bytes.
pub fn encode(node: &Node) -> DagResult<Vec<u8>> {
    let wire = WireNodeRef {
        data: &node.data,
        links: node
            .links
            .iter()
            .map(|l| WireLinkRef {
                hash: l.cid.to_bytes(),
                name: &l.name,
                size: l.size,
            })
            .collect(),
    };
    options()
        .serialize(&wire)
        .map_err(|e| DagError::Encode(e.to_string()))
}

/// Parse block bytes back into a node.
///
/// Rejects truncated input, trailing bytes, invalid UTF-8 in link names,
/// malformed link identifiers, and link sizes whose sum overflows `u64`.
pub fn decode(bytes: &[u8]) -> DagResult<Node> {
    let wire: WireNode = options()
        .deserialize(bytes)
        .map_err(|e| DagError::Malformed(e.to_string()))?;

    let mut total = wire.data.len() as u64;
    let mut links = Vec::with_capacity(wire.links.len());
    for (i, l) in wire.links.into_iter().enumerate() {
        let cid = Cid::from_bytes(&l.hash)
            .map_err(|e| DagError::Malformed(format!("link {i}: {e}")))?;
        total = total
            .checked_add(l.size)
            .ok_or_else(|| DagError::Malformed(format!("link {i}: total size overflows")))?;
        links.push(Link {
            name: l.name,
            cid,
            size: l.size,
        });
    }

    Ok(Node {
        data: wire.data,
        links,
    })
}
