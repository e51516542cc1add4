use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::{debug, info, warn};

use mdag_dag::{DagNode, Link, MerkleDag, Node};
use mdag_types::Cid;

use crate::error::{UnixfsError, UnixfsResult};

/// Reassemble the byte stream rooted at `root` into `sink`.
///
/// Nodes are visited depth-first: a node's payload is written, then each
/// linked subtree in link order. Every block is verified against its
/// identifier as it is fetched, and every link's cached size is checked
/// against what its subtree actually produced.
///
/// The walk keeps an explicit stack, so DAG depth is bounded by memory
/// rather than by the thread's stack. A payload is dropped as soon as it is
/// written; only the pending links of the nodes on the current path are
/// retained.
///
/// Returns the number of bytes written. On error the sink may already hold
/// a prefix of the stream.
pub fn export<W: Write + ?Sized>(dag: &MerkleDag, root: &Cid, sink: &mut W) -> UnixfsResult<u64> {
    let mut stack = vec![enter(dag, *root, None, sink)?];
    let mut total = 0;

    while let Some(mut frame) = stack.pop() {
        if let Some(link) = frame.links.next() {
            let child = enter(dag, link.cid, Some(link), sink)?;
            stack.push(frame);
            stack.push(child);
            continue;
        }

        if let Some(link) = &frame.via {
            if frame.written != link.size {
                let parent = stack.last().map(|p| p.cid.short()).unwrap_or_default();
                warn!(%parent, child = %link.cid, expected = link.size, actual = frame.written, "link size mismatch");
                return Err(UnixfsError::SizeMismatch {
                    cid: link.cid,
                    expected: link.size,
                    actual: frame.written,
                });
            }
        }
        match stack.last_mut() {
            Some(parent) => parent.written += frame.written,
            None => total = frame.written,
        }
    }

    debug!(cid = %root.short(), bytes = total, "exported");
    Ok(total)
}

/// Fetch, verify, and decode a single node.
///
/// Same as [`MerkleDag::get`] with errors in the import/export vocabulary,
/// so a missing block is [`UnixfsError::NotFound`] and a tampered one is
/// [`UnixfsError::CorruptData`].
pub fn dag_get(dag: &MerkleDag, cid: &Cid) -> UnixfsResult<DagNode> {
    Ok(dag.get(cid)?)
}

/// A node on the current export path.
struct Frame {
    cid: Cid,
    /// Links not yet exported.
    links: std::vec::IntoIter<Link>,
    /// The link this node was reached through; `None` for the root.
    via: Option<Link>,
    /// Bytes produced so far by this node and its finished children.
    written: u64,
}

/// Fetch `cid`, write its payload, and return its frame.
fn enter<W: Write + ?Sized>(
    dag: &MerkleDag,
    cid: Cid,
    via: Option<Link>,
    sink: &mut W,
) -> UnixfsResult<Frame> {
    let Node { data, links } = dag_get(dag, &cid)?.into_node();
    sink.write_all(&data)?;
    Ok(Frame {
        cid,
        links: links.into_iter(),
        via,
        written: data.len() as u64,
    })
}

/// Export the stream whose root has text identifier `root` into a file at
/// `path`, creating or truncating it.
///
/// The identifier is parsed before the file is touched, so a malformed one
/// leaves the filesystem unchanged.
pub fn export_to_file(dag: &MerkleDag, root: &str, path: impl AsRef<Path>) -> UnixfsResult<u64> {
    let cid: Cid = root.parse()?;
    let path = path.as_ref();
    let mut out = BufWriter::new(File::create(path)?);
    let written = export(dag, &cid, &mut out)?;
    out.flush()?;
    info!(cid = %cid, path = %path.display(), bytes = written, "exported to file");
    Ok(written)
}
