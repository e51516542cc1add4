//! File import and export for mdag.
//!
//! Importing turns a byte stream into a merkle DAG:
//!
//! 1. [`Chunker`] splits the stream into fixed-size chunks.
//! 2. [`DagBuilder`] stores each chunk as a node and links the nodes under a
//!    root, bottom-up, persisting each node as soon as its identifier is known.
//! 3. [`import`] / [`import_file`] drive the two and return the root.
//!
//! Exporting ([`export`] / [`export_to_file`]) walks the DAG from the root,
//! payload first and then each link in order, writing straight into a sink.
//! Every block is verified against its identifier on the way.
//!
//! All operations take an explicit [`MerkleDag`] handle; there is no global
//! repository.

pub mod builder;
pub mod chunker;
pub mod config;
pub mod error;
pub mod exporter;
pub mod importer;

pub use builder::DagBuilder;
pub use chunker::Chunker;
pub use config::{ImportConfig, Layout, DEFAULT_CHUNK_SIZE, DEFAULT_MAX_LINKS, MAX_CHUNK_SIZE};
pub use error::{UnixfsError, UnixfsResult};
pub use exporter::{dag_get, export, export_to_file};
pub use importer::{import, import_file};

pub use mdag_dag::{DagNode, Link, MerkleDag, Node};
