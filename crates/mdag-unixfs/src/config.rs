use std::path::Path;

use serde::{Deserialize, Serialize};

use mdag_crypto::HashFunction;

use crate::error::{UnixfsError, UnixfsResult};

/// Default chunk size: 256 KiB.
pub const DEFAULT_CHUNK_SIZE: usize = 256 * 1024;

/// Largest accepted chunk size: 1 MiB. A chunk becomes a single block, and
/// larger blocks are not portable between stores.
pub const MAX_CHUNK_SIZE: usize = 1024 * 1024;

/// Default fan-out of a [`Layout::Balanced`] index node.
pub const DEFAULT_MAX_LINKS: usize = 174;

/// Shape of the DAG built over a file's chunks.
///
/// Both layouts put the first chunk in the root's payload and keep chunk
/// order in link order, so export does not need to know which was used.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Layout {
    /// Every chunk after the first is linked directly from the root.
    #[default]
    Flat,
    /// Chunks are grouped under index nodes of at most `max_links` links,
    /// level by level, so no node has more than `max_links` children.
    Balanced { max_links: usize },
}

impl Layout {
    /// A balanced layout with the default fan-out.
    pub fn balanced() -> Self {
        Self::Balanced {
            max_links: DEFAULT_MAX_LINKS,
        }
    }
}

/// Settings for [`import`](crate::import).
///
/// Missing fields take their defaults when loaded from TOML:
///
/// ```toml
/// chunk_size = 262144
/// hash = "sha2-256"
///
/// [layout]
/// kind = "balanced"
/// max_links = 174
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Size of every chunk except possibly the last, in bytes.
    pub chunk_size: usize,
    /// Hash function for node identifiers.
    pub hash: HashFunction,
    /// DAG shape.
    pub layout: Layout,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            hash: HashFunction::default(),
            layout: Layout::default(),
        }
    }
}

impl ImportConfig {
    /// Set the chunk size.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Set the hash function.
    pub fn with_hash(mut self, hash: HashFunction) -> Self {
        self.hash = hash;
        self
    }

    /// Set the layout.
    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    /// Reject settings the builder cannot work with.
    pub fn validate(&self) -> UnixfsResult<()> {
        if self.chunk_size == 0 {
            return Err(UnixfsError::InvalidConfig("chunk_size must be positive".into()));
        }
        if self.chunk_size > MAX_CHUNK_SIZE {
            return Err(UnixfsError::InvalidConfig(format!(
                "chunk_size must be at most {MAX_CHUNK_SIZE}, got {}",
                self.chunk_size
            )));
        }
        if let Layout::Balanced { max_links } = self.layout {
            if max_links < 2 {
                return Err(UnixfsError::InvalidConfig(format!(
                    "max_links must be at least 2, got {max_links}"
                )));
            }
        }
        Ok(())
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(s: &str) -> UnixfsResult<Self> {
        let config: Self =
            toml::from_str(s).map_err(|e| UnixfsError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse, and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> UnixfsResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}
