//! Foundation types for mdag.
//!
//! Every block in an mdag store is addressed by the hash of its bytes. This
//! crate defines how such a hash is represented and exchanged:
//!
//! - [`Multihash`]: a digest tagged with the hash function that produced it
//!   and its length, so identifiers stay self-describing when new hash
//!   functions are added.
//! - [`Cid`]: the content identifier of a block. Binary form is the
//!   multihash bytes; text form is base58btc of those bytes.
//!
//! Hashing itself lives in `mdag-crypto`; this crate only encodes and parses.

pub mod cid;
pub mod error;
pub mod multihash;

pub use cid::Cid;
pub use error::{TypeError, TypeResult};
pub use multihash::{codes, Multihash, MAX_DIGEST_LEN};
