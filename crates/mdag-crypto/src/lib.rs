//! Hashing for mdag.
//!
//! [`HashFunction`] turns bytes into a [`Multihash`](mdag_types::Multihash)
//! and checks bytes against one. Digest computation is delegated to the
//! `sha2` and `blake3` crates; nothing here implements a hash by hand.

pub mod hasher;

pub use hasher::{HashFunction, HasherError, HasherResult};
