use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use mdag_types::{codes, Cid, Multihash};

/// A hash function that can address blocks.
///
/// The chosen function is recorded in every identifier it produces (as the
/// multihash code), so blocks hashed with different functions can live in
/// the same store and still be verified on read.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HashFunction {
    /// SHA2-256 (multicodec `0x12`).
    #[default]
    #[serde(rename = "sha2-256")]
    Sha2_256,
    /// BLAKE3, 32-byte output (multicodec `0x1e`).
    #[serde(rename = "blake3")]
    Blake3,
}

impl HashFunction {
    /// Multicodec of this function.
    pub const fn code(self) -> u64 {
        match self {
            Self::Sha2_256 => codes::SHA2_256,
            Self::Blake3 => codes::BLAKE3,
        }
    }

    /// Look a function up by multicodec.
    pub fn from_code(code: u64) -> Option<Self> {
        match code {
            codes::SHA2_256 => Some(Self::Sha2_256),
            codes::BLAKE3 => Some(Self::Blake3),
            _ => None,
        }
    }

    /// Canonical name, as accepted by [`FromStr`].
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sha2_256 => "sha2-256",
            Self::Blake3 => "blake3",
        }
    }

    /// Hash `data` into a multihash.
    pub fn digest(self, data: &[u8]) -> Multihash {
        let raw: [u8; 32] = match self {
            Self::Sha2_256 => Sha256::digest(data).into(),
            Self::Blake3 => *blake3::hash(data).as_bytes(),
        };
        Multihash::from_digest32(self.code(), raw)
    }

    /// Content identifier of `data`.
    pub fn cid(self, data: &[u8]) -> Cid {
        Cid::new(self.digest(data))
    }

    /// Check `data` against `expected`, using whichever function `expected`
    /// was produced by.
    pub fn verify(data: &[u8], expected: &Multihash) -> HasherResult<bool> {
        let function = Self::from_code(expected.code())
            .ok_or(HasherError::UnsupportedHash(expected.code()))?;
        Ok(function.digest(data) == *expected)
    }
}

impl fmt::Display for HashFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HashFunction {
    type Err = HasherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sha2-256" | "sha256" => Ok(Self::Sha2_256),
            "blake3" => Ok(Self::Blake3),
            _ => Err(HasherError::UnknownName(s.to_string())),
        }
    }
}

/// Errors from hashing operations.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum HasherError {
    #[error("unsupported hash function code 0x{0:x}")]
    UnsupportedHash(u64),

    #[error("unknown hash function name: {0}")]
    UnknownName(String),
}

/// Result alias for hashing operations.
pub type HasherResult<T> = Result<T, HasherError>;
