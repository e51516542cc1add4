use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{TypeError, TypeResult};
use crate::multihash::Multihash;

/// Content identifier of a block.
///
/// A `Cid` is the multihash of a block's serialized bytes. Identical bytes
/// always produce the same `Cid`, which makes blocks deduplicatable and
/// verifiable on read. The text form is base58btc of the multihash bytes
/// (a SHA2-256 identifier therefore starts with `Qm`).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cid(Multihash);

impl Cid {
    /// Wrap a multihash.
    pub const fn new(multihash: Multihash) -> Self {
        Self(multihash)
    }

    /// The underlying multihash.
    pub fn multihash(&self) -> &Multihash {
        &self.0
    }

    /// Binary form: the multihash bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.0.to_bytes()
    }

    /// Parse the binary form.
    pub fn from_bytes(bytes: &[u8]) -> TypeResult<Self> {
        Multihash::from_bytes(bytes).map(Self)
    }

    /// Base58btc text form.
    pub fn to_base58(&self) -> String {
        bs58::encode(self.to_bytes()).into_string()
    }

    /// Parse the base58btc text form.
    pub fn from_base58(s: &str) -> TypeResult<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(TypeError::Empty);
        }
        let bytes = bs58::decode(s)
            .into_vec()
            .map_err(|e| TypeError::InvalidBase58(e.to_string()))?;
        Self::from_bytes(&bytes)
    }

    /// Last eight characters of the text form, for log lines.
    pub fn short(&self) -> String {
        let text = self.to_base58();
        let start = text.len().saturating_sub(8);
        text[start..].to_string()
    }
}

impl fmt::Debug for Cid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cid({})", self.to_base58())
    }
}

impl fmt::Display for Cid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base58())
    }
}

impl FromStr for Cid {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_base58(s)
    }
}

impl From<Multihash> for Cid {
    fn from(multihash: Multihash) -> Self {
        Self(multihash)
    }
}

impl Serialize for Cid {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Cid {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
