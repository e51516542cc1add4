use std::fmt;

use crate::error::{TypeError, TypeResult};

/// Largest digest a [`Multihash`] can carry, in bytes.
pub const MAX_DIGEST_LEN: usize = 64;

/// Multicodec table entries for the hash functions mdag knows about.
pub mod codes {
    /// The identity "hash": the digest is the input itself.
    pub const IDENTITY: u64 = 0x00;
    /// SHA2-256, 32-byte digest.
    pub const SHA2_256: u64 = 0x12;
    /// BLAKE3 with the default 32-byte output.
    pub const BLAKE3: u64 = 0x1e;
}

/// A digest tagged with the function that produced it.
///
/// Binary layout:
///
/// ```text
/// varint(code) ‖ varint(digest length) ‖ digest
/// ```
///
/// Varints are unsigned LEB128. The digest is held inline so a `Multihash`
/// is `Copy` and can be used freely as a map key or handle.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Multihash {
    code: u64,
    len: u8,
    digest: [u8; MAX_DIGEST_LEN],
}

impl Multihash {
    /// Wrap a digest produced by the hash function with multicodec `code`.
    pub fn wrap(code: u64, digest: &[u8]) -> TypeResult<Self> {
        if digest.len() > MAX_DIGEST_LEN {
            return Err(TypeError::DigestTooLong {
                len: digest.len() as u64,
                max: MAX_DIGEST_LEN,
            });
        }
        let mut buf = [0u8; MAX_DIGEST_LEN];
        buf[..digest.len()].copy_from_slice(digest);
        Ok(Self {
            code,
            len: digest.len() as u8,
            digest: buf,
        })
    }

    /// Wrap a 32-byte digest. Infallible, since it always fits.
    pub fn from_digest32(code: u64, digest: [u8; 32]) -> Self {
        let mut buf = [0u8; MAX_DIGEST_LEN];
        buf[..32].copy_from_slice(&digest);
        Self {
            code,
            len: 32,
            digest: buf,
        }
    }

    /// Multicodec of the hash function.
    pub fn code(&self) -> u64 {
        self.code
    }

    /// Digest length in bytes.
    pub fn size(&self) -> u8 {
        self.len
    }

    /// The raw digest.
    pub fn digest(&self) -> &[u8] {
        &self.digest[..self.len as usize]
    }

    /// Number of bytes [`to_bytes`](Self::to_bytes) produces.
    pub fn encoded_len(&self) -> usize {
        let mut buf = unsigned_varint::encode::u64_buffer();
        let code_len = unsigned_varint::encode::u64(self.code, &mut buf).len();
        let size_len = unsigned_varint::encode::u64(u64::from(self.len), &mut buf).len();
        code_len + size_len + self.len as usize
    }

    /// Serialize into the self-describing binary form.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len());
        let mut buf = unsigned_varint::encode::u64_buffer();
        out.extend_from_slice(unsigned_varint::encode::u64(self.code, &mut buf));
        out.extend_from_slice(unsigned_varint::encode::u64(u64::from(self.len), &mut buf));
        out.extend_from_slice(self.digest());
        out
    }

    /// Parse a multihash that occupies the whole of `bytes`.
    pub fn from_bytes(bytes: &[u8]) -> TypeResult<Self> {
        let (mh, rest) = Self::read(bytes)?;
        if !rest.is_empty() {
            return Err(TypeError::TrailingBytes(rest.len()));
        }
        Ok(mh)
    }

    /// Parse a multihash prefix of `bytes`, returning the unread remainder.
    pub fn read(bytes: &[u8]) -> TypeResult<(Self, &[u8])> {
        if bytes.is_empty() {
            return Err(TypeError::Empty);
        }
        let (code, rest) = read_varint(bytes)?;
        let (len, rest) = read_varint(rest)?;
        if len > MAX_DIGEST_LEN as u64 {
            return Err(TypeError::DigestTooLong {
                len,
                max: MAX_DIGEST_LEN,
            });
        }
        let len = len as usize;
        if rest.len() < len {
            return Err(TypeError::Truncated);
        }
        let (digest, rest) = rest.split_at(len);
        Ok((Self::wrap(code, digest)?, rest))
    }
}

fn read_varint(bytes: &[u8]) -> TypeResult<(u64, &[u8])> {
    unsigned_varint::decode::u64(bytes).map_err(|e| match e {
        unsigned_varint::decode::Error::Insufficient => TypeError::Truncated,
        other => TypeError::InvalidVarint(other.to_string()),
    })
}

impl fmt::Debug for Multihash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Multihash(0x{:x}, ", self.code)?;
        for b in self.digest().iter().take(4) {
            write!(f, "{b:02x}")?;
        }
        write!(f, "…)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn sha256_layout_has_two_byte_prefix() {
        let mh = Multihash::from_digest32(codes::SHA2_256, [0xab; 32]);
        let bytes = mh.to_bytes();
        assert_eq!(bytes.len(), 34);
        assert_eq!(&bytes[..2], &[0x12, 0x20]);
        assert_eq!(&bytes[2..], &[0xab; 32]);
        assert_eq!(mh.encoded_len(), 34);
    }

    #[test]
    fn parse_matches_wrap() {
        let mh = Multihash::wrap(codes::BLAKE3, &[7u8; 32]).unwrap();
        let parsed = Multihash::from_bytes(&mh.to_bytes()).unwrap();
        assert_eq!(mh, parsed);
        assert_eq!(parsed.code(), codes::BLAKE3);
        assert_eq!(parsed.size(), 32);
        assert_eq!(parsed.digest(), &[7u8; 32]);
    }

    #[test]
    fn multi_byte_code_varint() {
        let mh = Multihash::wrap(0x1234, b"abc").unwrap();
        let bytes = mh.to_bytes();
        // 0x1234 needs two LEB128 bytes
        assert_eq!(&bytes[..2], &[0xb4, 0x24]);
        assert_eq!(Multihash::from_bytes(&bytes).unwrap(), mh);
    }

    #[test]
    fn empty_input_rejected() {
        assert_eq!(Multihash::from_bytes(&[]), Err(TypeError::Empty));
    }

    #[test]
    fn truncated_digest_rejected() {
        let mut bytes = Multihash::from_digest32(codes::SHA2_256, [1; 32]).to_bytes();
        bytes.pop();
        assert_eq!(Multihash::from_bytes(&bytes), Err(TypeError::Truncated));
    }

    #[test]
    fn truncated_varint_rejected() {
        assert_eq!(Multihash::from_bytes(&[0x80]), Err(TypeError::Truncated));
    }

    #[test]
    fn trailing_bytes_rejected() {
        let mut bytes = Multihash::from_digest32(codes::SHA2_256, [1; 32]).to_bytes();
        bytes.extend_from_slice(&[0, 0]);
        assert_eq!(Multihash::from_bytes(&bytes), Err(TypeError::TrailingBytes(2)));
    }

    #[test]
    fn read_returns_remainder() {
        let mut bytes = Multihash::wrap(codes::IDENTITY, b"hi").unwrap().to_bytes();
        bytes.extend_from_slice(b"rest");
        let (mh, rest) = Multihash::read(&bytes).unwrap();
        assert_eq!(mh.digest(), b"hi");
        assert_eq!(rest, b"rest");
    }

    #[test]
    fn oversized_digest_rejected() {
        let err = Multihash::wrap(codes::IDENTITY, &[0u8; 65]).unwrap_err();
        assert!(matches!(err, TypeError::DigestTooLong { len: 65, .. }));

        // declared length 100 on the wire
        let err = Multihash::from_bytes(&[0x12, 100, 0]).unwrap_err();
        assert!(matches!(err, TypeError::DigestTooLong { len: 100, .. }));
    }

    #[test]
    fn ordering_is_consistent() {
        let a = Multihash::from_digest32(codes::SHA2_256, [0; 32]);
        let b = Multihash::from_digest32(codes::SHA2_256, [1; 32]);
        assert!(a < b);
    }

    proptest! {
        #[test]
        fn parsing_arbitrary_bytes_never_panics(bytes in proptest::collection::vec(any::<u8>(), 0..80)) {
            if let Ok(mh) = Multihash::from_bytes(&bytes) {
                prop_assert_eq!(mh.to_bytes(), bytes);
            }
        }
    }
}
