//! 32-byte SHA-256 hash type.

use crate::types::codec;
use crate::types::writer::{Encode, EncodeError, EncodeSink};
use chasm_derive::Serializable;
use sha2::{Digest, Sha256};
use std::fmt;

/// SHA-256 hash length in bytes.
pub const HASH_LEN: usize = 32;

/// Fixed-size 32-byte hash used throughout the ledger.
///
/// Encodes as its 32 raw bytes, without a tag or length prefix.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serializable, Default, Hash, Ord, PartialOrd)]
#[class(transparent)]
pub struct Hash(pub [u8; HASH_LEN]);

impl Hash {
    /// Creates a zero-valued hash (all bytes are 0x00).
    ///
    /// Used as the previous-block hash of a genesis block and the root of an empty tree.
    pub fn zero() -> Hash {
        Hash([0u8; HASH_LEN])
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    /// Builds a hash from exactly 32 bytes.
    pub fn from_slice(bytes: &[u8]) -> Option<Hash> {
        bytes.try_into().ok().map(Hash)
    }

    /// Creates a new SHA-256 hash builder for incremental hashing.
    pub fn sha256() -> HashBuilder {
        HashBuilder::new()
    }

    /// SHA-256 of `data`.
    pub fn digest(data: &[u8]) -> Hash {
        let mut h = HashBuilder::new();
        h.update(data);
        h.finalize()
    }

    /// SHA-256 of the encoding of `value`, computed without buffering it.
    pub fn of<T: Encode + ?Sized>(value: &T) -> Result<Hash, EncodeError> {
        Ok(codec::encode_into(value, HashBuilder::new())?.finalize())
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

impl AsRef<[u8]> for Hash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Incremental SHA-256 hash builder.
///
/// Implements [`EncodeSink`] so encodable types can be hashed directly
/// without intermediate byte buffers.
#[derive(Clone, Default)]
pub struct HashBuilder {
    hasher: Sha256,
}

impl HashBuilder {
    pub fn new() -> Self {
        Self {
            hasher: Sha256::new(),
        }
    }

    /// Feeds data into the hash computation.
    pub fn update(&mut self, data: &[u8]) {
        self.hasher.update(data);
    }

    /// Consumes the builder and returns the final hash.
    pub fn finalize(self) -> Hash {
        Hash(self.hasher.finalize().into())
    }
}

impl EncodeSink for HashBuilder {
    fn write(&mut self, bytes: &[u8]) {
        self.hasher.update(bytes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::codec::{decode, encode};

    #[test]
    fn digest_of_abc() {
        assert_eq!(
            Hash::digest(b"abc").to_string(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn incremental_matches_one_shot() {
        let mut h = Hash::sha256();
        h.update(b"1234");
        h.update(b"56789");
        assert_eq!(h.finalize(), Hash::digest(b"123456789"));
    }

    #[test]
    fn hash_of_value_matches_hash_of_encoding() {
        let value = vec![1u32, 2, 3];
        let bytes = encode(&value).unwrap();
        assert_eq!(Hash::of(&value).unwrap(), Hash::digest(&bytes));
    }

    #[test]
    fn encodes_as_raw_bytes() {
        let h = Hash([0xab; HASH_LEN]);
        let bytes = encode(&h).unwrap();
        assert_eq!(bytes.as_slice(), &[0xab; HASH_LEN]);
        assert_eq!(decode::<Hash>(&bytes).unwrap(), h);
    }

    #[test]
    fn from_slice_checks_length() {
        assert_eq!(Hash::from_slice(&[0u8; HASH_LEN]), Some(Hash::zero()));
        assert_eq!(Hash::from_slice(&[0u8; 31]), None);
    }
}
