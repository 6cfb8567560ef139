//! ECDSA key pairs on secp256k1 and SHA-256 digests.
//!
//! Public keys travel as 33-byte compressed SEC1 points and double as addresses.
//! Signatures are 64-byte compact `r || s` with low `s`.

use crate::types::hash::Hash;
use chasm_derive::{Error, Serializable};
use k256::ecdsa::signature::{Signer, Verifier};
use k256::ecdsa::{Signature as EcdsaSignature, SigningKey, VerifyingKey};
use rand_core::OsRng;
use std::fmt;
use zeroize::Zeroizing;

pub const PRIVATE_KEY_LEN: usize = 32;
pub const PUBLIC_KEY_LEN: usize = 33;
pub const SIGNATURE_LEN: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CryptoError {
    #[error("private key is not a valid secp256k1 scalar")]
    InvalidPrivateKey,

    #[error("public key is not a valid compressed secp256k1 point")]
    InvalidPublicKey,

    #[error("signature is not a valid 64-byte ECDSA signature")]
    InvalidSignature,
}

/// Private key for signing transactions.
///
/// The underlying scalar is wiped from memory when the key is dropped.
/// Never encoded or logged.
#[derive(Clone)]
pub struct PrivateKey {
    key: SigningKey,
}

/// Compressed SEC1 public key.
///
/// Not checked for curve membership on decode; [`verify`] reports bad points.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serializable)]
#[class(transparent)]
pub struct PublicKey(pub [u8; PUBLIC_KEY_LEN]);

/// Ledger addresses are the owner's public key.
pub type Address = PublicKey;

/// Compact ECDSA signature.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serializable)]
#[class(transparent)]
pub struct Signature(pub [u8; SIGNATURE_LEN]);

/// A private key together with its public key.
pub struct KeyPair {
    pub private: PrivateKey,
    pub public: PublicKey,
}

impl PrivateKey {
    /// Generates a new random private key using OS-provided entropy.
    pub fn new() -> Self {
        Self {
            key: SigningKey::random(&mut OsRng),
        }
    }

    /// Creates a private key from a raw 32-byte scalar.
    pub fn from_bytes(bytes: &[u8; PRIVATE_KEY_LEN]) -> Result<Self, CryptoError> {
        SigningKey::from_slice(bytes)
            .map(|key| Self { key })
            .map_err(|_| CryptoError::InvalidPrivateKey)
    }

    /// Returns the raw scalar, wiped when the returned value is dropped.
    pub fn to_bytes(&self) -> Zeroizing<[u8; PRIVATE_KEY_LEN]> {
        let mut out = Zeroizing::new([0u8; PRIVATE_KEY_LEN]);
        out.copy_from_slice(&self.key.to_bytes());
        out
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey::from_verifying_key(self.key.verifying_key())
    }
}

impl Default for PrivateKey {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey(..)")
    }
}

impl PublicKey {
    fn from_verifying_key(vk: &VerifyingKey) -> Self {
        let point = vk.to_encoded_point(true);
        let mut out = [0u8; PUBLIC_KEY_LEN];
        out.copy_from_slice(point.as_bytes());
        PublicKey(out)
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl KeyPair {
    /// Rebuilds a key pair from a stored private scalar.
    pub fn from_private_bytes(bytes: &[u8; PRIVATE_KEY_LEN]) -> Result<Self, CryptoError> {
        let private = PrivateKey::from_bytes(bytes)?;
        let public = private.public_key();
        Ok(Self { private, public })
    }
}

/// SHA-256 of `data`.
pub fn sha256(data: &[u8]) -> Hash {
    Hash::digest(data)
}

/// Generates a fresh random key pair.
pub fn generate_key_pair() -> KeyPair {
    let private = PrivateKey::new();
    let public = private.public_key();
    KeyPair { private, public }
}

/// Signs `data` (hashed with SHA-256 internally) with deterministic RFC 6979 nonces.
pub fn sign(private: &PrivateKey, data: &[u8]) -> Result<Signature, CryptoError> {
    let sig: EcdsaSignature = private
        .key
        .try_sign(data)
        .map_err(|_| CryptoError::InvalidPrivateKey)?;
    let sig = sig.normalize_s().unwrap_or(sig);

    let mut out = [0u8; SIGNATURE_LEN];
    out.copy_from_slice(&sig.to_bytes());
    Ok(Signature(out))
}

/// Checks `signature` over `data` against `public`.
///
/// `Ok(false)` means a well-formed signature that does not match. Malformed keys or
/// signatures are errors.
pub fn verify(public: &PublicKey, signature: &Signature, data: &[u8]) -> Result<bool, CryptoError> {
    let vk = VerifyingKey::from_sec1_bytes(&public.0).map_err(|_| CryptoError::InvalidPublicKey)?;
    let sig = EcdsaSignature::from_slice(&signature.0).map_err(|_| CryptoError::InvalidSignature)?;
    Ok(vk.verify(data, &sig).is_ok())
}
