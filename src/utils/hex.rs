//! Hex text conversions for hashes, keys and raw bytes.

use chasm_derive::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum HexError {
    #[error("invalid hex: {0}")]
    Invalid(hex::FromHexError),

    #[error("expected {expected} bytes, got {actual}")]
    Length { expected: usize, actual: usize },
}

/// Lowercase hex of `bytes`, two characters per byte.
pub fn to_hex(bytes: impl AsRef<[u8]>) -> String {
    hex::encode(bytes)
}

/// Parses hex text of either case.
pub fn from_hex(text: &str) -> Result<Vec<u8>, HexError> {
    hex::decode(text).map_err(HexError::Invalid)
}

/// Parses hex text that must decode to exactly `N` bytes.
pub fn from_hex_array<const N: usize>(text: &str) -> Result<[u8; N], HexError> {
    let bytes = from_hex(text)?;
    let actual = bytes.len();
    bytes
        .try_into()
        .map_err(|_| HexError::Length { expected: N, actual })
}
