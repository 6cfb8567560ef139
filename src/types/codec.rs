//! Whole-value entry points to the codec.
//!
//! # Example
//!
//! ```ignore
//! use chasm::types::codec;
//!
//! let bytes = codec::encode(&block)?;
//! let decoded: Block = codec::decode(&bytes)?;
//! assert_eq!(decoded, block);
//! ```

use crate::types::bytes::{ByteBuffer, Bytes};
use crate::types::reader::{Decode, DecodeError, Reader};
use crate::types::writer::{Encode, EncodeError, EncodeSink, SizeCounter, Writer};

/// Encodes `value` into a buffer sized exactly for it.
///
/// Performs two passes: first to count bytes, then to encode.
pub fn encode<T: Encode + ?Sized>(value: &T) -> Result<Bytes, EncodeError> {
    let len = encoded_len(value)?;
    let mut w = Writer::new(ByteBuffer::with_capacity(len));
    w.write(value)?;
    Ok(w.into_bytes())
}

/// Encodes `value` into an existing sink and hands it back.
pub fn encode_into<T: Encode + ?Sized, S: EncodeSink>(value: &T, sink: S) -> Result<S, EncodeError> {
    let mut w = Writer::new(sink);
    w.write(value)?;
    Ok(w.into_inner())
}

/// Number of bytes `encode(value)` would produce.
pub fn encoded_len<T: Encode + ?Sized>(value: &T) -> Result<usize, EncodeError> {
    Ok(encode_into(value, SizeCounter::new())?.len())
}

/// Decodes one `T` that must span all of `bytes`.
pub fn decode<T: Decode>(bytes: &[u8]) -> Result<T, DecodeError> {
    let mut r = Reader::new(bytes);
    let value = r.read()?;
    r.finish()?;
    Ok(value)
}
