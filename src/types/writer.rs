//! Encoding half of the codec.
//!
//! # Binary Format
//!
//! - Integers: little-endian, fixed-width, no tag
//! - Arrays `[T; N]`: N elements back to back, no length prefix
//! - Sequences (`Vec<T>`, `[T]`): 2-byte little-endian element count, then the elements
//! - `Box<T>`: exactly the encoding of `T`
//! - Compound types: one class tag byte, the base's encoding if derived, then own fields
//!
//! Sequences longer than [`MAX_SEQUENCE_LEN`] are rejected before any of their bytes
//! are written.

use crate::types::bytes::{ByteBuffer, Bytes};
use crate::types::class::ClassTag;
use crate::types::codec;
use chasm_derive::Error;

/// Largest element count a sequence length prefix can carry.
pub const MAX_SEQUENCE_LEN: usize = u16::MAX as usize;

/// Sink for writing encoded bytes.
///
/// Implemented by byte buffers and hashers to allow encoding directly into the target
/// without intermediate allocations.
pub trait EncodeSink {
    fn write(&mut self, bytes: &[u8]);
}

/// Counter for computing encoded size without allocating memory.
#[derive(Debug, Default)]
pub struct SizeCounter {
    len: usize,
}

impl SizeCounter {
    pub fn new() -> Self {
        Self { len: 0 }
    }

    /// Returns the total number of bytes counted.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl EncodeSink for SizeCounter {
    fn write(&mut self, bytes: &[u8]) {
        self.len += bytes.len();
    }
}

impl EncodeSink for ByteBuffer {
    fn write(&mut self, bytes: &[u8]) {
        self.push_slice(bytes);
    }
}

impl EncodeSink for Vec<u8> {
    fn write(&mut self, bytes: &[u8]) {
        self.extend_from_slice(bytes);
    }
}

/// Errors that can occur during encoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("sequence of {len} elements does not fit a 2-byte length prefix")]
    Overflow { len: usize },
}

/// Trait for types that can be serialized to binary format.
pub trait Encode {
    /// Writes the binary representation through `w`.
    fn encode<S: EncodeSink>(&self, w: &mut Writer<S>) -> Result<(), EncodeError>;

    /// Serializes to a new byte buffer with exact capacity.
    fn to_bytes(&self) -> Result<Bytes, EncodeError> {
        codec::encode(self)
    }
}

/// Appends encodings to a sink.
///
/// `write` returns the writer so encodes can be chained:
///
/// ```ignore
/// w.write(&header)?.write(&transactions)?;
/// ```
pub struct Writer<S: EncodeSink = ByteBuffer> {
    sink: S,
}

impl<S: EncodeSink> Writer<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    /// Appends the encoding of `value`.
    pub fn write<T: Encode + ?Sized>(&mut self, value: &T) -> Result<&mut Self, EncodeError> {
        value.encode(self)?;
        Ok(self)
    }

    /// Appends bytes verbatim.
    pub fn write_raw(&mut self, bytes: &[u8]) -> &mut Self {
        self.sink.write(bytes);
        self
    }

    pub fn write_tag(&mut self, tag: ClassTag) -> &mut Self {
        self.write_raw(&[tag.0])
    }

    /// Appends a sequence element count as 2 bytes, little-endian.
    pub fn write_len(&mut self, len: usize) -> Result<&mut Self, EncodeError> {
        let len = u16::try_from(len).map_err(|_| EncodeError::Overflow { len })?;
        Ok(self.write_raw(&len.to_le_bytes()))
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_inner(self) -> S {
        self.sink
    }
}

impl Writer<ByteBuffer> {
    /// Creates a writer over an empty buffer.
    pub fn buffer() -> Self {
        Self::new(ByteBuffer::new())
    }

    pub fn into_bytes(self) -> Bytes {
        self.sink.into_bytes()
    }
}

impl Default for Writer<ByteBuffer> {
    fn default() -> Self {
        Self::buffer()
    }
}

impl Encode for u8 {
    fn encode<S: EncodeSink>(&self, w: &mut Writer<S>) -> Result<(), EncodeError> {
        w.write_raw(&[*self]);
        Ok(())
    }
}

impl Encode for i8 {
    fn encode<S: EncodeSink>(&self, w: &mut Writer<S>) -> Result<(), EncodeError> {
        w.write_raw(&self.to_le_bytes());
        Ok(())
    }
}

macro_rules! impl_int {
    ($($t:ty),*) => {
        $(
            impl Encode for $t {
                fn encode<S: EncodeSink>(&self, w: &mut Writer<S>) -> Result<(), EncodeError> {
                    w.write_raw(&self.to_le_bytes());
                    Ok(())
                }
            }
        )*
    };
}

impl_int!(u16, u32, u64, i16, i32, i64);

impl<T: Encode, const N: usize> Encode for [T; N] {
    fn encode<S: EncodeSink>(&self, w: &mut Writer<S>) -> Result<(), EncodeError> {
        for item in self {
            w.write(item)?;
        }
        Ok(())
    }
}

impl<T: Encode> Encode for [T] {
    fn encode<S: EncodeSink>(&self, w: &mut Writer<S>) -> Result<(), EncodeError> {
        w.write_len(self.len())?;
        for item in self {
            w.write(item)?;
        }
        Ok(())
    }
}

impl<T: Encode> Encode for Vec<T> {
    fn encode<S: EncodeSink>(&self, w: &mut Writer<S>) -> Result<(), EncodeError> {
        self.as_slice().encode(w)
    }
}

impl<T: Encode + ?Sized> Encode for Box<T> {
    fn encode<S: EncodeSink>(&self, w: &mut Writer<S>) -> Result<(), EncodeError> {
        (**self).encode(w)
    }
}

impl Encode for Bytes {
    fn encode<S: EncodeSink>(&self, w: &mut Writer<S>) -> Result<(), EncodeError> {
        self.as_slice().encode(w)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn written<T: Encode + ?Sized>(value: &T) -> Vec<u8> {
        let mut w = Writer::new(Vec::new());
        w.write(value).unwrap();
        w.into_inner()
    }

    // ========== Integer Tests ==========

    #[test]
    fn u64_is_little_endian() {
        assert_eq!(
            written(&0x0102_0304_0506_0708u64),
            vec![0x08, 0x07, 0x06, 0x05, 0x04, 0x03, 0x02, 0x01]
        );
    }

    #[test]
    fn u16_is_little_endian() {
        assert_eq!(written(&0x0102u16), vec![0x02, 0x01]);
    }

    #[test]
    fn signed_integers_use_twos_complement() {
        assert_eq!(written(&-1i8), vec![0xff]);
        assert_eq!(written(&-2i32), vec![0xfe, 0xff, 0xff, 0xff]);
    }

    #[test]
    fn byte_is_written_verbatim() {
        assert_eq!(written(&0xfau8), vec![0xfa]);
    }

    // ========== Array Tests ==========

    #[test]
    fn array_has_no_length_prefix() {
        assert_eq!(written(&[1u8, 2, 3, 4]), vec![1, 2, 3, 4]);
    }

    #[test]
    fn array_of_wide_elements() {
        assert_eq!(written(&[0x0102u16, 0x0304]), vec![0x02, 0x01, 0x04, 0x03]);
    }

    #[test]
    fn empty_array_writes_nothing() {
        let empty: [u32; 0] = [];
        assert!(written(&empty).is_empty());
    }

    // ========== Sequence Tests ==========

    #[test]
    fn sequence_has_two_byte_count() {
        assert_eq!(written(&vec![0xaau8, 0xbb]), vec![0x02, 0x00, 0xaa, 0xbb]);
    }

    #[test]
    fn empty_sequence_is_just_the_count() {
        assert_eq!(written(&Vec::<u64>::new()), vec![0x00, 0x00]);
    }

    #[test]
    fn slice_and_vec_encode_alike() {
        let v = vec![1u16, 2, 3];
        assert_eq!(written(&v), written(v.as_slice()));
    }

    #[test]
    fn largest_sequence_is_accepted() {
        let bytes = written(&vec![0u8; MAX_SEQUENCE_LEN]);
        assert_eq!(&bytes[..2], &[0xff, 0xff]);
        assert_eq!(bytes.len(), 2 + MAX_SEQUENCE_LEN);
    }

    #[test]
    fn oversized_sequence_overflows_without_writing() {
        let mut w = Writer::new(Vec::new());
        w.write(&1u8).unwrap();
        let err = w.write(&vec![0u8; MAX_SEQUENCE_LEN + 1]).err().unwrap();
        assert_eq!(err, EncodeError::Overflow { len: 65536 });
        assert_eq!(w.into_inner(), vec![1]);
    }

    #[test]
    fn nested_oversized_sequence_fails_whole_encode() {
        let nested = vec![vec![0u8; MAX_SEQUENCE_LEN + 1]];
        let mut w = Writer::new(SizeCounter::new());
        assert!(matches!(
            w.write(&nested),
            Err(EncodeError::Overflow { len: 65536 })
        ));
    }

    // ========== Box Tests ==========

    #[test]
    fn box_is_transparent() {
        assert_eq!(written(&Box::new(7u32)), written(&7u32));
        assert_eq!(
            written(&Box::new(Box::new(Box::new(0xabu8)))),
            vec![0xab]
        );
    }

    // ========== Writer Tests ==========

    #[test]
    fn writes_chain_in_order() {
        let mut w = Writer::buffer();
        w.write(&1u8).unwrap().write(&2u16).unwrap().write_raw(&[9]);
        assert_eq!(w.into_bytes().as_slice(), &[1, 2, 0, 9]);
    }

    #[test]
    fn size_counter_matches_buffer_length() {
        let value = vec![[1u32, 2], [3, 4]];
        let mut counter = Writer::new(SizeCounter::new());
        counter.write(&value).unwrap();
        assert_eq!(counter.sink().len(), written(&value).len());
    }

    #[test]
    fn overflow_message_names_the_length() {
        let err = EncodeError::Overflow { len: 70000 };
        assert_eq!(
            err.to_string(),
            "sequence of 70000 elements does not fit a 2-byte length prefix"
        );
    }
}
