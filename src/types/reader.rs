//! Decoding half of the codec.
//!
//! Mirrors [`writer`](crate::types::writer): every `Decode` impl consumes exactly the
//! bytes the matching `Encode` impl produced. A failed raw read or tag check leaves the
//! position unchanged; a compound that fails partway may already have consumed its prefix.

use crate::types::bytes::{ByteCursor, Bytes};
use crate::types::class::ClassTag;
use crate::types::codec;
use chasm_derive::Error;

/// Errors that can occur during decoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// A class tag in the input is not the one the target type expects.
    #[error("unexpected class tag {found} while decoding {type_name}")]
    TagMismatch {
        type_name: &'static str,
        found: ClassTag,
    },

    #[error("unexpected end of input: needed {needed} bytes, {remaining} remaining")]
    UnexpectedEnd { needed: usize, remaining: usize },

    #[error("{remaining} trailing bytes after a complete value")]
    TrailingData { remaining: usize },
}

/// Trait for types that can be deserialized from binary format.
pub trait Decode: Sized {
    /// Reads one value, consuming exactly its encoding.
    fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError>;

    /// Decodes a value from a byte slice, requiring all bytes to be consumed.
    fn from_bytes(data: &[u8]) -> Result<Self, DecodeError> {
        codec::decode(data)
    }
}

/// Consumes encodings from a byte slice.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    cursor: ByteCursor<'a>,
}

impl<'a> Reader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            cursor: ByteCursor::new(data),
        }
    }

    /// Reads one value of type `T`.
    pub fn read<T: Decode>(&mut self) -> Result<T, DecodeError> {
        T::decode(self)
    }

    /// Consumes `n` raw bytes.
    pub fn read_raw(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
        self.cursor.read(n)
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        self.cursor.read_array::<N>()
    }

    pub fn read_tag(&mut self) -> Result<ClassTag, DecodeError> {
        self.cursor.read_byte().map(ClassTag)
    }

    /// Returns the next class tag without consuming it.
    pub fn peek_tag(&self) -> Result<ClassTag, DecodeError> {
        self.cursor
            .peek()
            .map(ClassTag)
            .ok_or(DecodeError::UnexpectedEnd {
                needed: 1,
                remaining: 0,
            })
    }

    /// Consumes the next tag if it equals `expected`.
    ///
    /// On mismatch the tag stays unread.
    pub fn expect_tag(
        &mut self,
        expected: ClassTag,
        type_name: &'static str,
    ) -> Result<(), DecodeError> {
        let found = self.peek_tag()?;
        if found != expected {
            return Err(DecodeError::TagMismatch { type_name, found });
        }
        self.cursor.read_byte()?;
        Ok(())
    }

    /// Reads a 2-byte little-endian sequence element count.
    pub fn read_len(&mut self) -> Result<usize, DecodeError> {
        Ok(u16::from_le_bytes(self.read_array::<2>()?) as usize)
    }

    pub fn remaining(&self) -> usize {
        self.cursor.remaining()
    }

    pub fn position(&self) -> usize {
        self.cursor.position()
    }

    pub fn is_empty(&self) -> bool {
        self.cursor.is_empty()
    }

    /// Succeeds only when every input byte has been consumed.
    pub fn finish(self) -> Result<(), DecodeError> {
        match self.remaining() {
            0 => Ok(()),
            remaining => Err(DecodeError::TrailingData { remaining }),
        }
    }
}

impl Decode for u8 {
    fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        r.cursor.read_byte()
    }
}

impl Decode for i8 {
    fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        Ok(i8::from_le_bytes(r.read_array::<1>()?))
    }
}

macro_rules! impl_int {
    ($($t:ty),*) => {
        $(
            impl Decode for $t {
                fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
                    Ok(<$t>::from_le_bytes(r.read_array::<{ size_of::<$t>() }>()?))
                }
            }
        )*
    };
}

impl_int!(u16, u32, u64, i16, i32, i64);

impl<T: Decode, const N: usize> Decode for [T; N] {
    fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let mut items = Vec::with_capacity(N);
        for _ in 0..N {
            items.push(r.read::<T>()?);
        }
        <[T; N]>::try_from(items).map_err(|items| DecodeError::UnexpectedEnd {
            needed: N,
            remaining: items.len(),
        })
    }
}

impl<T: Decode> Decode for Vec<T> {
    fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let len = r.read_len()?;
        // Preallocation is bounded by the remaining input, not the untrusted count.
        let mut items = Vec::with_capacity(len.min(r.remaining()));
        for _ in 0..len {
            items.push(r.read()?);
        }
        Ok(items)
    }
}

impl<T: Decode> Decode for Box<T> {
    fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        Ok(Box::new(r.read()?))
    }
}

impl Decode for Bytes {
    fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let len = r.read_len()?;
        Ok(Bytes::new(r.read_raw(len)?))
    }
}
