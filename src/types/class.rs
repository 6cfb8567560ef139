//! Compile-time type classification for the codec.
//!
//! Every compound type carries a one-byte [`ClassTag`] and an inheritance descriptor
//! ([`Root`] or [`DerivedFrom`]) as associated items of [`Compound`]. Nothing here is
//! consulted at runtime to decide *how* to encode; the trait impls fix the shape at build
//! time. A type used with the codec without a classification simply does not compile.
//!
//! # Wire shape
//!
//! - Root: `[tag][own fields...]`
//! - DerivedFrom(B): `[tag][encoding of the value viewed as B][own fields...]`
//!
//! The base chain is linear: `Lineage` is a single associated type, so a type can name at
//! most one base.
//!
//! ```
//! use chasm::types::class::ClassTag;
//! use chasm::types::codec::{decode, encode};
//! use chasm_derive::Serializable;
//!
//! #[derive(Debug, PartialEq, Serializable)]
//! #[class(tag = ClassTag(0x20))]
//! struct Ping {
//!     seq: u32,
//! }
//!
//! #[derive(Debug, PartialEq, Serializable)]
//! #[class(tag = ClassTag(0x21))]
//! struct LoudPing {
//!     #[class(base)]
//!     ping: Ping,
//!     volume: u8,
//! }
//!
//! let value = LoudPing { ping: Ping { seq: 7 }, volume: 9 };
//! let bytes = encode(&value).unwrap();
//! assert_eq!(bytes.as_slice(), &[0x21, 0x20, 7, 0, 0, 0, 9]);
//! assert_eq!(decode::<LoudPing>(&bytes).unwrap(), value);
//! ```
//!
//! # Rejected at build time
//!
//! A second base:
//!
//! ```compile_fail
//! use chasm::types::class::ClassTag;
//! use chasm_derive::Serializable;
//!
//! #[derive(Serializable)]
//! #[class(tag = ClassTag(0x20))]
//! struct Ping {
//!     seq: u32,
//! }
//!
//! #[derive(Serializable)]
//! #[class(tag = ClassTag(0x22))]
//! struct Pong {
//!     seq: u32,
//! }
//!
//! #[derive(Serializable)]
//! #[class(tag = ClassTag(0x23))]
//! struct Rally {
//!     #[class(base)]
//!     ping: Ping,
//!     #[class(base)]
//!     pong: Pong,
//! }
//! ```
//!
//! A sum type whose variants share a tag:
//!
//! ```compile_fail
//! use chasm::types::class::ClassTag;
//! use chasm_derive::Serializable;
//!
//! #[derive(Serializable)]
//! #[class(tag = ClassTag(0x30))]
//! struct Left {
//!     value: u8,
//! }
//!
//! #[derive(Serializable)]
//! #[class(tag = ClassTag(0x30))]
//! struct Right {
//!     value: u8,
//! }
//!
//! #[derive(Serializable)]
//! enum Either {
//!     Left(Left),
//!     Right(Right),
//! }
//! ```
//!
//! A type with no classification:
//!
//! ```compile_fail
//! use chasm::types::codec::encode;
//!
//! struct Loose {
//!     value: u8,
//! }
//!
//! let _ = encode(&Loose { value: 1 });
//! ```

use crate::types::reader::{DecodeError, Reader};
use crate::types::writer::{EncodeError, EncodeSink, Writer};
use std::any::type_name;
use std::fmt;
use std::marker::PhantomData;

/// Stable one-byte identifier of a serializable type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassTag(pub u8);

impl fmt::Display for ClassTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#04x}", self.0)
    }
}

/// Returns `true` when no two tags in `tags` are equal.
///
/// `const` so registries and sum types can assert uniqueness at compile time.
pub const fn tags_are_distinct(tags: &[ClassTag]) -> bool {
    let mut i = 0;
    while i < tags.len() {
        let mut j = i + 1;
        while j < tags.len() {
            if tags[i].0 == tags[j].0 {
                return false;
            }
            j += 1;
        }
        i += 1;
    }
    true
}

/// Inheritance descriptor of `T`.
///
/// Implemented by [`Root`] and [`DerivedFrom`] only.
pub trait Lineage<T> {
    /// Decoded base value handed to [`Compound::read_fields`]: `()` for roots.
    type Base;

    /// Writes the full encoding of `value` viewed as its base (nothing for roots).
    fn write_base<S: EncodeSink>(value: &T, w: &mut Writer<S>) -> Result<(), EncodeError>;

    /// Reads the base-typed prefix.
    fn read_base(r: &mut Reader<'_>) -> Result<Self::Base, DecodeError>;

    /// Appends the class tags of every ancestor, nearest first.
    fn ancestors(out: &mut Vec<ClassTag>);
}

/// Descriptor of a type with no serializable base.
pub enum Root {}

/// Descriptor of a type extending the serializable base `B`.
pub struct DerivedFrom<B>(PhantomData<fn() -> B>);

/// Gives access to the base embedded in a derived type.
pub trait Extends<B> {
    fn base(&self) -> &B;
}

impl<T> Lineage<T> for Root {
    type Base = ();

    fn write_base<S: EncodeSink>(_value: &T, _w: &mut Writer<S>) -> Result<(), EncodeError> {
        Ok(())
    }

    fn read_base(_r: &mut Reader<'_>) -> Result<(), DecodeError> {
        Ok(())
    }

    fn ancestors(_out: &mut Vec<ClassTag>) {}
}

impl<T, B> Lineage<T> for DerivedFrom<B>
where
    T: Extends<B>,
    B: Compound,
{
    type Base = B;

    fn write_base<S: EncodeSink>(value: &T, w: &mut Writer<S>) -> Result<(), EncodeError> {
        write_compound(value.base(), w)
    }

    fn read_base(r: &mut Reader<'_>) -> Result<B, DecodeError> {
        read_compound::<B>(r)
    }

    fn ancestors(out: &mut Vec<ClassTag>) {
        out.push(B::CLASS_TAG);
        <B::Lineage as Lineage<B>>::ancestors(out);
    }
}

/// A classified type with a tag, a descriptor and its own ordered field list.
///
/// Usually derived with `#[derive(Serializable)]`. Manual impls pair this with
/// [`impl_compound_codec!`](crate::impl_compound_codec) to get `Encode`/`Decode`.
pub trait Compound: Sized {
    const CLASS_TAG: ClassTag;
    type Lineage: Lineage<Self>;

    /// Writes this type's own (non-inherited) fields in declared order.
    fn write_fields<S: EncodeSink>(&self, w: &mut Writer<S>) -> Result<(), EncodeError>;

    /// Reads this type's own fields and assembles the value around the decoded base.
    fn read_fields(
        base: <Self::Lineage as Lineage<Self>>::Base,
        r: &mut Reader<'_>,
    ) -> Result<Self, DecodeError>;
}

/// Encodes a compound value: own tag, base view, own fields.
pub fn write_compound<T: Compound, S: EncodeSink>(
    value: &T,
    w: &mut Writer<S>,
) -> Result<(), EncodeError> {
    w.write_tag(T::CLASS_TAG);
    <T::Lineage as Lineage<T>>::write_base(value, w)?;
    value.write_fields(w)
}

/// Decodes a compound value of statically known type `T`.
///
/// Fails with `TagMismatch` as soon as a tag disagrees with the expected chain.
pub fn read_compound<T: Compound>(r: &mut Reader<'_>) -> Result<T, DecodeError> {
    r.expect_tag(T::CLASS_TAG, type_name::<T>())?;
    let base = <T::Lineage as Lineage<T>>::read_base(r)?;
    T::read_fields(base, r)
}

/// Tags written for one value of `T`, outermost first: `T`'s own tag, then each base's.
pub fn class_chain<T: Compound>() -> Vec<ClassTag> {
    let mut chain = vec![T::CLASS_TAG];
    <T::Lineage as Lineage<T>>::ancestors(&mut chain);
    chain
}

/// Implements `Encode` and `Decode` for manually classified compound types.
///
/// ```ignore
/// impl Compound for Marker { ... }
/// impl_compound_codec!(Marker);
/// ```
#[macro_export]
macro_rules! impl_compound_codec {
    ($($t:ty),* $(,)?) => {$(
        impl $crate::types::writer::Encode for $t {
            fn encode<S: $crate::types::writer::EncodeSink>(
                &self,
                w: &mut $crate::types::writer::Writer<S>,
            ) -> ::core::result::Result<(), $crate::types::writer::EncodeError> {
                $crate::types::class::write_compound(self, w)
            }
        }

        impl $crate::types::reader::Decode for $t {
            fn decode(
                r: &mut $crate::types::reader::Reader<'_>,
            ) -> ::core::result::Result<Self, $crate::types::reader::DecodeError> {
                $crate::types::class::read_compound(r)
            }
        }
    )*};
}
