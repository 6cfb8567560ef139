//! Codec and primitive value types.
//!
//! - `class`: compile-time classification (tags, base descriptors, field lists)
//! - `writer` / `reader`: the two halves of the binary codec
//! - `codec`: whole-value `encode` / `decode`
//! - `bytes`: output buffer, read cursor and shared encoded bytes
//! - `hash` / `merkle_tree`: SHA-256 hashes and roots over them

pub mod bytes;
pub mod class;
pub mod codec;
pub mod hash;
pub mod merkle_tree;
pub mod reader;
pub mod writer;
