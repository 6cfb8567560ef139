//! Hashing and signing primitives.

pub mod key_pair;
