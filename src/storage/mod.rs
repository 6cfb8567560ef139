//! Persistence.
//!
//! - [`database`]: RocksDB-backed key-value store keyed by hash, with typed helpers that
//!   go through the codec

pub mod database;
