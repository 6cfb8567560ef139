//! Ledger library for a token exchange.
//!
//! Provides a type-directed binary codec, the ledger primitives built on it,
//! SHA-256/ECDSA helpers and a RocksDB-backed key-value store.

// Lets `#[derive(Serializable)]` name `::chasm` from inside this crate.
extern crate self as chasm;

pub mod config;
pub mod core;
pub mod crypto;
pub mod storage;
pub mod types;
pub mod utils;
