//! Ledger data structures.
//!
//! This module contains the types the exchange ledger persists and exchanges:
//! - `Block` / `Header`: chained containers of signed transactions
//! - `Transaction` and its kinds: offers, matches, confirmations, mining and deposit unlocks
//! - `Txo` / `Input` / outputs: the UTXO plumbing
//! - `token`: exchangeable token ids and opaque inclusion proofs
//! - `tags`: the class tag of every type above

pub mod block;
pub mod output;
pub mod tags;
pub mod token;
pub mod transaction;
pub mod txo;
