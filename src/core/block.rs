//! Block and header structures.

use crate::core::tags;
use crate::core::transaction::SignedTransaction;
use crate::types::hash::Hash;
use crate::types::merkle_tree::MerkleTree;
use crate::types::writer::EncodeError;
use chasm_derive::Serializable;

/// Block header containing metadata and cryptographic commitments.
#[derive(Clone, Debug, PartialEq, Eq, Serializable)]
#[class(tag = tags::HEADER)]
pub struct Header {
    /// Hash of the parent header, zero for genesis.
    pub prev_block_hash: Hash,
    /// Root of the merkle tree over the block's transaction hashes.
    pub merkle_root: Hash,
    /// Unix timestamp in seconds.
    pub timestamp: u64,
    pub nonce: u64,
    pub difficulty: u8,
}

impl Header {
    /// SHA-256 of the encoded header. Identifies the block.
    pub fn hash(&self) -> Result<Hash, EncodeError> {
        Hash::of(self)
    }
}

/// A header and the signed transactions it commits to.
#[derive(Clone, Debug, PartialEq, Eq, Serializable)]
#[class(tag = tags::BLOCK)]
pub struct Block {
    pub header: Header,
    pub transactions: Vec<SignedTransaction>,
}

impl Block {
    /// Assembles a block, filling in the merkle root from `transactions`.
    pub fn new(
        prev_block_hash: Hash,
        timestamp: u64,
        nonce: u64,
        difficulty: u8,
        transactions: Vec<SignedTransaction>,
    ) -> Result<Self, EncodeError> {
        let merkle_root = MerkleTree::from_transactions(&transactions)?;
        Ok(Self {
            header: Header {
                prev_block_hash,
                merkle_root,
                timestamp,
                nonce,
                difficulty,
            },
            transactions,
        })
    }

    /// The header hash.
    pub fn hash(&self) -> Result<Hash, EncodeError> {
        self.header.hash()
    }

    /// Returns `true` when the header commits to exactly these transactions.
    pub fn verify_merkle_root(&self) -> Result<bool, EncodeError> {
        Ok(MerkleTree::from_transactions(&self.transactions)? == self.header.merkle_root)
    }
}
