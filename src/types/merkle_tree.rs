//! Merkle tree helpers for producing deterministic roots over block transactions.
//!
//! Behavior:
//! - An empty list of leaves yields the all-zero hash (`Hash::zero()`).
//! - Odd layers are padded by duplicating the last leaf before hashing the pair.
//! - Tree construction is performed in-place to minimize allocations.

use crate::core::transaction::SignedTransaction;
use crate::types::hash::Hash;
use crate::types::writer::EncodeError;

const EMPTY_VEC_HASH: Hash = Hash([0u8; 32]);
const MERKLE_NODE_SEPARATION: &[u8] = b"CHASM_MERKLE_NODE";

/// Utility functions to build Merkle roots from hashes or transactions.
pub struct MerkleTree;

impl MerkleTree {
    fn hash_pair(left: Hash, right: Hash) -> Hash {
        let mut h = Hash::sha256();
        h.update(MERKLE_NODE_SEPARATION);
        h.update(left.as_slice());
        h.update(right.as_slice());
        h.finalize()
    }

    /// Computes a Merkle root from the provided leaf hashes.
    ///
    /// When a level has an odd number of nodes the last node is paired with itself.
    pub fn from_raw(mut nodes: Vec<Hash>) -> Hash {
        if nodes.is_empty() {
            return EMPTY_VEC_HASH;
        }

        let mut len = nodes.len();

        while len > 1 {
            let mut write = 0;
            let mut read = 0;

            while read < len {
                let left = nodes[read];
                let right = if read + 1 < len {
                    nodes[read + 1]
                } else {
                    left
                };

                nodes[write] = Self::hash_pair(left, right);

                write += 1;
                read += 2;
            }

            len = write;
        }

        nodes[0]
    }

    /// Computes a Merkle root using each transaction's hash as a leaf.
    pub fn from_transactions(txs: &[SignedTransaction]) -> Result<Hash, EncodeError> {
        if txs.is_empty() {
            return Ok(EMPTY_VEC_HASH);
        }

        let nodes = txs
            .iter()
            .map(SignedTransaction::hash)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::from_raw(nodes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_utils::utils::{mining_transaction, signed};

    #[test]
    fn empty_returns_zero_hash() {
        assert_eq!(MerkleTree::from_raw(Vec::new()), Hash::zero());
        assert_eq!(MerkleTree::from_transactions(&[]).unwrap(), Hash::zero());
    }

    #[test]
    fn single_leaf_returns_leaf() {
        let leaf = Hash::digest(b"leaf");
        assert_eq!(MerkleTree::from_raw(vec![leaf]), leaf);
    }

    #[test]
    fn even_number_of_leaves_matches_manual_reduction() {
        let a = Hash::digest(b"a");
        let b = Hash::digest(b"b");
        let c = Hash::digest(b"c");
        let d = Hash::digest(b"d");

        let level1 = [MerkleTree::hash_pair(a, b), MerkleTree::hash_pair(c, d)];
        let expected_root = MerkleTree::hash_pair(level1[0], level1[1]);

        assert_eq!(MerkleTree::from_raw(vec![a, b, c, d]), expected_root);
    }

    #[test]
    fn odd_number_of_leaves_duplicates_last_for_padding() {
        let a = Hash::digest(b"a");
        let b = Hash::digest(b"b");
        let c = Hash::digest(b"c");

        let left = MerkleTree::hash_pair(a, b);
        let right = MerkleTree::hash_pair(c, c);
        let expected_root = MerkleTree::hash_pair(left, right);

        assert_eq!(MerkleTree::from_raw(vec![a, b, c]), expected_root);
    }

    #[test]
    fn order_of_leaves_matters() {
        let a = Hash::digest(b"a");
        let b = Hash::digest(b"b");
        assert_ne!(MerkleTree::from_raw(vec![a, b]), MerkleTree::from_raw(vec![b, a]));
    }

    #[test]
    fn from_transactions_matches_explicit_hash_root() {
        let txs = vec![signed(mining_transaction(50)), signed(mining_transaction(60))];

        let hashes: Vec<Hash> = txs.iter().map(|tx| tx.hash().unwrap()).collect();
        let expected = MerkleTree::from_raw(hashes);

        assert_eq!(MerkleTree::from_transactions(&txs).unwrap(), expected);
    }
}
