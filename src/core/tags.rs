//! Class tag registry for every ledger type that goes on the wire.
//!
//! Tags are part of the persisted format: never renumber an existing entry.

use crate::types::class::{ClassTag, tags_are_distinct};

pub const BLOCK: ClassTag = ClassTag(0);
pub const TRANSACTION: ClassTag = ClassTag(1);
pub const INPUT: ClassTag = ClassTag(2);
pub const OUTPUT: ClassTag = ClassTag(3);
pub const HEADER: ClassTag = ClassTag(4);
pub const TXO: ClassTag = ClassTag(5);
pub const SIMPLE_OUTPUT: ClassTag = ClassTag(6);
pub const FEE_OUTPUT: ClassTag = ClassTag(7);
pub const OFFER_TRANSACTION: ClassTag = ClassTag(8);
pub const MATCH_TRANSACTION: ClassTag = ClassTag(9);
pub const CONFIRMATION_TRANSACTION: ClassTag = ClassTag(10);
pub const MINING_TRANSACTION: ClassTag = ClassTag(11);
pub const UNLOCK_DEPOSIT_TRANSACTION: ClassTag = ClassTag(12);
pub const SIGNED_TRANSACTION: ClassTag = ClassTag(13);

/// Every registered tag.
pub const ALL: [ClassTag; 14] = [
    BLOCK,
    TRANSACTION,
    INPUT,
    OUTPUT,
    HEADER,
    TXO,
    SIMPLE_OUTPUT,
    FEE_OUTPUT,
    OFFER_TRANSACTION,
    MATCH_TRANSACTION,
    CONFIRMATION_TRANSACTION,
    MINING_TRANSACTION,
    UNLOCK_DEPOSIT_TRANSACTION,
    SIGNED_TRANSACTION,
];

const _: () = assert!(tags_are_distinct(&ALL), "duplicate class tag in registry");

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::block::{Block, Header};
    use crate::core::output::{FeeOutput, Output, SimpleOutput};
    use crate::core::transaction::{
        ConfirmationTransaction, MatchTransaction, MiningTransaction, OfferTransaction,
        SignedTransaction, Transaction, UnlockDepositTransaction,
    };
    use crate::core::txo::{Input, Txo};
    use crate::types::class::Compound;

    #[test]
    fn registry_matches_type_tags() {
        let declared = [
            Block::CLASS_TAG,
            Transaction::CLASS_TAG,
            Input::CLASS_TAG,
            Output::CLASS_TAG,
            Header::CLASS_TAG,
            Txo::CLASS_TAG,
            SimpleOutput::CLASS_TAG,
            FeeOutput::CLASS_TAG,
            OfferTransaction::CLASS_TAG,
            MatchTransaction::CLASS_TAG,
            ConfirmationTransaction::CLASS_TAG,
            MiningTransaction::CLASS_TAG,
            UnlockDepositTransaction::CLASS_TAG,
            SignedTransaction::CLASS_TAG,
        ];
        assert_eq!(declared, ALL);
    }

    #[test]
    fn tags_are_dense_from_zero() {
        for (i, tag) in ALL.iter().enumerate() {
            assert_eq!(tag.0 as usize, i);
        }
    }
}
