//! Ledger transactions.
//!
//! Every transaction kind derives from [`Transaction`], which holds the inputs it spends
//! and the outputs it creates. A [`SignedTransaction`] wraps one kind together with one
//! signature per input, in input order.

use crate::core::output::TxOutput;
use crate::core::tags;
use crate::core::token::{InclusionProof, TokenId};
use crate::core::txo::{Input, OutIndex};
use crate::crypto::key_pair::{self, Address, CryptoError, PrivateKey, PublicKey, Signature};
use crate::types::hash::Hash;
use crate::types::writer::EncodeError;
use chasm_derive::{Error, Serializable};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransactionError {
    #[error("cannot encode transaction: {source}")]
    Encode { source: EncodeError },

    #[error("signing failed: {source}")]
    Crypto { source: CryptoError },

    #[error("transaction has {inputs} inputs but {keys} signing keys were given")]
    KeyCount { inputs: usize, keys: usize },
}

impl From<EncodeError> for TransactionError {
    fn from(source: EncodeError) -> Self {
        TransactionError::Encode { source }
    }
}

impl From<CryptoError> for TransactionError {
    fn from(source: CryptoError) -> Self {
        TransactionError::Crypto { source }
    }
}

/// Inputs spent and outputs created.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serializable)]
#[class(tag = tags::TRANSACTION)]
pub struct Transaction {
    pub inputs: Vec<Input>,
    pub outputs: Vec<TxOutput>,
}

/// Offers `value_out` of `token_out` in exchange for `value_in` of `token_in`.
#[derive(Debug, Clone, PartialEq, Eq, Serializable)]
#[class(tag = tags::OFFER_TRANSACTION)]
pub struct OfferTransaction {
    #[class(base)]
    pub transaction: Transaction,
    pub token_in: TokenId,
    pub value_in: u64,
    pub token_out: TokenId,
    pub value_out: u64,
    pub address: Address,
    pub offer_timeout: u64,
    pub nonce: u16,
    pub confirmation_fee_index: OutIndex,
    pub bail_index: OutIndex,
}

/// Accepts the offer hashed to `offer_hash`.
#[derive(Debug, Clone, PartialEq, Eq, Serializable)]
#[class(tag = tags::MATCH_TRANSACTION)]
pub struct MatchTransaction {
    #[class(base)]
    pub transaction: Transaction,
    pub offer_hash: Hash,
    pub address: Address,
    pub confirmation_fee_index: OutIndex,
    pub bail_index: OutIndex,
}

/// Proves both legs of a matched offer were paid on their own ledgers.
#[derive(Debug, Clone, PartialEq, Eq, Serializable)]
#[class(tag = tags::CONFIRMATION_TRANSACTION)]
pub struct ConfirmationTransaction {
    #[class(base)]
    pub transaction: Transaction,
    pub offer_hash: Hash,
    pub proof_token_in: Box<InclusionProof>,
    pub proof_token_out: Box<InclusionProof>,
}

/// Mints the block reward.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serializable)]
#[class(tag = tags::MINING_TRANSACTION)]
pub struct MiningTransaction {
    #[class(base)]
    pub transaction: Transaction,
}

/// Releases the bail of an offer once `proof` shows `token` was paid.
#[derive(Debug, Clone, PartialEq, Eq, Serializable)]
#[class(tag = tags::UNLOCK_DEPOSIT_TRANSACTION)]
pub struct UnlockDepositTransaction {
    #[class(base)]
    pub transaction: Transaction,
    pub offer_hash: Hash,
    pub token: TokenId,
    pub proof: InclusionProof,
    pub bail_index: OutIndex,
}

/// Any transaction kind. Decodes by peeking the class tag.
#[derive(Debug, Clone, PartialEq, Eq, Serializable)]
pub enum TransactionKind {
    Plain(Transaction),
    Offer(OfferTransaction),
    Match(MatchTransaction),
    Confirmation(ConfirmationTransaction),
    Mining(MiningTransaction),
    UnlockDeposit(UnlockDepositTransaction),
}

impl TransactionKind {
    /// The inputs and outputs common to every kind.
    pub fn base(&self) -> &Transaction {
        match self {
            TransactionKind::Plain(tx) => tx,
            TransactionKind::Offer(tx) => &tx.transaction,
            TransactionKind::Match(tx) => &tx.transaction,
            TransactionKind::Confirmation(tx) => &tx.transaction,
            TransactionKind::Mining(tx) => &tx.transaction,
            TransactionKind::UnlockDeposit(tx) => &tx.transaction,
        }
    }

    /// SHA-256 of the encoded transaction: the message each input signs.
    pub fn signing_hash(&self) -> Result<Hash, EncodeError> {
        Hash::of(self)
    }
}

/// A transaction with one signature per input.
#[derive(Debug, Clone, PartialEq, Eq, Serializable)]
#[class(tag = tags::SIGNED_TRANSACTION)]
pub struct SignedTransaction {
    pub transaction: Box<TransactionKind>,
    pub signatures: Vec<Signature>,
}

impl SignedTransaction {
    /// Signs `transaction` with `keys`, which must line up with its inputs.
    pub fn sign(
        transaction: TransactionKind,
        keys: &[&PrivateKey],
    ) -> Result<Self, TransactionError> {
        let inputs = transaction.base().inputs.len();
        if keys.len() != inputs {
            return Err(TransactionError::KeyCount {
                inputs,
                keys: keys.len(),
            });
        }

        let hash = transaction.signing_hash()?;
        let signatures = keys
            .iter()
            .map(|key| key_pair::sign(key, hash.as_slice()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            transaction: Box::new(transaction),
            signatures,
        })
    }

    /// Checks every signature against the owner key of the matching input.
    ///
    /// Returns `Ok(false)` if any signature fails or the counts do not line up.
    pub fn verify(&self, owners: &[PublicKey]) -> Result<bool, TransactionError> {
        let inputs = self.transaction.base().inputs.len();
        if owners.len() != inputs || self.signatures.len() != inputs {
            return Ok(false);
        }

        let hash = self.transaction.signing_hash()?;
        for (owner, signature) in owners.iter().zip(&self.signatures) {
            if !key_pair::verify(owner, signature, hash.as_slice())? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// SHA-256 of the full encoding, signatures included.
    pub fn hash(&self) -> Result<Hash, EncodeError> {
        Hash::of(self)
    }
}
