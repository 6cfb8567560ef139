//! Test utilities for ledger testing.

#[cfg(test)]
pub mod utils {
    use crate::core::output::{FeeOutput, SimpleOutput};
    use crate::core::token::TokenId;
    use crate::core::transaction::{
        MiningTransaction, OfferTransaction, SignedTransaction, Transaction, TransactionKind,
    };
    use crate::core::txo::Input;
    use crate::crypto::key_pair::{PUBLIC_KEY_LEN, PublicKey};
    use crate::types::hash::{HASH_LEN, Hash};
    use std::sync::atomic::{AtomicU64, Ordering};

    static COUNTER: AtomicU64 = AtomicU64::new(1);

    /// Distinct hash on every call.
    pub fn random_hash() -> Hash {
        let n = COUNTER.fetch_add(1, Ordering::Relaxed);
        let mut value = [0u8; HASH_LEN];
        value[..8].copy_from_slice(&n.to_le_bytes());
        Hash(value)
    }

    /// A transaction spending `inputs` fresh outputs into one simple output and a fee.
    pub fn spending(inputs: usize) -> Transaction {
        Transaction {
            inputs: (0..inputs)
                .map(|i| Input::new(random_hash(), i as u16))
                .collect(),
            outputs: vec![
                SimpleOutput::new(100, PublicKey([0x02; PUBLIC_KEY_LEN])).into(),
                FeeOutput::new(2, random_hash()).into(),
            ],
        }
    }

    /// Mining reward paying `value`.
    pub fn mining_transaction(value: u64) -> MiningTransaction {
        MiningTransaction {
            transaction: Transaction {
                inputs: vec![],
                outputs: vec![SimpleOutput::new(value, PublicKey([0x03; PUBLIC_KEY_LEN])).into()],
            },
        }
    }

    pub fn offer_transaction(transaction: Transaction) -> OfferTransaction {
        OfferTransaction {
            transaction,
            token_in: TokenId::XPEER_COIN,
            value_in: 1_000,
            token_out: TokenId(7),
            value_out: 25,
            address: PublicKey([0x02; PUBLIC_KEY_LEN]),
            offer_timeout: 1_541_980_800,
            nonce: 1,
            confirmation_fee_index: 1,
            bail_index: 0,
        }
    }

    /// Wraps an input-less mining transaction, which needs no signatures.
    pub fn signed(tx: MiningTransaction) -> SignedTransaction {
        SignedTransaction {
            transaction: Box::new(TransactionKind::Mining(tx)),
            signatures: vec![],
        }
    }
}
