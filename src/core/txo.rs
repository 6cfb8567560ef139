//! References to transaction outputs and the inputs that spend them.

use crate::core::tags;
use crate::types::hash::Hash;
use chasm_derive::Serializable;

/// Index of an output inside its transaction.
pub type OutIndex = u16;

/// Points at output `index` of the transaction hashed to `tx_hash`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serializable)]
#[class(tag = tags::TXO)]
pub struct Txo {
    pub tx_hash: Hash,
    pub index: OutIndex,
}

/// Spends a previously created output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serializable)]
#[class(tag = tags::INPUT)]
pub struct Input {
    pub utxo: Txo,
}

impl Input {
    pub fn new(tx_hash: Hash, index: OutIndex) -> Self {
        Self {
            utxo: Txo { tx_hash, index },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::codec::{decode, encode};
    use crate::types::reader::DecodeError;

    #[test]
    fn txo_layout() {
        let txo = Txo {
            tx_hash: Hash([0x11; 32]),
            index: 0x0102,
        };
        let bytes = encode(&txo).unwrap();
        assert_eq!(bytes.len(), 1 + 32 + 2);
        assert_eq!(bytes[0], tags::TXO.0);
        assert_eq!(&bytes[1..33], &[0x11; 32]);
        assert_eq!(&bytes[33..], &[0x02, 0x01]);
    }

    #[test]
    fn input_nests_tagged_txo() {
        let input = Input::new(Hash::zero(), 3);
        let bytes = encode(&input).unwrap();
        assert_eq!(&bytes[..2], &[tags::INPUT.0, tags::TXO.0]);
        assert_eq!(decode::<Input>(&bytes).unwrap(), input);
    }

    #[test]
    fn txo_bytes_do_not_decode_as_input() {
        let bytes = encode(&Txo {
            tx_hash: Hash::zero(),
            index: 0,
        })
        .unwrap();
        assert!(matches!(
            decode::<Input>(&bytes),
            Err(DecodeError::TagMismatch { found, .. }) if found == tags::TXO
        ));
    }
}
