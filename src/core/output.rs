//! Transaction outputs.
//!
//! `Output` carries the value; concrete outputs derive from it and add their receiver.
//! [`TxOutput`] holds either concrete kind and decodes by peeking the class tag.

use crate::core::tags;
use crate::crypto::key_pair::Address;
use crate::types::hash::Hash;
use chasm_derive::Serializable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serializable)]
#[class(tag = tags::OUTPUT)]
pub struct Output {
    pub value: u64,
}

/// Pays `value` to `receiver`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serializable)]
#[class(tag = tags::SIMPLE_OUTPUT)]
pub struct SimpleOutput {
    #[class(base)]
    pub output: Output,
    pub receiver: Address,
}

/// Locks `value` as the fee of the offer hashed to `offer_hash`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serializable)]
#[class(tag = tags::FEE_OUTPUT)]
pub struct FeeOutput {
    #[class(base)]
    pub output: Output,
    pub offer_hash: Hash,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serializable)]
pub enum TxOutput {
    Simple(SimpleOutput),
    Fee(FeeOutput),
}

impl SimpleOutput {
    pub fn new(value: u64, receiver: Address) -> Self {
        Self {
            output: Output { value },
            receiver,
        }
    }
}

impl FeeOutput {
    pub fn new(value: u64, offer_hash: Hash) -> Self {
        Self {
            output: Output { value },
            offer_hash,
        }
    }
}

impl TxOutput {
    pub fn value(&self) -> u64 {
        match self {
            TxOutput::Simple(o) => o.output.value,
            TxOutput::Fee(o) => o.output.value,
        }
    }
}

impl From<SimpleOutput> for TxOutput {
    fn from(o: SimpleOutput) -> Self {
        TxOutput::Simple(o)
    }
}

impl From<FeeOutput> for TxOutput {
    fn from(o: FeeOutput) -> Self {
        TxOutput::Fee(o)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::key_pair::PublicKey;
    use crate::types::codec::{decode, encode};
    use crate::types::reader::DecodeError;

    #[test]
    fn simple_output_embeds_tagged_base() {
        let out = SimpleOutput::new(0x0a, PublicKey([0x02; 33]));
        let bytes = encode(&out).unwrap();
        assert_eq!(
            &bytes[..11],
            &[tags::SIMPLE_OUTPUT.0, tags::OUTPUT.0, 0x0a, 0, 0, 0, 0, 0, 0, 0, 0x02]
        );
        assert_eq!(bytes.len(), 1 + 1 + 8 + 33);
        assert_eq!(decode::<SimpleOutput>(&bytes).unwrap(), out);
    }

    #[test]
    fn sum_type_dispatches_on_tag() {
        let outputs = vec![
            TxOutput::from(SimpleOutput::new(5, PublicKey([0x03; 33]))),
            TxOutput::from(FeeOutput::new(1, Hash([0xee; 32]))),
        ];
        let bytes = encode(&outputs).unwrap();
        let decoded: Vec<TxOutput> = decode(&bytes).unwrap();
        assert_eq!(decoded, outputs);
        assert_eq!(decoded.iter().map(TxOutput::value).sum::<u64>(), 6);
    }

    #[test]
    fn sum_type_encodes_like_its_variant() {
        let fee = FeeOutput::new(9, Hash::zero());
        assert_eq!(
            encode(&TxOutput::Fee(fee)).unwrap(),
            encode(&fee).unwrap()
        );
    }

    #[test]
    fn bare_base_is_not_an_output_variant() {
        let bytes = encode(&Output { value: 1 }).unwrap();
        assert_eq!(
            decode::<TxOutput>(&bytes).unwrap_err(),
            DecodeError::TagMismatch {
                type_name: "TxOutput",
                found: tags::OUTPUT
            }
        );
    }
}
