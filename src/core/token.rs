//! Exchangeable tokens and the proofs that tie offers to other ledgers.
//!
//! The ledger only stores inclusion proofs as opaque bytes. Interpreting them is up to
//! the [`Token`] implementation registered for the token id.

use chasm_derive::Serializable;
use std::collections::BTreeMap;
use std::fmt;

/// Identifier of an exchangeable token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serializable)]
#[class(transparent)]
pub struct TokenId(pub u16);

impl TokenId {
    pub const XPEER_COIN: TokenId = TokenId(0);
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "token#{}", self.0)
    }
}

/// Encoded proof that a transaction was included in another token's ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serializable)]
#[class(transparent)]
pub struct InclusionProof(pub Vec<u8>);

impl InclusionProof {
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    /// Interprets the proof bytes with `token`'s rules.
    pub fn resolve(&self, token: &dyn Token) -> Option<Box<dyn TransactionInclusionProof>> {
        token.build_proof(&self.0)
    }
}

impl From<Vec<u8>> for InclusionProof {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

/// A decoded inclusion proof.
pub trait TransactionInclusionProof {
    /// Returns `true` when the proof checks out against its token's ledger.
    fn validate(&self) -> bool;
}

/// An address on a token's own ledger.
pub trait TokenAddress: fmt::Debug {
    fn as_bytes(&self) -> &[u8];
}

/// Rules for one exchangeable token.
pub trait Token: Send + Sync {
    fn id(&self) -> TokenId;

    /// Parses proof bytes, `None` if they are malformed.
    fn build_proof(&self, bytes: &[u8]) -> Option<Box<dyn TransactionInclusionProof>>;

    /// Parses address bytes, `None` if they are malformed.
    fn build_address(&self, bytes: &[u8]) -> Option<Box<dyn TokenAddress>>;
}

/// Token implementations indexed by id.
#[derive(Default)]
pub struct TokenRegistry {
    tokens: BTreeMap<TokenId, Box<dyn Token>>,
}

impl TokenRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `token` under its own id, returning the implementation it replaces.
    pub fn register(&mut self, token: Box<dyn Token>) -> Option<Box<dyn Token>> {
        self.tokens.insert(token.id(), token)
    }

    pub fn get(&self, id: TokenId) -> Option<&dyn Token> {
        self.tokens.get(&id).map(|t| t.as_ref())
    }

    pub fn contains(&self, id: TokenId) -> bool {
        self.tokens.contains_key(&id)
    }

    pub fn ids(&self) -> impl Iterator<Item = TokenId> + '_ {
        self.tokens.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
