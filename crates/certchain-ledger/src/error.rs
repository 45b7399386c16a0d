/// Errors produced by ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("previous hash {found} does not match the last block ({expected})")]
    StalePreviousHash { expected: String, found: String },

    #[error("proof {proof} does not satisfy the work condition for block {index}")]
    InvalidProof { index: u64, proof: u64 },

    #[error("block {0} not found")]
    BlockNotFound(u64),

    #[error("ledger {0} lock poisoned")]
    LockPoisoned(&'static str),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<certchain_crypto::HasherError> for LedgerError {
    fn from(err: certchain_crypto::HasherError) -> Self {
        match err {
            certchain_crypto::HasherError::Serialization(msg) => Self::Serialization(msg),
        }
    }
}
