use certchain_types::{Block, GENESIS_PREVIOUS_HASH};

use crate::hasher::{BlockHasher, HasherError};
use crate::pow::ProofOfWork;

/// Hash chain integrity verifier.
///
/// Verifies that a sequence of blocks forms a valid chain:
/// indices run 1, 2, 3, ... without gaps, each block's `previous_hash` is the
/// digest of the block before it, and each proof satisfies the work condition
/// against the previous block's proof.
pub struct HashChainVerifier;

impl HashChainVerifier {
    /// Verify a full chain, genesis first.
    pub fn verify_chain(blocks: &[Block], pow: &ProofOfWork) -> Result<(), ChainError> {
        let Some(genesis) = blocks.first() else {
            return Err(ChainError::EmptyChain);
        };

        if genesis.index != 1 {
            return Err(ChainError::IndexGap {
                position: 0,
                expected: 1,
                found: genesis.index,
            });
        }
        if genesis.previous_hash != GENESIS_PREVIOUS_HASH {
            return Err(ChainError::GenesisLinked);
        }

        for position in 1..blocks.len() {
            Self::verify_link(&blocks[position - 1], &blocks[position], position, pow)?;
        }

        Ok(())
    }

    /// Verify that `next` correctly extends `prev`.
    pub fn verify_link(
        prev: &Block,
        next: &Block,
        position: usize,
        pow: &ProofOfWork,
    ) -> Result<(), ChainError> {
        if next.index != prev.index + 1 {
            return Err(ChainError::IndexGap {
                position,
                expected: prev.index + 1,
                found: next.index,
            });
        }

        let prev_hash = BlockHasher::hash(prev)?;
        if next.previous_block_hash() != Some(prev_hash) {
            return Err(ChainError::BrokenLink { index: next.index });
        }

        if !pow.is_valid(prev.proof, next.proof) {
            return Err(ChainError::InvalidProof { index: next.index });
        }

        Ok(())
    }
}

/// Errors from chain verification.
#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
pub enum ChainError {
    #[error("chain has no genesis block")]
    EmptyChain,

    #[error("genesis block links to a previous hash")]
    GenesisLinked,

    #[error("index gap at position {position}: expected {expected}, found {found}")]
    IndexGap {
        position: usize,
        expected: u64,
        found: u64,
    },

    #[error("broken link at block {index}: previous_hash does not match")]
    BrokenLink { index: u64 },

    #[error("invalid proof at block {index}")]
    InvalidProof { index: u64 },

    #[error(transparent)]
    Hashing(#[from] HasherError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use certchain_types::{CertId, CertificateRecord, Grade};
    use chrono::Utc;

    fn pow() -> ProofOfWork {
        ProofOfWork::new(1).unwrap()
    }

    fn record(id: &str) -> CertificateRecord {
        CertificateRecord {
            name: "Alice".into(),
            cert_id: CertId::new(id).unwrap(),
            course: "Rust".into(),
            institution: "IFET".into(),
            date: "01/01/2024".into(),
            remarks: String::new(),
            grade: Grade::A,
        }
    }

    fn build_chain(count: usize) -> Vec<Block> {
        let pow = pow();
        let mut chain = vec![Block::genesis(Utc::now())];
        for i in 1..count {
            let prev = &chain[i - 1];
            let block = Block {
                index: prev.index + 1,
                timestamp: Utc::now(),
                transactions: vec![record(&format!("cert{i}"))],
                proof: pow.find(prev.proof),
                previous_hash: BlockHasher::hash(prev).unwrap().to_hex(),
            };
            chain.push(block);
        }
        chain
    }

    #[test]
    fn empty_chain_is_rejected() {
        assert_eq!(
            HashChainVerifier::verify_chain(&[], &pow()).unwrap_err(),
            ChainError::EmptyChain
        );
    }

    #[test]
    fn genesis_only_is_valid() {
        assert!(HashChainVerifier::verify_chain(&build_chain(1), &pow()).is_ok());
    }

    #[test]
    fn multi_block_chain_is_valid() {
        assert!(HashChainVerifier::verify_chain(&build_chain(5), &pow()).is_ok());
    }

    #[test]
    fn linked_genesis_is_rejected() {
        let mut chain = build_chain(1);
        chain[0].previous_hash = "abc".into();
        assert_eq!(
            HashChainVerifier::verify_chain(&chain, &pow()).unwrap_err(),
            ChainError::GenesisLinked
        );
    }

    #[test]
    fn tampered_block_breaks_next_link() {
        let mut chain = build_chain(4);
        chain[1].transactions[0].name = "Mallory".into();
        assert_eq!(
            HashChainVerifier::verify_chain(&chain, &pow()).unwrap_err(),
            ChainError::BrokenLink { index: 3 }
        );
    }

    #[test]
    fn index_gap_detected() {
        let mut chain = build_chain(3);
        chain[2].index = 7;
        assert_eq!(
            HashChainVerifier::verify_chain(&chain, &pow()).unwrap_err(),
            ChainError::IndexGap {
                position: 2,
                expected: 3,
                found: 7
            }
        );
    }

    #[test]
    fn invalid_proof_detected() {
        let pow = pow();
        let mut chain = build_chain(2);
        let bad = (0..)
            .find(|&c| !pow.is_valid(chain[0].proof, c))
            .unwrap();
        chain[1].proof = bad;
        assert_eq!(
            HashChainVerifier::verify_chain(&chain, &pow).unwrap_err(),
            ChainError::InvalidProof { index: 2 }
        );
    }
}
