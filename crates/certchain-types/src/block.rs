use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::certificate::CertificateRecord;
use crate::hash::BlockHash;

/// Proof recorded on the genesis block.
pub const GENESIS_PROOF: u64 = 100;

/// Sentinel `previous_hash` of the genesis block; it links to nothing.
pub const GENESIS_PREVIOUS_HASH: &str = "1";

/// A sealed batch of certificates.
///
/// Blocks are append-only: once in the chain they are never mutated or
/// removed. `previous_hash` is the hex digest of the prior block, except for
/// the genesis block which carries [`GENESIS_PREVIOUS_HASH`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// 1-based position in the chain.
    pub index: u64,
    pub timestamp: DateTime<Utc>,
    pub transactions: Vec<CertificateRecord>,
    pub proof: u64,
    pub previous_hash: String,
}

impl Block {
    /// The first block of every chain.
    pub fn genesis(timestamp: DateTime<Utc>) -> Self {
        Self {
            index: 1,
            timestamp,
            transactions: Vec::new(),
            proof: GENESIS_PROOF,
            previous_hash: GENESIS_PREVIOUS_HASH.to_string(),
        }
    }

    pub fn is_genesis(&self) -> bool {
        self.index == 1
    }

    /// The digest this block links back to, or `None` for the genesis
    /// sentinel or any other value that is not a 32-byte hex digest.
    pub fn previous_block_hash(&self) -> Option<BlockHash> {
        self.previous_hash.parse().ok()
    }

    /// Certificates sealed into this block.
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn genesis_shape() {
        let block = Block::genesis(Utc::now());
        assert!(block.is_genesis());
        assert!(block.is_empty());
        assert_eq!(block.proof, GENESIS_PROOF);
        assert_eq!(block.previous_hash, GENESIS_PREVIOUS_HASH);
    }

    #[test]
    fn previous_block_hash_parses_stored_link() {
        let mut block = Block::genesis(Utc::now());
        assert_eq!(block.previous_block_hash(), None);

        let link = BlockHash::from_hash([9; 32]);
        block.previous_hash = link.to_hex().to_uppercase();
        assert_eq!(block.previous_block_hash(), Some(link));
    }

    #[test]
    fn serde_roundtrip_preserves_timestamp() {
        let block = Block::genesis(Utc::now());
        let json = serde_json::to_string(&block).unwrap();
        let parsed: Block = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, block);
    }
}
