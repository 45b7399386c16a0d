use certchain_types::{Block, BlockHash};

/// Domain-separated BLAKE3 block hasher.
///
/// The domain tag is prepended to every hash computation so a block digest
/// can never collide with a digest of some other structure that happens to
/// share its bytes.
pub struct BlockHasher {
    domain: &'static str,
}

impl BlockHasher {
    /// Hasher for sealed blocks.
    pub const BLOCK: Self = Self {
        domain: "certchain-block-v1",
    };

    /// Hash raw bytes with domain separation.
    pub fn hash_bytes(&self, data: &[u8]) -> BlockHash {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.domain.as_bytes());
        hasher.update(b":");
        hasher.update(data);
        BlockHash::from_hash(*hasher.finalize().as_bytes())
    }

    /// Hash a block over its canonical JSON serialization.
    ///
    /// Field order is fixed by the `Block` definition, so the same field
    /// values always produce the same digest.
    pub fn hash_block(&self, block: &Block) -> Result<BlockHash, HasherError> {
        let data =
            serde_json::to_vec(block).map_err(|e| HasherError::Serialization(e.to_string()))?;
        Ok(self.hash_bytes(&data))
    }

    /// Shorthand for `BlockHasher::BLOCK.hash_block(block)`.
    pub fn hash(block: &Block) -> Result<BlockHash, HasherError> {
        Self::BLOCK.hash_block(block)
    }

    /// Raw BLAKE3 hash without domain separation (used by the work condition).
    pub fn raw_hash(data: &[u8]) -> [u8; 32] {
        *blake3::hash(data).as_bytes()
    }
}

/// Errors from hashing operations.
#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
pub enum HasherError {
    #[error("serialization error: {0}")]
    Serialization(String),
}
