use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use certchain_crypto::{BlockHasher, ProofOfWork};
use certchain_types::{Block, BlockHash, CertificateRecord};
use chrono::Utc;

use crate::error::LedgerError;
use crate::lookup::{self, LookupOutcome};
use crate::traits::{LedgerReader, LedgerWriter, SubmitReceipt};
use crate::validation::{ChainReport, ChainValidator};

/// In-memory certificate ledger.
///
/// One instance is built per process and shared (behind an `Arc`) by the
/// console and the HTTP server, so both surfaces see the same pending set and
/// chain. Every operation goes through a single `RwLock`.
pub struct InMemoryLedger {
    pow: ProofOfWork,
    inner: RwLock<LedgerState>,
}

struct LedgerState {
    chain: Vec<Block>,
    pending: Vec<CertificateRecord>,
}

impl InMemoryLedger {
    /// Create a ledger holding only a genesis block.
    pub fn new(pow: ProofOfWork) -> Self {
        Self {
            pow,
            inner: RwLock::new(LedgerState {
                chain: vec![Block::genesis(Utc::now())],
                pending: Vec::new(),
            }),
        }
    }

    /// The work condition this ledger seals against.
    pub fn pow(&self) -> &ProofOfWork {
        &self.pow
    }

    /// Digest used as the next block's `previous_hash`.
    pub fn hash(block: &Block) -> Result<BlockHash, LedgerError> {
        Ok(BlockHasher::hash(block)?)
    }

    /// Search for a proof against the current last block and seal with it.
    ///
    /// The search runs without holding the lock. If another seal lands first
    /// the back-link check in [`LedgerWriter::seal`] rejects this one with
    /// [`LedgerError::StalePreviousHash`] and the pending set is untouched.
    pub fn mine(&self) -> Result<Block, LedgerError> {
        let last = self.last_block()?;
        let previous_hash = Self::hash(&last)?;
        let proof = self.pow.find(last.proof);
        self.seal(proof, &previous_hash.to_hex())
    }

    /// Verify hash linkage and proofs across the whole chain.
    pub fn validate_chain(&self) -> Result<ChainReport, LedgerError> {
        ChainValidator::validate(self, &self.pow)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, LedgerState>, LedgerError> {
        self.inner
            .read()
            .map_err(|_| LedgerError::LockPoisoned("read"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, LedgerState>, LedgerError> {
        self.inner
            .write()
            .map_err(|_| LedgerError::LockPoisoned("write"))
    }
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new(ProofOfWork::default())
    }
}

impl LedgerWriter for InMemoryLedger {
    fn submit(&self, record: CertificateRecord) -> Result<SubmitReceipt, LedgerError> {
        let mut state = self.write()?;
        let block_index = state.chain.last().map(|b| b.index).unwrap_or(0) + 1;
        tracing::debug!(cert_id = %record.cert_id, block_index, "certificate submitted");
        state.pending.push(record);
        Ok(SubmitReceipt {
            block_index,
            position: state.pending.len(),
        })
    }

    fn seal(&self, proof: u64, previous_hash: &str) -> Result<Block, LedgerError> {
        let mut state = self.write()?;
        let last = state
            .chain
            .last()
            .ok_or(LedgerError::BlockNotFound(1))?;

        let expected = Self::hash(last)?;
        if previous_hash.parse::<BlockHash>().ok() != Some(expected) {
            tracing::warn!(
                expected = %expected,
                found = previous_hash,
                "seal rejected: stale previous hash"
            );
            return Err(LedgerError::StalePreviousHash {
                expected: expected.to_hex(),
                found: previous_hash.to_string(),
            });
        }

        let index = last.index + 1;
        if !self.pow.is_valid(last.proof, proof) {
            tracing::warn!(index, proof, "seal rejected: invalid proof");
            return Err(LedgerError::InvalidProof { index, proof });
        }

        let block = Block {
            index,
            timestamp: Utc::now(),
            transactions: std::mem::take(&mut state.pending),
            proof,
            previous_hash: expected.to_hex(),
        };
        if block.is_empty() {
            tracing::warn!(index, "sealing a block with no pending certificates");
        }
        tracing::info!(index, certificates = block.len(), proof, "block sealed");

        state.chain.push(block.clone());
        Ok(block)
    }
}

impl LedgerReader for InMemoryLedger {
    fn chain(&self) -> Result<Vec<Block>, LedgerError> {
        Ok(self.read()?.chain.clone())
    }

    fn pending(&self) -> Result<Vec<CertificateRecord>, LedgerError> {
        Ok(self.read()?.pending.clone())
    }

    fn last_block(&self) -> Result<Block, LedgerError> {
        self.read()?
            .chain
            .last()
            .cloned()
            .ok_or(LedgerError::BlockNotFound(1))
    }

    fn block(&self, index: u64) -> Result<Option<Block>, LedgerError> {
        if index == 0 {
            return Ok(None);
        }
        Ok(self.read()?.chain.get((index - 1) as usize).cloned())
    }

    fn len(&self) -> Result<u64, LedgerError> {
        Ok(self.read()?.chain.len() as u64)
    }

    fn pending_len(&self) -> Result<usize, LedgerError> {
        Ok(self.read()?.pending.len())
    }

    fn find(&self, cert_id: &str) -> Result<LookupOutcome, LedgerError> {
        let state = self.read()?;
        let outcome = lookup::scan(&state.chain, &state.pending, cert_id);
        tracing::debug!(query = cert_id, status = ?outcome.status(), "certificate lookup");
        Ok(outcome)
    }
}
