use certchain_types::{Block, CertificateRecord};
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;
use crate::lookup::LookupOutcome;

/// Where a freshly submitted certificate will land.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitReceipt {
    /// Index of the block the certificate is sealed into on the next seal.
    pub block_index: u64,
    /// 1-based position inside that block's transaction list.
    pub position: usize,
}

/// Write boundary for ledger mutations.
pub trait LedgerWriter: Send + Sync {
    /// Append a certificate to the pending set. Field contents are not validated.
    fn submit(&self, record: CertificateRecord) -> Result<SubmitReceipt, LedgerError>;

    /// Seal the pending set into a new block carrying `proof` and `previous_hash`.
    fn seal(&self, proof: u64, previous_hash: &str) -> Result<Block, LedgerError>;
}

/// Read boundary for ledger queries.
pub trait LedgerReader: Send + Sync {
    /// Every sealed block, genesis first.
    fn chain(&self) -> Result<Vec<Block>, LedgerError>;

    /// Certificates awaiting the next seal, in submission order.
    fn pending(&self) -> Result<Vec<CertificateRecord>, LedgerError>;

    fn last_block(&self) -> Result<Block, LedgerError>;

    fn block(&self, index: u64) -> Result<Option<Block>, LedgerError>;

    /// Number of blocks, genesis included.
    fn len(&self) -> Result<u64, LedgerError>;

    fn pending_len(&self) -> Result<usize, LedgerError>;

    /// Look a certificate up by id: mined blocks first, then the pending set.
    fn find(&self, cert_id: &str) -> Result<LookupOutcome, LedgerError>;
}
