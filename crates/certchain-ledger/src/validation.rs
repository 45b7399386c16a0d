use certchain_crypto::{ChainError, HashChainVerifier, ProofOfWork};
use serde::{Serialize, Serializer};

use crate::error::LedgerError;
use crate::traits::LedgerReader;

/// Result of validating the chain on read.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChainReport {
    pub block_count: u64,
    pub pending_count: usize,
    /// Certificates sealed across all blocks.
    pub certificate_count: usize,
    pub difficulty: u32,
    pub valid: bool,
    /// First violation found, if any.
    #[serde(serialize_with = "display_error")]
    pub error: Option<ChainError>,
}

/// Chain integrity validator.
pub struct ChainValidator;

impl ChainValidator {
    pub fn validate<R: LedgerReader>(
        reader: &R,
        pow: &ProofOfWork,
    ) -> Result<ChainReport, LedgerError> {
        let chain = reader.chain()?;
        let pending_count = reader.pending_len()?;
        let error = HashChainVerifier::verify_chain(&chain, pow).err();

        if let Some(e) = &error {
            tracing::warn!(error = %e, "chain validation failed");
        }

        Ok(ChainReport {
            block_count: chain.len() as u64,
            pending_count,
            certificate_count: chain.iter().map(|b| b.len()).sum(),
            difficulty: pow.difficulty(),
            valid: error.is_none(),
            error,
        })
    }
}

fn display_error<S: Serializer>(error: &Option<ChainError>, s: S) -> Result<S::Ok, S::Error> {
    match error {
        Some(e) => s.serialize_some(&e.to_string()),
        None => s.serialize_none(),
    }
}

#[cfg(test)]
mod tests {
    use certchain_types::{CertId, CertificateRecord, Grade};

    use crate::memory::InMemoryLedger;
    use crate::traits::LedgerWriter;

    use super::*;

    fn record(id: &str) -> CertificateRecord {
        CertificateRecord {
            name: "Bob".into(),
            cert_id: CertId::new(id).unwrap(),
            course: "Systems".into(),
            institution: "IFET".into(),
            date: "02/02/2024".into(),
            remarks: String::new(),
            grade: Grade::B,
        }
    }

    #[test]
    fn fresh_ledger_is_valid() {
        let pow = ProofOfWork::new(1).unwrap();
        let ledger = InMemoryLedger::new(pow);
        let report = ChainValidator::validate(&ledger, &pow).unwrap();
        assert!(report.valid);
        assert_eq!(report.block_count, 1);
        assert_eq!(report.certificate_count, 0);
    }

    #[test]
    fn counts_sealed_and_pending() {
        let pow = ProofOfWork::new(1).unwrap();
        let ledger = InMemoryLedger::new(pow);
        ledger.submit(record("A")).unwrap();
        ledger.submit(record("B")).unwrap();
        ledger.mine().unwrap();
        ledger.submit(record("C")).unwrap();

        let report = ChainValidator::validate(&ledger, &pow).unwrap();
        assert!(report.valid);
        assert_eq!(report.block_count, 2);
        assert_eq!(report.certificate_count, 2);
        assert_eq!(report.pending_count, 1);
    }

    #[test]
    fn report_serializes_error_as_text() {
        let report = ChainReport {
            block_count: 0,
            pending_count: 0,
            certificate_count: 0,
            difficulty: 1,
            valid: false,
            error: Some(ChainError::EmptyChain),
        };
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["error"], "chain has no genesis block");
    }
}
