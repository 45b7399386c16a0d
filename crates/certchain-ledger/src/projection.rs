use std::collections::BTreeMap;

use certchain_types::{CertificateRecord, Grade};
use serde::Serialize;

use crate::error::LedgerError;
use crate::traits::LedgerReader;

/// Admin dashboard view of the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DashboardProjection {
    pub pending: Vec<CertificateRecord>,
    /// Every sealed certificate, in chain order.
    pub mined: Vec<CertificateRecord>,
    pub total_mined: usize,
    /// Sealed certificates per grade; grades with no certificates are absent.
    pub grade_distribution: BTreeMap<Grade, usize>,
}

/// Deterministic projection builders.
pub struct ProjectionBuilder;

impl ProjectionBuilder {
    pub fn dashboard<R: LedgerReader>(reader: &R) -> Result<DashboardProjection, LedgerError> {
        let pending = reader.pending()?;
        let mined: Vec<CertificateRecord> = reader
            .chain()?
            .into_iter()
            .flat_map(|block| block.transactions)
            .collect();

        let mut grade_distribution = BTreeMap::new();
        for cert in &mined {
            *grade_distribution.entry(cert.grade).or_insert(0) += 1;
        }

        Ok(DashboardProjection {
            pending,
            total_mined: mined.len(),
            mined,
            grade_distribution,
        })
    }
}

#[cfg(test)]
mod tests {
    use certchain_crypto::ProofOfWork;
    use certchain_types::CertId;

    use crate::memory::InMemoryLedger;
    use crate::traits::LedgerWriter;

    use super::*;

    fn record(id: &str, grade: Grade) -> CertificateRecord {
        CertificateRecord {
            name: "Carol".into(),
            cert_id: CertId::new(id).unwrap(),
            course: "Networks".into(),
            institution: "IFET".into(),
            date: "03/03/2024".into(),
            remarks: String::new(),
            grade,
        }
    }

    #[test]
    fn empty_ledger_dashboard() {
        let ledger = InMemoryLedger::new(ProofOfWork::new(1).unwrap());
        let dashboard = ProjectionBuilder::dashboard(&ledger).unwrap();
        assert!(dashboard.pending.is_empty());
        assert_eq!(dashboard.total_mined, 0);
        assert!(dashboard.grade_distribution.is_empty());
    }

    #[test]
    fn counts_grades_of_mined_only() {
        let ledger = InMemoryLedger::new(ProofOfWork::new(1).unwrap());
        ledger.submit(record("G1", Grade::A)).unwrap();
        ledger.submit(record("G2", Grade::A)).unwrap();
        ledger.submit(record("G3", Grade::C)).unwrap();
        ledger.mine().unwrap();
        ledger.submit(record("G4", Grade::D)).unwrap();

        let dashboard = ProjectionBuilder::dashboard(&ledger).unwrap();
        assert_eq!(dashboard.total_mined, 3);
        assert_eq!(dashboard.pending.len(), 1);
        assert_eq!(dashboard.grade_distribution.get(&Grade::A), Some(&2));
        assert_eq!(dashboard.grade_distribution.get(&Grade::C), Some(&1));
        assert_eq!(dashboard.grade_distribution.get(&Grade::D), None);
    }

    #[test]
    fn distribution_serializes_with_grade_keys() {
        let ledger = InMemoryLedger::new(ProofOfWork::new(1).unwrap());
        ledger.submit(record("S1", Grade::BPlus)).unwrap();
        ledger.mine().unwrap();
        let value = serde_json::to_value(ProjectionBuilder::dashboard(&ledger).unwrap()).unwrap();
        assert_eq!(value["grade_distribution"]["B+"], 1);
    }
}
