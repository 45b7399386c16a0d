use certchain_types::{Block, CertId, CertificateRecord};
use serde::{Deserialize, Serialize};

/// Result of a certificate lookup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LookupOutcome {
    /// Found in a sealed block.
    Mined {
        block_index: u64,
        certificate: CertificateRecord,
    },
    /// Found in the pending set, not yet sealed.
    Pending { certificate: CertificateRecord },
    NotFound,
}

/// Status tag of a [`LookupOutcome`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupStatus {
    Mined,
    Pending,
    NotFound,
}

impl LookupOutcome {
    pub fn status(&self) -> LookupStatus {
        match self {
            Self::Mined { .. } => LookupStatus::Mined,
            Self::Pending { .. } => LookupStatus::Pending,
            Self::NotFound => LookupStatus::NotFound,
        }
    }

    pub fn certificate(&self) -> Option<&CertificateRecord> {
        match self {
            Self::Mined { certificate, .. } | Self::Pending { certificate } => Some(certificate),
            Self::NotFound => None,
        }
    }

    pub fn is_found(&self) -> bool {
        !matches!(self, Self::NotFound)
    }
}

/// Scan `chain` then `pending` for the first certificate matching `query`.
///
/// The query is normalized the same way ids are. Blocks are visited in chain
/// order and transactions in insertion order, so when an id occurs more than
/// once only the earliest mined occurrence (or, failing that, the earliest
/// pending one) is ever returned.
pub fn scan(chain: &[Block], pending: &[CertificateRecord], query: &str) -> LookupOutcome {
    let wanted = CertId::normalize(query);
    if wanted.is_empty() {
        return LookupOutcome::NotFound;
    }

    for block in chain {
        if let Some(cert) = block
            .transactions
            .iter()
            .find(|c| c.cert_id.as_str() == wanted)
        {
            return LookupOutcome::Mined {
                block_index: block.index,
                certificate: cert.clone(),
            };
        }
    }

    pending
        .iter()
        .find(|c| c.cert_id.as_str() == wanted)
        .map(|cert| LookupOutcome::Pending {
            certificate: cert.clone(),
        })
        .unwrap_or(LookupOutcome::NotFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use certchain_types::Grade;
    use chrono::Utc;

    fn record(id: &str, name: &str) -> CertificateRecord {
        CertificateRecord {
            name: name.into(),
            cert_id: CertId::new(id).unwrap(),
            course: "Rust".into(),
            institution: "IFET".into(),
            date: "01/01/2024".into(),
            remarks: String::new(),
            grade: Grade::A,
        }
    }

    fn block(index: u64, transactions: Vec<CertificateRecord>) -> Block {
        Block {
            index,
            timestamp: Utc::now(),
            transactions,
            proof: 0,
            previous_hash: "1".into(),
        }
    }

    #[test]
    fn mined_wins_over_pending() {
        let chain = vec![block(1, vec![]), block(2, vec![record("CERT001", "Mined")])];
        let pending = vec![record("CERT001", "Pending")];
        let outcome = scan(&chain, &pending, "cert001");
        assert_eq!(
            outcome,
            LookupOutcome::Mined {
                block_index: 2,
                certificate: record("CERT001", "Mined")
            }
        );
    }

    #[test]
    fn earliest_block_wins() {
        let chain = vec![
            block(1, vec![]),
            block(2, vec![record("X", "first")]),
            block(3, vec![record("X", "second")]),
        ];
        let outcome = scan(&chain, &[], "x");
        assert_eq!(outcome.certificate().unwrap().name, "first");
    }

    #[test]
    fn duplicate_pending_returns_first_inserted() {
        let pending = vec![record("DUP", "one"), record("DUP", "two")];
        let outcome = scan(&[], &pending, "dup");
        assert_eq!(outcome.status(), LookupStatus::Pending);
        assert_eq!(outcome.certificate().unwrap().name, "one");
    }

    #[test]
    fn miss_and_blank_query_are_not_found() {
        let pending = vec![record("A1", "a")];
        assert_eq!(scan(&[], &pending, "B1"), LookupOutcome::NotFound);
        assert_eq!(scan(&[], &pending, "   "), LookupOutcome::NotFound);
        assert!(!LookupOutcome::NotFound.is_found());
    }

    #[test]
    fn status_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&LookupStatus::NotFound).unwrap(),
            "\"not_found\""
        );
    }

    mod prop {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn lookup_ignores_case_and_padding(id in "[A-Z0-9]{1,12}", pad in " {0,3}") {
                let pending = vec![record(&id, "p")];
                let query = format!("{pad}{}{pad}", id.to_lowercase());
                prop_assert_eq!(scan(&[], &pending, &query).status(), LookupStatus::Pending);
            }

            #[test]
            fn mined_copy_always_shadows_pending(id in "[A-Z]{1,8}", depth in 1u64..5) {
                let mut chain: Vec<Block> = (1..=depth).map(|i| block(i, vec![])).collect();
                chain.push(block(depth + 1, vec![record(&id, "mined")]));
                let pending = vec![record(&id, "pending")];
                match scan(&chain, &pending, &id) {
                    LookupOutcome::Mined { block_index, certificate } => {
                        prop_assert_eq!(block_index, depth + 1);
                        prop_assert_eq!(certificate.name, "mined");
                    }
                    other => prop_assert!(false, "expected mined, got {:?}", other),
                }
            }
        }
    }
}
