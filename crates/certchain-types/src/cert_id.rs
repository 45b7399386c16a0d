use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Normalized certificate identifier.
///
/// Construction trims surrounding whitespace and uppercases, so `" cert001 "`,
/// `"Cert001"` and `"CERT001"` are the same key. Normalization is idempotent.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CertId(String);

impl CertId {
    /// Normalize `raw` into a certificate id. Blank input is rejected.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, TypeError> {
        let normalized = Self::normalize(raw.as_ref());
        if normalized.is_empty() {
            return Err(TypeError::EmptyCertId);
        }
        Ok(Self(normalized))
    }

    /// The normalization applied to every id and every lookup query.
    pub fn normalize(raw: &str) -> String {
        raw.trim().to_uppercase()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if `query` names this id after normalization.
    pub fn matches(&self, query: &str) -> bool {
        self.0 == Self::normalize(query)
    }
}

impl fmt::Debug for CertId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CertId({})", self.0)
    }
}

impl fmt::Display for CertId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CertId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for CertId {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CertId> for String {
    fn from(id: CertId) -> Self {
        id.0
    }
}

impl AsRef<str> for CertId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn trims_and_uppercases() {
        let id = CertId::new("  cert001 ").unwrap();
        assert_eq!(id.as_str(), "CERT001");
    }

    #[test]
    fn blank_is_rejected() {
        assert_eq!(CertId::new("   ").unwrap_err(), TypeError::EmptyCertId);
        assert_eq!(CertId::new("").unwrap_err(), TypeError::EmptyCertId);
    }

    #[test]
    fn query_variants_match() {
        let id = CertId::new("CERT001").unwrap();
        assert!(id.matches("cert001"));
        assert!(id.matches("CERT001"));
        assert!(id.matches(" Cert001 "));
        assert!(!id.matches("CERT002"));
    }

    #[test]
    fn deserialization_normalizes() {
        let id: CertId = serde_json::from_str("\" abc-9 \"").unwrap();
        assert_eq!(id.as_str(), "ABC-9");
        assert!(serde_json::from_str::<CertId>("\"  \"").is_err());
    }

    proptest! {
        #[test]
        fn normalization_is_idempotent(raw in "[ a-zA-Z0-9_-]{0,24}") {
            let once = CertId::normalize(&raw);
            prop_assert_eq!(CertId::normalize(&once), once.clone());
            if let Ok(id) = CertId::new(&raw) {
                prop_assert!(id.matches(&raw));
                prop_assert_eq!(id.as_str(), once.as_str());
            }
        }
    }
}
