use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::cert_id::CertId;
use crate::error::TypeError;

/// Grades offered by the issuing form.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Grade {
    #[default]
    #[serde(rename = "A+")]
    APlus,
    #[serde(rename = "A")]
    A,
    #[serde(rename = "B+")]
    BPlus,
    #[serde(rename = "B")]
    B,
    #[serde(rename = "C")]
    C,
    #[serde(rename = "D")]
    D,
}

impl Grade {
    /// Every grade, in the order the issuing form lists them.
    pub const ALL: [Grade; 6] = [
        Grade::APlus,
        Grade::A,
        Grade::BPlus,
        Grade::B,
        Grade::C,
        Grade::D,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::APlus => "A+",
            Self::A => "A",
            Self::BPlus => "B+",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Grade {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_uppercase();
        Self::ALL
            .into_iter()
            .find(|g| g.as_str() == wanted)
            .ok_or_else(|| TypeError::UnknownGrade(s.to_string()))
    }
}

/// An issued certificate. This is the transaction payload stored in the
/// pending set and, once sealed, in a block's transaction list.
///
/// Field contents are not validated here; blank names are rejected by the
/// issuing layer before a record is ever built.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateRecord {
    pub name: String,
    pub cert_id: CertId,
    pub course: String,
    pub institution: String,
    /// Free-text issue date, conventionally `DD/MM/YYYY`.
    pub date: String,
    pub remarks: String,
    pub grade: Grade,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> CertificateRecord {
        CertificateRecord {
            name: "Alice".into(),
            cert_id: CertId::new("cert001").unwrap(),
            course: "Rust".into(),
            institution: "IFET".into(),
            date: "01/02/2024".into(),
            remarks: "".into(),
            grade: Grade::BPlus,
        }
    }

    #[test]
    fn grade_parses_form_values() {
        assert_eq!("A+".parse::<Grade>().unwrap(), Grade::APlus);
        assert_eq!(" b+ ".parse::<Grade>().unwrap(), Grade::BPlus);
        assert_eq!("D".parse::<Grade>().unwrap(), Grade::D);
        assert_eq!(
            "E".parse::<Grade>().unwrap_err(),
            TypeError::UnknownGrade("E".into())
        );
    }

    #[test]
    fn grade_serializes_as_form_string() {
        assert_eq!(serde_json::to_string(&Grade::APlus).unwrap(), "\"A+\"");
        assert_eq!(Grade::default(), Grade::APlus);
    }

    #[test]
    fn record_json_field_names() {
        let value = serde_json::to_value(record()).unwrap();
        assert_eq!(value["cert_id"], "CERT001");
        assert_eq!(value["grade"], "B+");
        for key in ["name", "course", "institution", "date", "remarks"] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
    }
}
