use certchain_ledger::SubmitReceipt;
use certchain_render::RenderedCertificate;
use certchain_types::{CertId, CertificateRecord, Grade};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{RegistryError, RegistryResult};

pub const DEFAULT_REMARKS: &str = "Successfully completed the course with excellence.";

/// Date format used on certificates (`dd/mm/YYYY`).
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// A certificate as entered by an operator.
///
/// `date`, `remarks` and `grade` are optional. An absent or blank date or
/// grade takes the issuing default; remarks take the default only when
/// absent, so `Some("")` issues a certificate without remarks.
///
/// Absent required fields deserialize as blank and are rejected by
/// [`IssueRequest::into_record`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IssueRequest {
    pub name: String,
    pub cert_id: String,
    pub course: String,
    pub institution: String,
    pub date: Option<String>,
    pub remarks: Option<String>,
    pub grade: Option<Grade>,
}

impl IssueRequest {
    pub fn new(
        name: impl Into<String>,
        cert_id: impl Into<String>,
        course: impl Into<String>,
        institution: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            cert_id: cert_id.into(),
            course: course.into(),
            institution: institution.into(),
            ..Self::default()
        }
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn with_remarks(mut self, remarks: impl Into<String>) -> Self {
        self.remarks = Some(remarks.into());
        self
    }

    pub fn with_grade(mut self, grade: Grade) -> Self {
        self.grade = Some(grade);
        self
    }

    /// Check required fields and build the ledger record.
    pub fn into_record(self, today: NaiveDate) -> RegistryResult<CertificateRecord> {
        let name = required("name", self.name)?;
        let cert_id = required("cert_id", self.cert_id)?;
        let course = required("course", self.course)?;
        let institution = required("institution", self.institution)?;

        Ok(CertificateRecord {
            name,
            cert_id: CertId::new(&cert_id)?,
            course,
            institution,
            date: or_default(self.date, || today.format(DATE_FORMAT).to_string()),
            remarks: match self.remarks {
                Some(remarks) => remarks.trim().to_string(),
                None => DEFAULT_REMARKS.to_string(),
            },
            grade: self.grade.unwrap_or_default(),
        })
    }
}

fn required(field: &'static str, value: String) -> RegistryResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(RegistryError::MissingField(field));
    }
    Ok(trimmed.to_string())
}

fn or_default(value: Option<String>, default: impl FnOnce() -> String) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => default(),
    }
}

/// Result of issuing a certificate.
#[derive(Clone, Debug)]
pub struct IssueOutcome {
    pub receipt: SubmitReceipt,
    pub certificate: CertificateRecord,
    /// The written PDF, or why it could not be written. The certificate is
    /// pending either way.
    pub document: Result<RenderedCertificate, String>,
}
