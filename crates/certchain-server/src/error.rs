use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use certchain_ledger::LedgerError;
use certchain_registry::RegistryError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Certificate ID required")]
    CertIdRequired,

    #[error("Certificate not found")]
    CertificateNotFound,

    #[error("{0}")]
    Registry(#[from] RegistryError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServerResult<T> = Result<T, ServerError>;

impl ServerError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::CertIdRequired => StatusCode::BAD_REQUEST,
            Self::CertificateNotFound => StatusCode::NOT_FOUND,
            Self::Registry(RegistryError::MissingField(_) | RegistryError::Type(_)) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            // Rejected by the seal guard; the pending set is untouched.
            Self::Registry(RegistryError::Ledger(
                LedgerError::StalePreviousHash { .. } | LedgerError::InvalidProof { .. },
            )) => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = json!({ "status": "error", "message": self.to_string() });
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes() {
        assert_eq!(ServerError::CertIdRequired.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ServerError::CertificateNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ServerError::Registry(RegistryError::MissingField("name")).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ServerError::Internal("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn rejected_seal_is_conflict() {
        let stale = ServerError::Registry(RegistryError::Ledger(LedgerError::StalePreviousHash {
            expected: "ab".into(),
            found: "cd".into(),
        }));
        assert_eq!(stale.status_code(), StatusCode::CONFLICT);

        let bad_proof =
            ServerError::Registry(RegistryError::Ledger(LedgerError::InvalidProof { index: 2, proof: 7 }));
        assert_eq!(bad_proof.status_code(), StatusCode::CONFLICT);

        let poisoned = ServerError::Registry(RegistryError::Ledger(LedgerError::LockPoisoned("write")));
        assert_eq!(poisoned.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn conflict_response_carries_error_body() {
        let response = ServerError::Registry(RegistryError::Ledger(LedgerError::StalePreviousHash {
            expected: "ab".into(),
            found: "cd".into(),
        }))
        .into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "error");
        assert!(body["message"].as_str().unwrap().starts_with("ledger error:"));
    }

    #[test]
    fn messages_match_wire_format() {
        assert_eq!(ServerError::CertIdRequired.to_string(), "Certificate ID required");
        assert_eq!(ServerError::CertificateNotFound.to_string(), "Certificate not found");
        assert_eq!(
            ServerError::Registry(RegistryError::MissingField("name")).to_string(),
            "name is required"
        );
    }
}
