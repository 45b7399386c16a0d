use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use certchain_ledger::{ChainReport, DashboardProjection, LookupOutcome};
use certchain_registry::{IssueRequest, Registry};
use certchain_types::{Block, CertificateRecord};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{ServerError, ServerResult};

/// Shared handler state: one registry (and so one ledger) per process.
pub type AppState = Arc<Registry>;

#[derive(Debug, Deserialize)]
pub struct VerifyQuery {
    pub cert_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub certificate: CertificateRecord,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Debug, Serialize)]
pub struct IssueResponse {
    pub block_index: u64,
    pub position: usize,
    pub certificate: CertificateRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_error: Option<String>,
    pub verification_url: String,
}

#[derive(Debug, Serialize)]
pub struct ChainResponse {
    pub length: usize,
    pub chain: Vec<Block>,
}

/// Public verification endpoint, the target of every certificate's QR code.
pub async fn verify_handler(
    State(registry): State<AppState>,
    Query(query): Query<VerifyQuery>,
) -> ServerResult<Json<VerifyResponse>> {
    let cert_id = query
        .cert_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or(ServerError::CertIdRequired)?;

    let response = match registry.verify(cert_id)? {
        LookupOutcome::Mined { certificate, .. } => VerifyResponse {
            status: "success",
            message: "Certificate found in blockchain",
            certificate,
        },
        LookupOutcome::Pending { certificate } => VerifyResponse {
            status: "pending",
            message: "Certificate is pending (not yet mined)",
            certificate,
        },
        LookupOutcome::NotFound => return Err(ServerError::CertificateNotFound),
    };
    Ok(Json(response))
}

/// Health check handler.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Info handler.
pub async fn info_handler(State(registry): State<AppState>) -> ServerResult<Json<Value>> {
    Ok(Json(json!({
        "name": "certchain-server",
        "version": env!("CARGO_PKG_VERSION"),
        "difficulty": registry.difficulty(),
        "blocks": registry.chain()?.len(),
        "pending": registry.pending()?.len(),
    })))
}

/// Submit a certificate and render its PDF.
pub async fn issue_handler(
    State(registry): State<AppState>,
    Json(request): Json<IssueRequest>,
) -> ServerResult<(StatusCode, Json<IssueResponse>)> {
    let worker = Arc::clone(&registry);
    let outcome = tokio::task::spawn_blocking(move || worker.issue(request))
        .await
        .map_err(|e| ServerError::Internal(e.to_string()))??;

    let verification_url = registry.verification_url(&outcome.certificate);
    let (document_path, document_error) = match outcome.document {
        Ok(doc) => (Some(doc.path.display().to_string()), None),
        Err(e) => (None, Some(e)),
    };

    Ok((
        StatusCode::CREATED,
        Json(IssueResponse {
            block_index: outcome.receipt.block_index,
            position: outcome.receipt.position,
            certificate: outcome.certificate,
            document_path,
            document_error,
            verification_url,
        }),
    ))
}

/// Seal the pending set. The proof search runs on the blocking pool.
pub async fn mine_handler(
    State(registry): State<AppState>,
) -> ServerResult<(StatusCode, Json<Block>)> {
    let block = tokio::task::spawn_blocking(move || registry.mine())
        .await
        .map_err(|e| ServerError::Internal(e.to_string()))??;
    Ok((StatusCode::CREATED, Json(block)))
}

pub async fn chain_handler(State(registry): State<AppState>) -> ServerResult<Json<ChainResponse>> {
    let chain = registry.chain()?;
    Ok(Json(ChainResponse {
        length: chain.len(),
        chain,
    }))
}

pub async fn pending_handler(
    State(registry): State<AppState>,
) -> ServerResult<Json<Vec<CertificateRecord>>> {
    Ok(Json(registry.pending()?))
}

pub async fn dashboard_handler(
    State(registry): State<AppState>,
) -> ServerResult<Json<DashboardProjection>> {
    Ok(Json(registry.dashboard()?))
}

pub async fn validate_handler(State(registry): State<AppState>) -> ServerResult<Json<ChainReport>> {
    Ok(Json(registry.validate()?))
}
