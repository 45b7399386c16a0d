use std::sync::Arc;

use certchain_crypto::ProofOfWork;
use certchain_ledger::{
    ChainReport, DashboardProjection, InMemoryLedger, LedgerReader, LedgerWriter, LookupOutcome,
    ProjectionBuilder,
};
use certchain_render::{CertificateRenderer, RenderConfig, RenderedCertificate};
use certchain_types::{Block, CertificateRecord};
use chrono::Local;

use crate::config::RegistryConfig;
use crate::error::RegistryResult;
use crate::issue::{IssueOutcome, IssueRequest};

/// High-level certchain API.
///
/// Cloning the inner `Arc` via [`Registry::ledger`] lets several surfaces
/// share one ledger; the renderer is per registry.
pub struct Registry {
    ledger: Arc<InMemoryLedger>,
    renderer: CertificateRenderer,
}

impl Registry {
    /// Build a registry with a fresh ledger holding only the genesis block.
    pub fn new(config: RegistryConfig) -> RegistryResult<Self> {
        let pow = ProofOfWork::new(config.difficulty)?;
        let ledger = Arc::new(InMemoryLedger::new(pow));
        tracing::info!(difficulty = config.difficulty, "registry initialized");
        Ok(Self::with_ledger(ledger, config.render))
    }

    /// Build a registry over an existing ledger.
    pub fn with_ledger(ledger: Arc<InMemoryLedger>, render: RenderConfig) -> Self {
        Self {
            ledger,
            renderer: CertificateRenderer::new(render),
        }
    }

    pub fn ledger(&self) -> &Arc<InMemoryLedger> {
        &self.ledger
    }

    pub fn renderer(&self) -> &CertificateRenderer {
        &self.renderer
    }

    pub fn difficulty(&self) -> u32 {
        self.ledger.pow().difficulty()
    }

    // ---- Issuing ----

    /// Validate, submit and render a certificate.
    ///
    /// Nothing reaches the ledger if a required field is blank. Once the
    /// certificate is submitted a rendering failure no longer fails the
    /// call: it is reported in [`IssueOutcome::document`].
    pub fn issue(&self, request: IssueRequest) -> RegistryResult<IssueOutcome> {
        let certificate = request.into_record(Local::now().date_naive())?;
        let receipt = self.ledger.submit(certificate.clone())?;
        tracing::info!(
            cert_id = %certificate.cert_id,
            block_index = receipt.block_index,
            "certificate issued"
        );

        let document = self.renderer.render(&certificate).map_err(|e| {
            tracing::warn!(cert_id = %certificate.cert_id, error = %e, "certificate not rendered");
            e.to_string()
        });

        Ok(IssueOutcome {
            receipt,
            certificate,
            document,
        })
    }

    /// Render a certificate without submitting it to the ledger.
    pub fn render_only(&self, request: IssueRequest) -> RegistryResult<RenderedCertificate> {
        let certificate = request.into_record(Local::now().date_naive())?;
        Ok(self.renderer.render(&certificate)?)
    }

    pub fn verification_url(&self, certificate: &CertificateRecord) -> String {
        self.renderer.verification_url(certificate)
    }

    // ---- Ledger operations ----

    /// Search a proof against the last block and seal every pending certificate.
    pub fn mine(&self) -> RegistryResult<Block> {
        Ok(self.ledger.mine()?)
    }

    pub fn verify(&self, cert_id: &str) -> RegistryResult<LookupOutcome> {
        Ok(self.ledger.find(cert_id)?)
    }

    pub fn dashboard(&self) -> RegistryResult<DashboardProjection> {
        Ok(ProjectionBuilder::dashboard(self.ledger.as_ref())?)
    }

    pub fn chain(&self) -> RegistryResult<Vec<Block>> {
        Ok(self.ledger.chain()?)
    }

    pub fn pending(&self) -> RegistryResult<Vec<CertificateRecord>> {
        Ok(self.ledger.pending()?)
    }

    pub fn validate(&self) -> RegistryResult<ChainReport> {
        Ok(self.ledger.validate_chain()?)
    }
}
