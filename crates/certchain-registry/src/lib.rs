//! High-level API for certchain.
//!
//! [`Registry`] ties the shared ledger, the proof-of-work search and the PDF
//! renderer together. It is the entry point used by the HTTP server and the
//! interactive console.

pub mod config;
pub mod error;
pub mod issue;
pub mod registry;

pub use config::RegistryConfig;
pub use error::{RegistryError, RegistryResult};
pub use issue::{IssueOutcome, IssueRequest};
pub use registry::Registry;

// Re-export key types
pub use certchain_ledger::{
    ChainReport, DashboardProjection, InMemoryLedger, LookupOutcome, LookupStatus, SubmitReceipt,
};
pub use certchain_render::{RenderConfig, RenderedCertificate};
pub use certchain_types::{Block, CertId, CertificateRecord, Grade};
