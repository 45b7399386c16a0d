//! Certificate document renderer for certchain.
//!
//! Turns a [`certchain_types::CertificateRecord`] into a one-page landscape
//! PDF carrying the certificate details, optional logo and signature images,
//! and a QR code that points at the verification endpoint.
//!
//! Rendering is a terminal side effect: nothing in the ledger depends on it.

pub mod config;
pub mod error;
pub mod layout;
pub mod pdf;
pub mod qr;
pub mod renderer;

pub use config::RenderConfig;
pub use error::{RenderError, RenderResult};
pub use layout::{render_pdf, verification_url, RenderAssets};
pub use pdf::RasterImage;
pub use renderer::{CertificateRenderer, RenderedCertificate};
