//! HTTP server for certchain.
//!
//! Serves the public `GET /verify` endpoint that certificate QR codes point
//! at, plus a small admin REST API under `/v1`. Every route shares one
//! [`certchain_registry::Registry`], so certificates issued from any surface
//! are immediately verifiable.

pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use handler::AppState;
pub use server::CertServer;
