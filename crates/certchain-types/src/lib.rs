//! Foundation types for certchain.
//!
//! Every other certchain crate depends on `certchain-types`.
//!
//! # Key Types
//!
//! - [`CertId`]: Normalized (trimmed, uppercased) certificate identifier
//! - [`CertificateRecord`]: The issued certificate, the unit of a ledger transaction
//! - [`Grade`]: Closed set of grades offered by the issuing form
//! - [`Block`]: A sealed batch of certificates with its proof and back-link
//! - [`BlockHash`]: Fixed-size digest chaining one block to the next

pub mod block;
pub mod cert_id;
pub mod certificate;
pub mod error;
pub mod hash;

pub use block::{Block, GENESIS_PREVIOUS_HASH, GENESIS_PROOF};
pub use cert_id::CertId;
pub use certificate::{CertificateRecord, Grade};
pub use error::TypeError;
pub use hash::BlockHash;
