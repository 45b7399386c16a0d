//! Certificate ledger for certchain.
//!
//! This crate is the heart of certchain. It provides:
//! - `LedgerWriter` / `LedgerReader` trait boundaries
//! - `InMemoryLedger`, the single process-wide ledger shared by every surface
//! - Block sealing with proof and back-link checks under the write lock
//! - First-match certificate lookup across mined blocks and the pending set
//! - Chain validation on read
//! - The admin dashboard projection

pub mod error;
pub mod lookup;
pub mod memory;
pub mod projection;
pub mod traits;
pub mod validation;

pub use error::LedgerError;
pub use lookup::{LookupOutcome, LookupStatus};
pub use memory::InMemoryLedger;
pub use projection::{DashboardProjection, ProjectionBuilder};
pub use traits::{LedgerReader, LedgerWriter, SubmitReceipt};
pub use validation::{ChainReport, ChainValidator};
