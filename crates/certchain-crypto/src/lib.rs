//! Hashing primitives for certchain.
//!
//! Provides domain-separated BLAKE3 block hashing, the proof-of-work nonce
//! search, and hash chain verification over sealed blocks.
//!
//! The proof of work here is a toy: a fixed hash-prefix condition with no
//! security purpose. All hashing wraps the `blake3` crate.

pub mod chain;
pub mod hasher;
pub mod pow;

pub use chain::{ChainError, HashChainVerifier};
pub use hasher::{BlockHasher, HasherError};
pub use pow::{PowError, ProofOfWork, DEFAULT_DIFFICULTY};
