//! Error types for the Sky memory domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Validation and not-found failures are typed variants rather than panics,
//! so API-layer callers can translate them to 4xx-style responses; storage
//! failures propagate because there is no safe local recovery.

use thiserror::Error;

use crate::record::Tier;

/// The top-level error type for all skymem operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Memory errors ---
    #[error("Memory error: {0}")]
    Memory(#[from] MemoryError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the memory lifecycle: store, router, promotion, inspector.
#[derive(Debug, Error)]
pub enum MemoryError {
    /// Caller-supplied input was rejected: empty content, importance outside
    /// [0.0, 1.0], unknown tier. Never retried.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// An id lookup missed. A normal negative result for promote/delete;
    /// callers above translate to a 404-equivalent.
    #[error("Record '{id}' not found in {tier} memory")]
    NotFound { id: String, tier: Tier },

    /// I/O failure on read/write/rewrite. Fatal for the current operation.
    #[error("Storage error on {stream} stream: {reason}")]
    Storage { stream: Tier, reason: String },

    /// The best-effort forward to the indexing collaborator failed.
    /// Recovered locally — promotion still reports success for storage.
    #[error("Indexer error: {0}")]
    Indexer(String),
}

impl MemoryError {
    /// Shorthand for a storage failure on the given stream.
    pub fn storage(stream: Tier, reason: impl std::fmt::Display) -> Self {
        Self::Storage {
            stream,
            reason: reason.to_string(),
        }
    }
}
