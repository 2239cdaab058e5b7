//! Indexer trait — the external collaborator that makes promoted content
//! searchable by embedding/similarity.
//!
//! The forward call is best-effort: promotion durability never depends on
//! it. The embedding pipeline itself lives outside this subsystem; the
//! default implementation is a no-op.

use async_trait::async_trait;

use crate::error::MemoryError;

/// The core Indexer trait.
///
/// Implementations: noop (default), plus whatever vector store the host
/// wires in. Callers treat failures as recoverable and log-and-continue.
#[async_trait]
pub trait Indexer: Send + Sync {
    /// The indexer name (e.g., "noop").
    fn name(&self) -> &str;

    /// Forward promoted content strings for ingestion.
    async fn forward(&self, contents: &[String]) -> std::result::Result<(), MemoryError>;
}

/// An indexer that accepts everything and does nothing.
/// The default until a real embedding backend is configured.
#[derive(Debug, Default)]
pub struct NoopIndexer;

#[async_trait]
impl Indexer for NoopIndexer {
    fn name(&self) -> &str {
        "noop"
    }

    async fn forward(&self, contents: &[String]) -> std::result::Result<(), MemoryError> {
        tracing::debug!(count = contents.len(), "noop indexer dropped forward");
        Ok(())
    }
}
