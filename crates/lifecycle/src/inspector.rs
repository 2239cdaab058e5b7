//! Memory inspector — read-side and targeted-mutation operations for
//! external callers (HTTP handlers, the CLI).
//!
//! Lookup misses surface as typed `NotFound` results for promote/delete and
//! as `None` for get; callers above translate them to 404-equivalents.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use skymem_core::error::MemoryError;
use skymem_core::indexer::Indexer;
use skymem_core::record::{MemoryRecord, Tier};
use skymem_security::{AuditEvent, AuditLogger, AuditOutcome};
use skymem_store::JsonlStore;

use crate::promoter::forward_best_effort;

/// Result of a manual promotion.
#[derive(Debug, Clone)]
pub struct PromoteOutcome {
    /// The record as stored in long-term
    pub record: MemoryRecord,
    /// Whether the best-effort indexer forward succeeded
    pub indexed: bool,
}

/// Counts and file location for one tier.
#[derive(Debug, Clone)]
pub struct TierStats {
    pub count: usize,
    pub file: PathBuf,
}

/// Snapshot of both streams.
#[derive(Debug, Clone)]
pub struct MemoryStats {
    pub short_term: TierStats,
    pub long_term: TierStats,
}

/// Query and targeted-mutation surface over the store.
pub struct MemoryInspector {
    store: Arc<JsonlStore>,
    indexer: Arc<dyn Indexer>,
    promote_floor: f64,
    indexer_timeout: Duration,
    audit: Arc<AuditLogger>,
}

impl MemoryInspector {
    pub fn new(
        store: Arc<JsonlStore>,
        indexer: Arc<dyn Indexer>,
        promote_floor: f64,
        indexer_timeout: Duration,
        audit: Arc<AuditLogger>,
    ) -> Self {
        Self {
            store,
            indexer,
            promote_floor,
            indexer_timeout,
            audit,
        }
    }

    /// All records of a tier, file order (most-recent-last).
    pub async fn list(&self, tier: Tier) -> Result<Vec<MemoryRecord>, MemoryError> {
        self.store.read_all(tier).await
    }

    /// Look up one record by id. `None` is the normal miss result.
    pub async fn get(&self, id: &str, tier: Tier) -> Result<Option<MemoryRecord>, MemoryError> {
        let records = self.store.read_all(tier).await?;
        Ok(records.into_iter().find(|r| r.id == id))
    }

    /// Case-insensitive substring search over content. Scans short-term
    /// always and long-term unless disabled; results keep stream order,
    /// short-term first. No ranking.
    pub async fn search(
        &self,
        query: &str,
        include_long_term: bool,
    ) -> Result<Vec<MemoryRecord>, MemoryError> {
        let needle = query.to_lowercase();
        let matches = |r: &MemoryRecord| r.content.to_lowercase().contains(&needle);

        let mut results: Vec<MemoryRecord> = self
            .store
            .read_all(Tier::Short)
            .await?
            .into_iter()
            .filter(|r| matches(r))
            .collect();

        if include_long_term {
            results.extend(
                self.store
                    .read_all(Tier::Long)
                    .await?
                    .into_iter()
                    .filter(|r| matches(r)),
            );
        }

        info!(query, results = results.len(), "memory search");
        Ok(results)
    }

    /// Promote a single short-term record by id, outside the batch cycle.
    ///
    /// Same semantics as the batch engine: floor the importance, stamp
    /// `promoted_at`, append long before rewriting short (the batch pass
    /// heals the duplicate if we crash between the two), then forward to
    /// the indexer best-effort.
    pub async fn promote(&self, id: &str) -> Result<PromoteOutcome, MemoryError> {
        let short = self.store.exclusive(Tier::Short).await;
        let mut records = short.read_all()?;

        let Some(pos) = records.iter().position(|r| r.id == id) else {
            return Err(MemoryError::NotFound {
                id: id.into(),
                tier: Tier::Short,
            });
        };

        if records[pos].content.trim().is_empty() {
            return Err(MemoryError::Validation(format!(
                "record '{id}' has no content"
            )));
        }

        let promoted = records.remove(pos).into_promoted(self.promote_floor);
        self.store.append(Tier::Long, &promoted).await?;
        short.rewrite(&records)?;
        drop(short);

        let indexed = forward_best_effort(
            self.indexer.as_ref(),
            self.indexer_timeout,
            std::slice::from_ref(&promoted.content),
        )
        .await;

        info!(id = %promoted.id, indexed, "memory promoted");
        self.audit.log(
            AuditEvent::MemoryPromoted {
                id: promoted.id.clone(),
            },
            "inspector",
            AuditOutcome::Success,
            None,
        );

        Ok(PromoteOutcome {
            record: promoted,
            indexed,
        })
    }

    /// Permanently delete a record from the given stream.
    ///
    /// No archive snapshot — an explicit user deletion is not rotation's
    /// automatic eviction. Returns the removed record.
    pub async fn delete(&self, id: &str, tier: Tier) -> Result<MemoryRecord, MemoryError> {
        let guard = self.store.exclusive(tier).await;
        let mut records = guard.read_all()?;

        let Some(pos) = records.iter().position(|r| r.id == id) else {
            return Err(MemoryError::NotFound {
                id: id.into(),
                tier,
            });
        };

        let removed = records.remove(pos);
        guard.rewrite(&records)?;
        drop(guard);

        info!(id = %removed.id, tier = %tier, "memory deleted");
        self.audit.log(
            AuditEvent::MemoryDeleted {
                tier,
                id: removed.id.clone(),
            },
            "inspector",
            AuditOutcome::Success,
            None,
        );

        Ok(removed)
    }

    /// Per-tier counts and file locations.
    pub async fn stats(&self) -> Result<MemoryStats, MemoryError> {
        Ok(MemoryStats {
            short_term: TierStats {
                count: self.store.read_all(Tier::Short).await?.len(),
                file: self.store.stream_path(Tier::Short),
            },
            long_term: TierStats {
                count: self.store.read_all(Tier::Long).await?.len(),
                file: self.store.stream_path(Tier::Long),
            },
        })
    }
}
