//! Promotion engine — batch maintenance over the short-term stream.
//!
//! One pass promotes every short-term record at or above the threshold,
//! bounds the stream with archive rotation, and forwards promoted content
//! to the indexer. The long-term append happens before the short-term
//! rewrite: a crash between the two can duplicate a record across streams
//! but never lose it, and the next pass heals the duplicate by dropping
//! short-term records whose id is already present in long-term.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info, warn};

use skymem_config::RetentionConfig;
use skymem_core::error::MemoryError;
use skymem_core::indexer::Indexer;
use skymem_core::record::Tier;
use skymem_security::{AuditEvent, AuditLogger, AuditOutcome};
use skymem_store::JsonlStore;

/// Outcome of one promotion pass.
#[derive(Debug, Clone, PartialEq)]
pub struct PromotionSummary {
    pub promoted_count: usize,
    pub rotated: bool,
    pub remaining_count: usize,
    pub threshold_used: f64,
}

/// Periodic short → long promotion and short-term rotation.
pub struct PromotionEngine {
    store: Arc<JsonlStore>,
    retention: RetentionConfig,
    indexer: Arc<dyn Indexer>,
    indexer_timeout: Duration,
    audit: Arc<AuditLogger>,
}

impl PromotionEngine {
    pub fn new(
        store: Arc<JsonlStore>,
        retention: RetentionConfig,
        indexer: Arc<dyn Indexer>,
        indexer_timeout: Duration,
        audit: Arc<AuditLogger>,
    ) -> Self {
        Self {
            store,
            retention,
            indexer,
            indexer_timeout,
            audit,
        }
    }

    /// Run the promotion pipeline once.
    pub async fn run_once(&self) -> Result<PromotionSummary, MemoryError> {
        let threshold = self.retention.promote_threshold;

        let short = self.store.exclusive(Tier::Short).await;
        let records = short.read_all()?;

        if records.is_empty() {
            return Ok(PromotionSummary {
                promoted_count: 0,
                rotated: false,
                remaining_count: 0,
                threshold_used: threshold,
            });
        }

        // Ids already durable in long-term. Short→long acquisition order,
        // and the long lock is released before the batch append below.
        let long_ids: HashSet<String> = {
            let long = self.store.exclusive(Tier::Long).await;
            long.read_all()?.into_iter().map(|r| r.id).collect()
        };

        let mut promoted = Vec::new();
        let mut kept = Vec::new();
        let mut healed = 0usize;
        for record in records {
            if long_ids.contains(&record.id) {
                healed += 1;
            } else if record.importance >= threshold {
                promoted.push(record.into_promoted(threshold));
            } else {
                kept.push(record);
            }
        }
        if healed > 0 {
            warn!(
                count = healed,
                "dropped short-term records already in long-term (interrupted promotion healed)"
            );
        }

        // Batch append: readers see all promoted records or none
        self.store.append_all(Tier::Long, &promoted).await?;

        let mut rotated = false;
        let max_lines = self.retention.short_term_max_lines;
        if kept.len() > max_lines {
            let overflow = kept.len() - max_lines;
            let archived: Vec<_> = kept.drain(..overflow).collect();
            let label = Utc::now().timestamp().to_string();
            let path = short.archive(&archived, &label)?;
            info!(
                archived = archived.len(),
                path = %path.display(),
                "rotated short-term stream"
            );
            rotated = true;
        }

        short.rewrite(&kept)?;
        drop(short);

        if !promoted.is_empty() {
            let contents: Vec<String> = promoted.iter().map(|r| r.content.clone()).collect();
            forward_best_effort(self.indexer.as_ref(), self.indexer_timeout, &contents).await;
        }

        info!(
            promoted = promoted.len(),
            rotated,
            remaining = kept.len(),
            "promotion pass complete"
        );
        self.audit.log(
            AuditEvent::PromotionRun {
                promoted: promoted.len(),
                rotated,
            },
            "promoter",
            AuditOutcome::Success,
            None,
        );

        Ok(PromotionSummary {
            promoted_count: promoted.len(),
            rotated,
            remaining_count: kept.len(),
            threshold_used: threshold,
        })
    }
}

/// Forward content to the indexer without letting it affect durability.
/// Failures and timeouts are logged and swallowed. Returns whether the
/// forward succeeded.
pub(crate) async fn forward_best_effort(
    indexer: &dyn Indexer,
    timeout: Duration,
    contents: &[String],
) -> bool {
    match tokio::time::timeout(timeout, indexer.forward(contents)).await {
        Ok(Ok(())) => {
            debug!(count = contents.len(), indexer = indexer.name(), "content forwarded to indexer");
            true
        }
        Ok(Err(e)) => {
            warn!(error = %e, indexer = indexer.name(), "indexer forward failed; promoted content remains durable");
            false
        }
        Err(_) => {
            warn!(indexer = indexer.name(), "indexer forward timed out; promoted content remains durable");
            false
        }
    }
}
