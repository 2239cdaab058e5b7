//! Memory router — the single entry point for recording new content.
//!
//! The router validates, scores, and appends. Routing happens at write
//! time: content scoring at or above the threshold lands directly in the
//! long-term stream and never waits for a promotion cycle.

use std::sync::Arc;

use tracing::info;

use skymem_core::error::MemoryError;
use skymem_core::record::{MemoryRecord, Tier};
use skymem_security::{AuditEvent, AuditLogger, AuditOutcome};
use skymem_store::JsonlStore;

use crate::scoring::ScoringPolicy;

/// Write path for new memory records.
pub struct MemoryRouter {
    store: Arc<JsonlStore>,
    policy: ScoringPolicy,
    audit: Arc<AuditLogger>,
}

impl MemoryRouter {
    pub fn new(store: Arc<JsonlStore>, policy: ScoringPolicy, audit: Arc<AuditLogger>) -> Self {
        Self {
            store,
            policy,
            audit,
        }
    }

    /// Record new content, scoring it when the caller gave no importance.
    ///
    /// Returns the stored record so the API layer can acknowledge it.
    pub async fn write(
        &self,
        content: &str,
        tags: Vec<String>,
        explicit_importance: Option<f64>,
    ) -> Result<MemoryRecord, MemoryError> {
        validate_content(content)?;
        if let Some(importance) = explicit_importance {
            validate_importance(importance)?;
        }

        let (importance, tier) = self.policy.score(content, explicit_importance);
        let record = MemoryRecord::new(content, tags, importance, tier);
        self.store.append(tier, &record).await?;

        info!(tier = %tier, importance, id = %record.id, "memory written");
        self.audit.log(
            AuditEvent::MemoryWritten {
                tier,
                id: record.id.clone(),
            },
            "router",
            AuditOutcome::Success,
            Some(summarize(content)),
        );

        Ok(record)
    }

    /// Direct long-term write, bypassing promotion — for callers that
    /// already know the content is durable (identity seeds and the like).
    ///
    /// The stored importance is floored at the promote threshold; a value
    /// below it is rejected outright.
    pub async fn write_explicit_long(
        &self,
        content: &str,
        tags: Vec<String>,
        importance: f64,
    ) -> Result<MemoryRecord, MemoryError> {
        validate_content(content)?;
        validate_importance(importance)?;

        let threshold = self.policy.threshold();
        if importance < threshold {
            return Err(MemoryError::Validation(format!(
                "importance {importance} is not important enough for long-term (threshold {threshold})"
            )));
        }

        let record = MemoryRecord::new(content, tags, importance.max(threshold), Tier::Long);
        self.store.append(Tier::Long, &record).await?;

        info!(importance = record.importance, id = %record.id, "long-term memory committed");
        self.audit.log(
            AuditEvent::MemoryWritten {
                tier: Tier::Long,
                id: record.id.clone(),
            },
            "router",
            AuditOutcome::Success,
            Some(summarize(content)),
        );

        Ok(record)
    }
}

fn validate_content(content: &str) -> Result<(), MemoryError> {
    if content.trim().is_empty() {
        return Err(MemoryError::Validation("content is empty".into()));
    }
    Ok(())
}

fn validate_importance(importance: f64) -> Result<(), MemoryError> {
    if !(0.0..=1.0).contains(&importance) {
        return Err(MemoryError::Validation(format!(
            "importance {importance} is outside [0.0, 1.0]"
        )));
    }
    Ok(())
}

/// First line, capped, for audit detail fields.
fn summarize(content: &str) -> String {
    let first = content.lines().next().unwrap_or_default();
    first.chars().take(50).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn router(tmp: &tempfile::TempDir) -> (MemoryRouter, Arc<JsonlStore>, Arc<AuditLogger>) {
        let store = Arc::new(JsonlStore::new(tmp.path()));
        let audit = Arc::new(AuditLogger::new());
        let router = MemoryRouter::new(
            Arc::clone(&store),
            ScoringPolicy::new(0.7),
            Arc::clone(&audit),
        );
        (router, store, audit)
    }

    #[tokio::test]
    async fn empty_content_is_rejected() {
        let tmp = tempfile::TempDir::new().unwrap();
        let (router, _, audit) = router(&tmp);

        let err = router.write("", vec![], None).await.unwrap_err();
        assert!(err.to_string().contains("empty"));

        let err = router.write("   \n\t", vec![], None).await.unwrap_err();
        assert!(err.to_string().contains("empty"));
        assert_eq!(audit.count(), 0);
    }

    #[tokio::test]
    async fn out_of_range_importance_is_rejected() {
        let tmp = tempfile::TempDir::new().unwrap();
        let (router, _, _) = router(&tmp);

        let err = router.write("fine content", vec![], Some(1.5)).await.unwrap_err();
        assert!(err.to_string().contains("outside"));

        let err = router.write("fine content", vec![], Some(-0.1)).await.unwrap_err();
        assert!(err.to_string().contains("outside"));
    }

    #[tokio::test]
    async fn plain_write_lands_in_short_term() {
        let tmp = tempfile::TempDir::new().unwrap();
        let (router, store, audit) = router(&tmp);

        let record = router
            .write("remember: water the tomatoes", vec!["chore".into()], None)
            .await
            .unwrap();
        assert_eq!(record.tier, Tier::Short);
        assert_eq!(record.importance, 0.4);

        let short = store.read_all(Tier::Short).await.unwrap();
        assert_eq!(short.len(), 1);
        assert_eq!(short[0].content, "remember: water the tomatoes");
        assert_eq!(short[0].importance, 0.4);
        assert!(store.read_all(Tier::Long).await.unwrap().is_empty());

        // Exactly one audit entry per successful write
        assert_eq!(audit.count(), 1);
    }

    #[tokio::test]
    async fn keyword_write_routes_directly_to_long_term() {
        let tmp = tempfile::TempDir::new().unwrap();
        let (router, store, _) = router(&tmp);

        let record = router
            .write(
                "this is a persistent preference: always dim lights at 9pm",
                vec![],
                None,
            )
            .await
            .unwrap();
        assert_eq!(record.tier, Tier::Long);
        assert_eq!(record.importance, 0.8);

        assert!(store.read_all(Tier::Short).await.unwrap().is_empty());
        let long = store.read_all(Tier::Long).await.unwrap();
        assert_eq!(long.len(), 1);
        assert!(long[0].importance >= 0.7);
    }

    #[tokio::test]
    async fn explicit_importance_overrides_keywords() {
        let tmp = tempfile::TempDir::new().unwrap();
        let (router, store, _) = router(&tmp);

        let record = router
            .write("a persistent policy note", vec![], Some(0.2))
            .await
            .unwrap();
        assert_eq!(record.tier, Tier::Short);
        assert_eq!(record.importance, 0.2);
        assert_eq!(store.read_all(Tier::Short).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn explicit_long_below_threshold_fails() {
        let tmp = tempfile::TempDir::new().unwrap();
        let (router, store, audit) = router(&tmp);

        let err = router
            .write_explicit_long("not that big a deal", vec![], 0.5)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("not important enough"));
        assert!(store.read_all(Tier::Long).await.unwrap().is_empty());
        assert_eq!(audit.count(), 0);
    }

    #[tokio::test]
    async fn explicit_long_write_commits() {
        let tmp = tempfile::TempDir::new().unwrap();
        let (router, store, audit) = router(&tmp);

        let record = router
            .write_explicit_long("I am Sky, Alex's assistant", vec!["identity".into()], 0.95)
            .await
            .unwrap();
        assert_eq!(record.tier, Tier::Long);
        assert_eq!(record.importance, 0.95);
        assert!(record.promoted_at.is_none());

        let long = store.read_all(Tier::Long).await.unwrap();
        assert_eq!(long.len(), 1);
        assert_eq!(audit.count(), 1);
    }
}
