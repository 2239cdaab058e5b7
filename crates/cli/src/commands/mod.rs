//! Command implementations for the `skymem` CLI.

pub mod delete;
pub mod inspect;
pub mod onboard;
pub mod promote;
pub mod write;

use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use skymem_config::SkymemConfig;
use skymem_core::indexer::{Indexer, NoopIndexer};
use skymem_core::record::MemoryRecord;
use skymem_lifecycle::{MemoryInspector, MemoryRouter, PromotionEngine, ScoringPolicy};
use skymem_security::{AuditEvent, AuditLogger, AuditOutcome, AuthorityGate, TracingSink};
use skymem_store::JsonlStore;

/// Everything a command needs, wired from the loaded configuration.
pub struct AppContext {
    pub config: SkymemConfig,
    pub store: Arc<JsonlStore>,
    pub gate: AuthorityGate,
    pub audit: Arc<AuditLogger>,
    pub indexer: Arc<dyn Indexer>,
}

impl AppContext {
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let config = SkymemConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

        let store = Arc::new(JsonlStore::new(&config.memory_dir));
        let gate = AuthorityGate::new(&config.authority);
        let audit = Arc::new(AuditLogger::with_sinks(vec![Box::new(TracingSink)]));

        let indexer: Arc<dyn Indexer> = match config.indexer.backend.as_str() {
            "noop" => Arc::new(NoopIndexer),
            other => {
                warn!(backend = other, "unknown indexer backend, falling back to noop");
                Arc::new(NoopIndexer)
            }
        };

        Ok(Self {
            config,
            store,
            gate,
            audit,
            indexer,
        })
    }

    pub fn router(&self) -> MemoryRouter {
        MemoryRouter::new(
            Arc::clone(&self.store),
            ScoringPolicy::new(self.config.retention.promote_threshold),
            Arc::clone(&self.audit),
        )
    }

    pub fn engine(&self) -> PromotionEngine {
        PromotionEngine::new(
            Arc::clone(&self.store),
            self.config.retention.clone(),
            Arc::clone(&self.indexer),
            Duration::from_secs(self.config.indexer.timeout_secs),
            Arc::clone(&self.audit),
        )
    }

    pub fn inspector(&self) -> MemoryInspector {
        MemoryInspector::new(
            Arc::clone(&self.store),
            Arc::clone(&self.indexer),
            self.config.retention.promote_threshold,
            Duration::from_secs(self.config.indexer.timeout_secs),
            Arc::clone(&self.audit),
        )
    }

    /// Consult the authority gate before a privileged action. A refusal is
    /// audited and reported instead of executed.
    pub fn ensure_allowed(&self, action: &str) -> Result<(), Box<dyn std::error::Error>> {
        let decision = self.gate.check(action);
        if decision.is_allowed() {
            return Ok(());
        }

        self.audit.log(
            AuditEvent::ActionDenied {
                action: action.into(),
            },
            "cli",
            AuditOutcome::Denied,
            Some(format!("{decision:?}")),
        );
        Err(format!("✗ Action '{action}' refused by the authority gate").into())
    }
}

/// One-line record rendering shared by list/get/search output.
pub fn print_record(record: &MemoryRecord) {
    let preview: String = record.content.chars().take(80).collect();
    println!("  [{}] {}", record.id, preview);
    println!(
        "    - tier: {}, importance: {:.2}, created: {}",
        record.tier,
        record.importance,
        record.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
    );
    if !record.tags.is_empty() {
        println!("    - tags: {}", record.tags.join(", "));
    }
    if let Some(promoted_at) = record.promoted_at {
        println!(
            "    - promoted: {}",
            promoted_at.format("%Y-%m-%d %H:%M:%S UTC")
        );
    }
}
