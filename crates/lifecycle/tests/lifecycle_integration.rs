//! End-to-end tests over the full write → promote → inspect pipeline.

use std::sync::Arc;
use std::time::Duration;

use skymem_config::RetentionConfig;
use skymem_core::indexer::NoopIndexer;
use skymem_core::record::{MemoryRecord, Tier};
use skymem_lifecycle::{MemoryInspector, MemoryRouter, PromotionEngine, ScoringPolicy};
use skymem_security::AuditLogger;
use skymem_store::JsonlStore;

struct Harness {
    store: Arc<JsonlStore>,
    router: MemoryRouter,
    engine: PromotionEngine,
    inspector: MemoryInspector,
    _tmp: tempfile::TempDir,
}

fn harness(max_short_lines: usize) -> Harness {
    let tmp = tempfile::TempDir::new().unwrap();
    let store = Arc::new(JsonlStore::new(tmp.path()));
    let audit = Arc::new(AuditLogger::new());
    let indexer = Arc::new(NoopIndexer);
    let retention = RetentionConfig {
        promote_threshold: 0.7,
        short_term_max_lines: max_short_lines,
    };

    let router = MemoryRouter::new(
        Arc::clone(&store),
        ScoringPolicy::new(retention.promote_threshold),
        Arc::clone(&audit),
    );
    let engine = PromotionEngine::new(
        Arc::clone(&store),
        retention.clone(),
        indexer.clone(),
        Duration::from_secs(5),
        Arc::clone(&audit),
    );
    let inspector = MemoryInspector::new(
        Arc::clone(&store),
        indexer,
        retention.promote_threshold,
        Duration::from_secs(5),
        audit,
    );

    Harness {
        store,
        router,
        engine,
        inspector,
        _tmp: tmp,
    }
}

#[tokio::test]
async fn write_round_trips_through_store_and_get() {
    let h = harness(5000);

    let written = h
        .router
        .write("the garage code is 4711", vec!["home".into()], None)
        .await
        .unwrap();

    let listed = h.inspector.list(Tier::Short).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].content, "the garage code is 4711");

    let fetched = h.inspector.get(&written.id, Tier::Short).await.unwrap();
    assert_eq!(fetched.unwrap().id, written.id);
}

#[tokio::test]
async fn chore_note_stays_short_term() {
    let h = harness(5000);

    h.router
        .write("remember: water the tomatoes", vec!["chore".into()], None)
        .await
        .unwrap();

    let short = h.inspector.list(Tier::Short).await.unwrap();
    assert_eq!(short.len(), 1);
    assert_eq!(short[0].content, "remember: water the tomatoes");
    assert_eq!(short[0].importance, 0.4);
    assert_eq!(short[0].tier, Tier::Short);
}

#[tokio::test]
async fn preference_note_ends_in_long_term_within_one_cycle() {
    let h = harness(5000);

    h.router
        .write(
            "this is a persistent preference: always dim lights at 9pm",
            vec![],
            None,
        )
        .await
        .unwrap();
    // Routing is write-time; one promotion cycle must not change the outcome
    h.engine.run_once().await.unwrap();

    let long = h.inspector.list(Tier::Long).await.unwrap();
    assert_eq!(long.len(), 1);
    assert!(long[0].importance >= 0.7);
    assert!(h.inspector.list(Tier::Short).await.unwrap().is_empty());
}

#[tokio::test]
async fn promotion_is_idempotent() {
    let h = harness(5000);

    // Explicitly-scored entries below and above the line
    h.router.write("ephemeral chatter", vec![], Some(0.2)).await.unwrap();
    h.router.write("mid note", vec![], Some(0.5)).await.unwrap();
    h.store
        .append(
            Tier::Short,
            &MemoryRecord::new("left behind by an old writer", vec![], 0.85, Tier::Short),
        )
        .await
        .unwrap();

    let first = h.engine.run_once().await.unwrap();
    assert_eq!(first.promoted_count, 1);

    let second = h.engine.run_once().await.unwrap();
    assert_eq!(second.promoted_count, 0);
    assert!(!second.rotated);
    assert_eq!(second.remaining_count, 2);
}

#[tokio::test]
async fn threshold_invariant_holds_after_a_pass() {
    let h = harness(5000);

    for (content, importance) in [
        ("low a", 0.1),
        ("low b", 0.69),
        ("high a", 0.7),
        ("high b", 0.99),
    ] {
        h.store
            .append(
                Tier::Short,
                &MemoryRecord::new(content, vec![], importance, Tier::Short),
            )
            .await
            .unwrap();
    }

    h.engine.run_once().await.unwrap();

    for record in h.inspector.list(Tier::Long).await.unwrap() {
        assert!(record.importance >= 0.7, "{} below threshold", record.content);
        assert_eq!(record.tier, Tier::Long);
    }
    for record in h.inspector.list(Tier::Short).await.unwrap() {
        assert!(record.importance < 0.7, "{} should have been promoted", record.content);
        assert_eq!(record.tier, Tier::Short);
    }
}

#[tokio::test]
async fn rotation_loses_no_records() {
    let h = harness(3);

    for i in 0..9 {
        h.router
            .write(&format!("note {i}"), vec![], Some(0.1))
            .await
            .unwrap();
    }

    let summary = h.engine.run_once().await.unwrap();
    assert!(summary.rotated);
    assert_eq!(summary.remaining_count, 3);

    let retained = h.inspector.list(Tier::Short).await.unwrap();
    let retained_contents: Vec<&str> = retained.iter().map(|r| r.content.as_str()).collect();
    assert_eq!(retained_contents, vec!["note 6", "note 7", "note 8"]);

    // archived + retained == written
    let archive_lines: usize = std::fs::read_dir(h._tmp.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().contains("archive"))
        .map(|e| {
            std::fs::read_to_string(e.path())
                .unwrap()
                .lines()
                .count()
        })
        .sum();
    assert_eq!(archive_lines + retained.len(), 9);
}

#[tokio::test]
async fn manual_promote_of_blank_record_reports_no_content() {
    let h = harness(5000);

    let blank = MemoryRecord::new("", vec![], 0.9, Tier::Short);
    let id = blank.id.clone();
    h.store.append(Tier::Short, &blank).await.unwrap();

    let err = h.inspector.promote(&id).await.unwrap_err();
    assert!(err.to_string().contains("no content"));

    let short = h.inspector.list(Tier::Short).await.unwrap();
    assert_eq!(short.len(), 1);
    assert_eq!(short[0].id, id);
}

#[tokio::test]
async fn delete_leaves_other_records_untouched() {
    let h = harness(5000);

    let mut ids = Vec::new();
    for i in 0..4 {
        let rec = h
            .router
            .write(&format!("entry {i}"), vec![], Some(0.3))
            .await
            .unwrap();
        ids.push(rec.id);
    }

    h.inspector.delete(&ids[1], Tier::Short).await.unwrap();

    let remaining = h.inspector.list(Tier::Short).await.unwrap();
    let contents: Vec<&str> = remaining.iter().map(|r| r.content.as_str()).collect();
    assert_eq!(contents, vec!["entry 0", "entry 2", "entry 3"]);
    for record in &remaining {
        assert_eq!(record.tier, Tier::Short);
        assert_eq!(record.importance, 0.3);
    }
}

#[tokio::test]
async fn search_spans_both_tiers_after_promotion() {
    let h = harness(5000);

    h.router.write("tomato seedlings ordered", vec![], Some(0.3)).await.unwrap();
    h.router
        .write("recurring reminder: tomato fertilizer monthly", vec![], None)
        .await
        .unwrap();
    h.engine.run_once().await.unwrap();

    let results = h.inspector.search("tomato", true).await.unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].tier, Tier::Short);
    assert_eq!(results[1].tier, Tier::Long);

    let stats = h.inspector.stats().await.unwrap();
    assert_eq!(stats.short_term.count, 1);
    assert_eq!(stats.long_term.count, 1);
}
