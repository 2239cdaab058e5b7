//! `skymem promote` / `skymem maintain` — promotion commands.

use tracing::error;

use super::{AppContext, print_record};

pub async fn run(id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = AppContext::load()?;
    ctx.ensure_allowed("memory.promote")?;

    let outcome = ctx.inspector().promote(id).await?;
    println!("✅ Promoted to long-term memory (indexed: {}):", outcome.indexed);
    print_record(&outcome.record);

    Ok(())
}

pub async fn maintain(interval_secs: Option<u64>) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = AppContext::load()?;
    ctx.ensure_allowed("memory.maintain")?;

    let engine = ctx.engine();

    match interval_secs {
        None => {
            let summary = engine.run_once().await?;
            print_summary(&summary);
        }
        Some(secs) => {
            println!("⏱  Running promotion every {secs}s (ctrl-c to stop)");
            let mut ticker = tokio::time::interval(std::time::Duration::from_secs(secs.max(1)));
            loop {
                ticker.tick().await;
                match engine.run_once().await {
                    Ok(summary) => print_summary(&summary),
                    // Keep the loop alive; the next tick gets a fresh chance
                    Err(e) => error!(error = %e, "promotion pass failed"),
                }
            }
        }
    }

    Ok(())
}

fn print_summary(summary: &skymem_lifecycle::PromotionSummary) {
    println!(
        "✅ Promotion pass: {} promoted, {} remaining, rotated: {} (threshold {:.2})",
        summary.promoted_count, summary.remaining_count, summary.rotated, summary.threshold_used
    );
}
