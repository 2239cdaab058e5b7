//! `skymem list` / `get` / `search` / `stats` — read-side commands.

use skymem_core::record::Tier;

use super::{AppContext, print_record};

pub async fn list(tier: &str) -> Result<(), Box<dyn std::error::Error>> {
    let tier: Tier = tier.parse()?;
    let ctx = AppContext::load()?;
    ctx.ensure_allowed("memory.list")?;

    let records = ctx.inspector().list(tier).await?;
    println!("🧠 {tier}-term memories ({}):", records.len());
    println!();
    for record in &records {
        print_record(record);
        println!();
    }

    Ok(())
}

pub async fn get(id: &str, tier: &str) -> Result<(), Box<dyn std::error::Error>> {
    let tier: Tier = tier.parse()?;
    let ctx = AppContext::load()?;
    ctx.ensure_allowed("memory.get")?;

    match ctx.inspector().get(id, tier).await? {
        Some(record) => {
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        None => {
            println!("✗ No record '{id}' in {tier}-term memory");
        }
    }

    Ok(())
}

pub async fn search(query: &str, include_long_term: bool) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = AppContext::load()?;
    ctx.ensure_allowed("memory.search")?;

    println!("🔍 Searching memories for: \"{query}\"");
    println!();

    let results = ctx.inspector().search(query, include_long_term).await?;
    if results.is_empty() {
        println!("   No matching memories.");
    } else {
        for record in &results {
            print_record(record);
            println!();
        }
    }

    Ok(())
}

pub async fn stats() -> Result<(), Box<dyn std::error::Error>> {
    let ctx = AppContext::load()?;
    ctx.ensure_allowed("memory.stats")?;

    let stats = ctx.inspector().stats().await?;
    println!("🧠 Memory Statistics");
    println!("====================");
    println!(
        "  Short-term: {:>6} records  ({})",
        stats.short_term.count,
        stats.short_term.file.display()
    );
    println!(
        "  Long-term:  {:>6} records  ({})",
        stats.long_term.count,
        stats.long_term.file.display()
    );
    println!(
        "  Threshold:  {:.2}   Cap: {} lines   Indexer: {}",
        ctx.config.retention.promote_threshold,
        ctx.config.retention.short_term_max_lines,
        ctx.indexer.name()
    );

    Ok(())
}
