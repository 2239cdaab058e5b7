//! `skymem delete` — permanent record removal.

use skymem_core::record::Tier;

use super::AppContext;

pub async fn run(id: &str, tier: &str) -> Result<(), Box<dyn std::error::Error>> {
    let tier: Tier = tier.parse()?;
    let ctx = AppContext::load()?;
    ctx.ensure_allowed("memory.delete")?;

    let removed = ctx.inspector().delete(id, tier).await?;
    let preview: String = removed.content.chars().take(80).collect();
    println!("🗑  Deleted {tier}-term memory [{id}]");
    println!("   Content: {preview}");

    Ok(())
}
