//! `skymem write` / `skymem remember` — the write path.

use super::{AppContext, print_record};

pub async fn run(
    content: &str,
    tags: Vec<String>,
    importance: Option<f64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = AppContext::load()?;
    ctx.ensure_allowed("memory.write")?;

    let record = ctx.router().write(content, tags, importance).await?;

    println!("✅ Stored in {}-term memory:", record.tier);
    print_record(&record);

    Ok(())
}

pub async fn run_remember(
    content: &str,
    tags: Vec<String>,
    importance: f64,
) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = AppContext::load()?;
    ctx.ensure_allowed("memory.remember")?;

    let record = ctx
        .router()
        .write_explicit_long(content, tags, importance)
        .await?;

    println!("✅ Committed to long-term memory:");
    print_record(&record);

    Ok(())
}
