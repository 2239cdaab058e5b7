//! `skymem onboard` — initialize configuration and the memory directory.

use skymem_config::SkymemConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config_dir = SkymemConfig::config_dir();
    let config_path = config_dir.join("config.toml");

    if config_path.exists() {
        println!("✅ Config already exists at {}", config_path.display());
    } else {
        std::fs::create_dir_all(&config_dir)?;
        std::fs::write(&config_path, SkymemConfig::default_toml())?;
        println!("📝 Wrote default config to {}", config_path.display());
    }

    let config = SkymemConfig::load()?;
    std::fs::create_dir_all(&config.memory_dir)?;
    println!("🧠 Memory directory ready at {}", config.memory_dir.display());
    println!(
        "   promote threshold: {:.2}, short-term cap: {} lines",
        config.retention.promote_threshold, config.retention.short_term_max_lines
    );

    Ok(())
}
