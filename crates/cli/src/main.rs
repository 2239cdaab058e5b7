//! `skymem` — the Sky assistant's memory CLI.
//!
//! Commands:
//! - `onboard`  — Initialize config & memory directory
//! - `write`    — Record content through the scoring router
//! - `remember` — Commit content straight to long-term
//! - `list` / `get` / `search` / `stats` — Inspect the streams
//! - `promote`  — Manually promote one record by id
//! - `maintain` — Run the promotion batch once or on an interval
//! - `delete`   — Permanently remove a record

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "skymem",
    about = "skymem — memory lifecycle for the Sky assistant",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize configuration and the memory directory
    Onboard,

    /// Record new content (scored and routed automatically)
    Write {
        /// The content to remember
        content: String,

        /// Comma-separated tags
        #[arg(short, long, value_delimiter = ',')]
        tags: Vec<String>,

        /// Explicit importance in [0.0, 1.0] (skips the heuristic)
        #[arg(short, long)]
        importance: Option<f64>,
    },

    /// Commit content straight to long-term memory
    Remember {
        /// The content to remember
        content: String,

        /// Importance in [0.0, 1.0]; must clear the promote threshold
        #[arg(short, long)]
        importance: f64,

        /// Comma-separated tags
        #[arg(short, long, value_delimiter = ',')]
        tags: Vec<String>,
    },

    /// List records in a tier
    List {
        /// Which tier to list
        #[arg(short, long, default_value = "short")]
        tier: String,
    },

    /// Show a single record by id
    Get {
        /// Record id
        id: String,

        /// Which tier to look in
        #[arg(short, long, default_value = "short")]
        tier: String,
    },

    /// Search memory content by substring
    Search {
        /// Search term
        query: String,

        /// Skip long-term memory
        #[arg(long)]
        short_only: bool,
    },

    /// Show memory statistics
    Stats,

    /// Promote a short-term record to long-term by id
    Promote {
        /// Record id
        id: String,
    },

    /// Run the promotion batch once, or on an interval
    Maintain {
        /// Repeat every N seconds instead of running once
        #[arg(long)]
        interval_secs: Option<u64>,
    },

    /// Permanently delete a record
    Delete {
        /// Record id
        id: String,

        /// Which tier to delete from
        #[arg(short, long, default_value = "short")]
        tier: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Onboard => commands::onboard::run().await?,
        Commands::Write {
            content,
            tags,
            importance,
        } => commands::write::run(&content, tags, importance).await?,
        Commands::Remember {
            content,
            importance,
            tags,
        } => commands::write::run_remember(&content, tags, importance).await?,
        Commands::List { tier } => commands::inspect::list(&tier).await?,
        Commands::Get { id, tier } => commands::inspect::get(&id, &tier).await?,
        Commands::Search { query, short_only } => {
            commands::inspect::search(&query, !short_only).await?
        }
        Commands::Stats => commands::inspect::stats().await?,
        Commands::Promote { id } => commands::promote::run(&id).await?,
        Commands::Maintain { interval_secs } => commands::promote::maintain(interval_secs).await?,
        Commands::Delete { id, tier } => commands::delete::run(&id, &tier).await?,
    }

    Ok(())
}
