mod extract;
mod fetch;
mod models;
mod pipeline;
mod storage;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use fetch::{FetchConfig, Fetcher};
use pipeline::{ExtractConfig, Extractor};
use storage::{FsStore, StorageEvent};

#[derive(Parser)]
#[command(name = "casas-scout", about = "Bogotá listing-page fetcher and CSV extractor")]
struct Cli {
    /// Directory backing the object store
    #[arg(long, default_value = "storage")]
    storage_root: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download the listing pages and store the raw HTML
    Fetch,
    /// Process an object-created notification into a CSV report
    Extract {
        /// Path to the notification payload (JSON)
        #[arg(long)]
        event: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    let store = FsStore::new(cli.storage_root);

    match cli.command {
        Commands::Fetch => {
            info!("🏠 Casas Scout - fetch batch");
            let fetcher = Fetcher::new(FetchConfig::default())?;
            let summary = fetcher.run(&store).await?;
            info!("✅ Done: {} pages stored, {} skipped", summary.fetched, summary.failed);
        }
        Commands::Extract { event } => {
            let payload = tokio::fs::read_to_string(&event)
                .await
                .with_context(|| format!("Failed to read {}", event.display()))?;
            let event = StorageEvent::from_json(&payload)?;

            let extractor = Extractor::new(ExtractConfig::default());
            extractor.handle_event(&store, &event).await?;
            info!("✅ Done processing {} record(s)", event.records.len());
        }
    }

    Ok(())
}
