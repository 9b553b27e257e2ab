use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use riverdash_core::{Batch, BatchSummary, GaugePatch, GaugeRecord};
use riverdash_ingest::{load_batch, GaugeReconciler, IngestConfig};
use riverdash_web::WebConfig;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "riverdash")]
#[command(about = "River level dashboard: gauge ingestion and region map")]
struct Cli {
    /// Only log errors.
    #[arg(short, long, global = true)]
    quiet: bool,
    /// Log debug output.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the web server (crawler endpoints and map).
    Serve {
        /// Apply pending migrations before listening.
        #[arg(long)]
        migrate: bool,
    },
    /// Apply pending database migrations.
    Migrate,
    /// Register the gauges of a `{"data": [...]}` batch file.
    Register { file: PathBuf },
    /// Apply the gauge updates of a `{"data": [...]}` batch file.
    Update { file: PathBuf },
}

fn init_tracing(quiet: bool, verbose: bool) -> Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "info"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("RIVERDASH_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}

fn print_summary(action: &str, summary: &BatchSummary) {
    println!(
        "{action} complete: status={:?} requested={} processed={}",
        summary.status, summary.requested, summary.processed
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    let ingest = IngestConfig::from_env();
    match cli.command.unwrap_or(Commands::Serve { migrate: false }) {
        Commands::Serve { migrate } => {
            let store = ingest.connect_store().await?;
            if migrate {
                store.migrate().await.context("applying migrations")?;
                info!("migrations applied");
            }
            let reconciler = Arc::new(GaugeReconciler::new(Arc::new(store)));
            riverdash_web::serve(WebConfig::from_env(), reconciler).await?;
        }
        Commands::Migrate => {
            let store = ingest.connect_store().await?;
            store.migrate().await.context("applying migrations")?;
            println!("migrations applied");
        }
        Commands::Register { file } => {
            let batch: Batch<GaugeRecord> = load_batch(&file).await?;
            let store = ingest.connect_store().await?;
            let summary = GaugeReconciler::new(Arc::new(store))
                .register_batch(batch.data)
                .await
                .with_context(|| format!("registering gauges from {}", file.display()))?;
            print_summary("register", &summary);
        }
        Commands::Update { file } => {
            let batch: Batch<GaugePatch> = load_batch(&file).await?;
            let store = ingest.connect_store().await?;
            let summary = GaugeReconciler::new(Arc::new(store))
                .update_batch(batch.data)
                .await
                .with_context(|| format!("updating gauges from {}", file.display()))?;
            print_summary("update", &summary);
        }
    }

    Ok(())
}
