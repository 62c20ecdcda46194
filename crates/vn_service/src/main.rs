use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tokio::signal;
use tracing::info;

use vn_service::reaper;
use vn_store::Store;

#[derive(Parser, Debug)]
#[command(author, version, about = "VeilNote confidential-sharing service", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Open the store and keep the background reaper sweeping
    Run {
        /// Path to the SQLite database
        #[arg(long)]
        db: PathBuf,
        /// Seconds between reaper sweeps
        #[arg(long, default_value_t = 3600)]
        sweep_interval: u64,
    },
    /// Run a single sweep of dead share records and exit
    Sweep {
        /// Path to the SQLite database
        #[arg(long)]
        db: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();
    match cli.command {
        Commands::Run { db, sweep_interval } => run_command(db, sweep_interval).await,
        Commands::Sweep { db } => sweep_command(db).await,
    }
}

async fn run_command(db: PathBuf, sweep_interval: u64) -> Result<()> {
    let store = Store::open(&db).await?;
    let (handle, control) =
        reaper::spawn_reaper(store.clone(), Duration::from_secs(sweep_interval));
    info!(db = %db.display(), "service ready");

    signal::ctrl_c().await?;
    info!("shutdown requested");
    let _ = control.shutdown_tx.send(true);
    handle.await?;
    store.close().await;
    Ok(())
}

async fn sweep_command(db: PathBuf) -> Result<()> {
    let store = Store::open(&db).await?;
    reaper::sweep(&store).await;
    store.close().await;
    Ok(())
}
