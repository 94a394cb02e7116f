//! # BBC News Archiver
//!
//! Keeps a local SQLite archive of the articles listed on a BBC World
//! Service topic page (by default the Chinese service, traditional script).
//!
//! ## Usage
//!
//! ```sh
//! bbc_news_archiver                      # every day at 18:00 Asia/Shanghai
//! bbc_news_archiver --once -d ./news.db  # single run, then exit
//! ```
//!
//! ## Architecture
//!
//! Each run is a short sequential pipeline:
//! 1. **Fetching**: download the topic page
//! 2. **Extraction**: decode the `window.SIMORGH_DATA` JSON embedded in it
//! 3. **Collection**: flatten curations and summaries into articles
//! 4. **Storage**: insert articles whose link is not yet archived, then
//!    read the whole archive back and log it

use clap::Parser;
use std::error::Error;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod error;
mod models;
mod scheduler;
mod scrapers;
mod store;
mod utils;

use cli::Cli;
use scheduler::Archiver;
use store::ArticleStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    info!("bbc_news_archiver starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let client = scrapers::build_client(Duration::from_secs(args.timeout_secs))?;
    warn!("TLS certificate verification is disabled for outgoing requests");

    // The table is created once per process; a failure here is logged and
    // every later insert will report its own error.
    let store = ArticleStore::new(&args.database);
    if let Err(e) = store.initialize().await {
        error!(path = %store.path().display(), error = %e, "Create table failed");
    }

    let archiver = Arc::new(Archiver::new(client, store, args.url.to_string()));

    if args.once {
        let start_time = std::time::Instant::now();
        let report = archiver.run_tick().await;
        let elapsed = start_time.elapsed();
        info!(?elapsed, ok = report.is_some(), "Single run complete");
        return Ok(());
    }

    let mut scheduler =
        scheduler::build_scheduler(Arc::clone(&archiver), &args.cron, args.timezone).await?;

    tokio::signal::ctrl_c().await?;
    info!("Shutdown requested");
    scheduler.shutdown().await?;

    Ok(())
}
