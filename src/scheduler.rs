//! Scheduled archive job.
//!
//! A single cron job is registered with [`JobScheduler`]. Each tick fetches
//! the topic page, inserts every new article, then reads the whole archive
//! back and logs it. Failures are logged and end the tick; the next trigger
//! runs regardless.

use crate::models::Article;
use crate::scrapers::bbc;
use crate::store::{ArticleStore, InsertOutcome};
use chrono_tz::Tz;
use reqwest::Client;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};
use tracing::{debug, error, info, instrument, warn};

/// Everything a tick needs, shared between ticks.
#[derive(Debug)]
pub struct Archiver {
    pub client: Client,
    pub store: ArticleStore,
    pub url: String,
    /// Held for the duration of a tick so that ticks never overlap.
    running: Mutex<()>,
}

/// Counters for one tick.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TickReport {
    pub collected: usize,
    pub inserted: usize,
    pub skipped: usize,
    pub failed: usize,
    /// Rows in the archive after the tick; `None` if it could not be read.
    pub stored: Option<usize>,
}

impl Archiver {
    pub fn new(client: Client, store: ArticleStore, url: String) -> Self {
        Self {
            client,
            store,
            url,
            running: Mutex::new(()),
        }
    }

    /// Run one tick unless another one is still in progress.
    ///
    /// # Returns
    ///
    /// `None` if the tick was skipped or the page could not be scraped.
    pub async fn run_tick(&self) -> Option<TickReport> {
        let Ok(_guard) = self.running.try_lock() else {
            warn!("Previous archive run still in progress; skipping this tick");
            return None;
        };

        let articles = match bbc::fetch_articles(&self.client, &self.url).await {
            Ok(articles) => articles,
            Err(e) => {
                error!(url = %self.url, error = %e, "Scrape failed; skipping this tick");
                return None;
            }
        };

        Some(archive_articles(&self.store, &articles).await)
    }
}

/// Insert `articles` into `store`, then read back and log the whole archive.
///
/// A failed insert is logged and does not stop the remaining ones.
#[instrument(level = "info", skip_all, fields(count = articles.len()))]
pub async fn archive_articles(store: &ArticleStore, articles: &[Article]) -> TickReport {
    let mut report = TickReport {
        collected: articles.len(),
        ..TickReport::default()
    };

    for article in articles {
        match store.insert(article).await {
            Ok(InsertOutcome::Inserted(id)) => {
                debug!(id, link = %article.link, "Archived new article");
                report.inserted += 1;
            }
            Ok(InsertOutcome::Skipped) => report.skipped += 1,
            Err(e) => {
                error!(link = %article.link, error = %e, "Insert failed");
                report.failed += 1;
            }
        }
    }

    match store.fetch_all().await {
        Ok(rows) => {
            for row in &rows {
                info!(
                    id = row.id,
                    kind = %row.kind,
                    link = %row.link,
                    first_published = row.first_published.as_deref().unwrap_or("-"),
                    last_published = row.last_published.as_deref().unwrap_or("-"),
                    "{}",
                    row.title
                );
            }
            report.stored = Some(rows.len());
        }
        Err(e) => error!(error = %e, "Fetch failed"),
    }

    info!(
        collected = report.collected,
        inserted = report.inserted,
        skipped = report.skipped,
        failed = report.failed,
        stored = ?report.stored,
        "Archive run complete"
    );
    report
}

/// Builds and starts the job scheduler with the archive job.
///
/// Returns the running [`JobScheduler`] handle, which must be kept alive for
/// the lifetime of the process. Dropping it shuts down the job.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] if `cron` is not a valid expression or the
/// scheduler cannot be started.
pub async fn build_scheduler(
    archiver: Arc<Archiver>,
    cron: &str,
    timezone: Tz,
) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;

    let job = Job::new_async_tz(cron, timezone, move |_uuid, _lock| {
        let archiver = Arc::clone(&archiver);

        Box::pin(async move {
            info!(url = %archiver.url, "scheduler: starting archive run");
            archiver.run_tick().await;
        })
    })?;

    scheduler.add(job).await?;
    scheduler.start().await?;

    info!(cron, %timezone, "Scheduled archive job");
    Ok(scheduler)
}
