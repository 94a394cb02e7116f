//! Command-line interface definitions for the BBC news archiver.
//!
//! Every option has a built-in default, so running the binary without
//! arguments archives the BBC Chinese (traditional) topic page into
//! `BBC_news.db` every day at 18:00 Asia/Shanghai. All options can also be
//! provided through environment variables.

use chrono_tz::Tz;
use clap::Parser;
use url::Url;

/// Listing page scraped on every tick.
pub const DEFAULT_URL: &str = "https://www.bbc.com/zhongwen/topics/c83plve5vmjt/trad";

/// Command-line arguments for the archiver.
///
/// # Examples
///
/// ```sh
/// # Run forever with the built-in schedule
/// bbc_news_archiver
///
/// # Run a single tick against another database and exit
/// bbc_news_archiver --database ./data/news.db --once
///
/// # Every day at 06:30 UTC
/// bbc_news_archiver --cron "0 30 6 * * *" --timezone UTC
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Topic page to scrape
    #[arg(long, env = "NEWS_URL", default_value = DEFAULT_URL)]
    pub url: Url,

    /// Path to the SQLite database file
    #[arg(short, long, env = "NEWS_DATABASE", default_value = "BBC_news.db")]
    pub database: String,

    /// Cron expression (with seconds) for the scrape job
    #[arg(long, env = "NEWS_CRON", default_value = "0 0 18 * * *")]
    pub cron: String,

    /// IANA timezone the cron expression is evaluated in
    #[arg(long, env = "NEWS_TIMEZONE", default_value = "Asia/Shanghai")]
    pub timezone: Tz,

    /// HTTP request timeout in seconds
    #[arg(long, env = "NEWS_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,

    /// Run a single scrape immediately and exit instead of scheduling
    #[arg(long)]
    pub once: bool,
}
