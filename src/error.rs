//! Error types for the scrape and storage stages.

use thiserror::Error;

/// Failure while fetching or decoding the topic page. Ends the current tick.
#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The page no longer carries the `window.SIMORGH_DATA` script; the
    /// site markup has most likely changed.
    #[error("page structure changed: no script containing {marker}")]
    MissingPayload { marker: &'static str },

    #[error("embedded page data is not valid JSON: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Failure while talking to the SQLite store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
