//! Data models for the scraped page payload and the archived articles.
//!
//! This module defines the structures used throughout the application:
//! - [`SimorghData`], [`PageData`], [`Curation`], [`Summary`]: the JSON
//!   document embedded in the BBC page behind `window.SIMORGH_DATA`
//! - [`Article`]: one article ready to be written to the store
//! - [`StoredArticle`]: an article row read back from the store
//!
//! The payload structs only declare the fields the archiver reads. Unknown
//! keys are ignored and missing collections decode as empty.

use serde::Deserialize;

/// Top-level document assigned to `window.SIMORGH_DATA`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimorghData {
    pub page_data: PageData,
}

/// The `pageData` object of the embedded document.
#[derive(Debug, Default, Deserialize)]
pub struct PageData {
    /// Content sections of the page, in display order.
    #[serde(default)]
    pub curations: Vec<Curation>,
}

/// A content section of the page.
///
/// Some curations (banners, promos) carry no `summaries`; those decode with
/// an empty list. Summaries stay as raw JSON so that one malformed entry can
/// be skipped without losing the rest of the page.
#[derive(Debug, Default, Deserialize)]
pub struct Curation {
    #[serde(default)]
    pub summaries: Vec<serde_json::Value>,
}

/// One article entry inside a curation, as published by the page.
///
/// Only `title` and `link` are required. The other fields keep whatever JSON
/// value the page sent so that a wrongly typed secondary field never costs
/// the whole article.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// Category tag such as `"article"` or `"video"`.
    #[serde(rename = "type", default)]
    pub kind: Option<serde_json::Value>,
    pub title: String,
    #[serde(default)]
    pub description: Option<serde_json::Value>,
    pub link: String,
    /// Source timestamp, `YYYY-MM-DDTHH:MM:SS.ffffffZ`.
    #[serde(default)]
    pub first_published: Option<serde_json::Value>,
    #[serde(default)]
    pub last_published: Option<serde_json::Value>,
}

/// An article collected during a tick, not yet persisted.
///
/// Timestamps are already normalized to `YYYY-MM-DD HH:MM:SS`; `None` means
/// the page value was missing or malformed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub kind: String,
    pub title: String,
    pub description: String,
    /// Unique across the whole archive.
    pub link: String,
    pub first_published: Option<String>,
    pub last_published: Option<String>,
}

/// A row of the `articles` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredArticle {
    /// Surrogate key assigned by SQLite on insert.
    pub id: i64,
    pub kind: String,
    pub title: String,
    pub description: String,
    pub link: String,
    pub first_published: Option<String>,
    pub last_published: Option<String>,
}
