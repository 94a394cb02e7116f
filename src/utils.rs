//! Utility functions for timestamp normalization and log formatting.
//!
//! This module provides helper functions used throughout the application:
//! - Conversion of the page's UTC timestamps into the storage format
//! - String truncation for logging raw payload fragments

use chrono::{NaiveDateTime, Timelike};
use tracing::warn;

/// Timestamp format used by the embedded page data, e.g. `2024-01-01T08:00:00.000000Z`.
const SOURCE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.fZ";

/// Timestamp format written to the database, e.g. `2024-01-01 08:00:00`.
const STORAGE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Normalize a page timestamp into the storage format.
///
/// Fractional seconds are dropped, never rounded, so the result denotes the
/// same second as the input.
///
/// # Returns
///
/// `Some("YYYY-MM-DD HH:MM:SS")`, or `None` if `raw` does not match
/// `YYYY-MM-DDTHH:MM:SS.ffffffZ`. A failure is logged and never aborts the
/// caller: the article is stored with a null timestamp instead.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(
///     normalize_timestamp("2024-01-01T08:00:00.000000Z").as_deref(),
///     Some("2024-01-01 08:00:00")
/// );
/// assert_eq!(normalize_timestamp("yesterday"), None);
/// ```
pub fn normalize_timestamp(raw: &str) -> Option<String> {
    match NaiveDateTime::parse_from_str(raw, SOURCE_FORMAT) {
        // chrono accepts `:60` as a leap second; the source format does not.
        Ok(dt) if dt.nanosecond() >= 1_000_000_000 => {
            warn!(value = %truncate_for_log(raw, 64), "Invalid date format: leap second");
            None
        }
        Ok(dt) => Some(dt.format(STORAGE_FORMAT).to_string()),
        Err(e) => {
            warn!(value = %truncate_for_log(raw, 64), error = %e, "Invalid date format");
            None
        }
    }
}

/// Truncate a string for logging purposes.
///
/// Long strings are truncated to at most `max` bytes (on a char boundary)
/// with an ellipsis and byte count indicator appended.
///
/// # Returns
///
/// The original string if it fits, otherwise a truncated version with
/// `"…(+N bytes)"` appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…(+{} bytes)", &s[..end], s.len() - end)
}
