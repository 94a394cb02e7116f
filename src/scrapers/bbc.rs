//! BBC topic page scraper.
//!
//! BBC World Service pages (for example the Chinese service at
//! `https://www.bbc.com/zhongwen/...`) are rendered by the Simorgh frontend,
//! which ships the whole page model as an inline script:
//!
//! ```text
//! <script>window.SIMORGH_DATA={"pageData":{"curations":[...]}}</script>
//! ```
//!
//! Each curation is a page section; those that list stories carry a
//! `summaries` array with `type`, `title`, `description`, `link`,
//! `firstPublished` and `lastPublished`.

use crate::error::ScrapeError;
use crate::models::{Article, SimorghData, Summary};
use crate::utils::{normalize_timestamp, truncate_for_log};
use reqwest::Client;
use scraper::{Html, Selector};
use serde_json::Value;
use std::sync::LazyLock;
use tracing::{debug, info, instrument, warn};

/// Token identifying the script that holds the page data.
pub const PAYLOAD_MARKER: &str = "window.SIMORGH_DATA";

/// Assignment prefix stripped before decoding the JSON document.
const PAYLOAD_ASSIGNMENT: &str = "window.SIMORGH_DATA=";

static SCRIPT_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("script").expect("static selector is valid"));

/// Fetch the topic page and collect its articles.
///
/// Performs a single `GET` of `url`. Non-success statuses are reported as
/// [`ScrapeError::Http`].
///
/// # Returns
///
/// The articles in page order, or an error if the page could not be fetched
/// or no longer carries the embedded payload.
#[instrument(level = "info", skip(client))]
pub async fn fetch_articles(client: &Client, url: &str) -> Result<Vec<Article>, ScrapeError> {
    let response = client.get(url).send().await?.error_for_status()?;
    let html = response.text().await?;
    debug!(bytes = html.len(), "Fetched topic page");

    let articles = collect_articles(&html)?;
    info!(count = articles.len(), "Collected BBC articles");
    Ok(articles)
}

/// Collect articles from the HTML of a topic page.
///
/// Curations without `summaries` contribute nothing. A summary lacking a
/// `title` or `link` is logged and skipped; every other summary yields one
/// [`Article`], in the order the page lists them.
pub fn collect_articles(html: &str) -> Result<Vec<Article>, ScrapeError> {
    let data = extract_page_data(html)?;

    let mut articles = Vec::new();
    for (curation_index, curation) in data.page_data.curations.into_iter().enumerate() {
        for raw in curation.summaries {
            match serde_json::from_value::<Summary>(raw.clone()) {
                Ok(summary) => articles.push(to_article(summary)),
                Err(e) => {
                    warn!(
                        curation = curation_index,
                        error = %e,
                        summary = %truncate_for_log(&raw.to_string(), 200),
                        "Skipping malformed summary"
                    );
                }
            }
        }
    }
    Ok(articles)
}

/// Locate the `window.SIMORGH_DATA` script in `html` and decode it.
///
/// # Errors
///
/// - [`ScrapeError::MissingPayload`] if no script contains the marker
/// - [`ScrapeError::Payload`] if the assigned value is not the expected JSON
pub fn extract_page_data(html: &str) -> Result<SimorghData, ScrapeError> {
    let document = Html::parse_document(html);

    let script = document
        .select(&SCRIPT_SELECTOR)
        .map(|element| element.text().collect::<String>())
        .find(|text| text.contains(PAYLOAD_MARKER))
        .ok_or(ScrapeError::MissingPayload {
            marker: PAYLOAD_MARKER,
        })?;

    let json = script.trim().replacen(PAYLOAD_ASSIGNMENT, "", 1);
    let json = json.trim().trim_end_matches(';');
    debug!(bytes = json.len(), "Extracted embedded page data");

    Ok(serde_json::from_str(json)?)
}

fn to_article(summary: Summary) -> Article {
    Article {
        kind: text_field(summary.kind),
        title: summary.title,
        description: text_field(summary.description),
        link: summary.link,
        first_published: timestamp_field(summary.first_published),
        last_published: timestamp_field(summary.last_published),
    }
}

/// Strings pass through, null or missing becomes empty, anything else is
/// kept as its JSON text.
fn text_field(value: Option<Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s,
        Some(other) => other.to_string(),
    }
}

fn timestamp_field(value: Option<Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(raw) => normalize_timestamp(&raw),
        other => {
            warn!(value = %truncate_for_log(&other.to_string(), 64), "Invalid date format");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(payload: &str) -> String {
        format!(
            "<!DOCTYPE html><html><head><title>BBC</title>\
             <script>window.dataLayer = [];</script></head>\
             <body><div id=\"root\"></div><script>{payload}</script></body></html>"
        )
    }

    const SINGLE_ARTICLE: &str = r#"window.SIMORGH_DATA={"pageData":{"curations":[{"summaries":[{"type":"Article","title":"T1","description":"D1","link":"https://x/1","firstPublished":"2024-01-01T08:00:00.000000Z","lastPublished":"2024-01-01T09:00:00.000000Z"}]}]}}"#;

    #[test]
    fn test_collect_single_article() {
        let articles = collect_articles(&page(SINGLE_ARTICLE)).unwrap();

        assert_eq!(
            articles,
            vec![Article {
                kind: "Article".to_string(),
                title: "T1".to_string(),
                description: "D1".to_string(),
                link: "https://x/1".to_string(),
                first_published: Some("2024-01-01 08:00:00".to_string()),
                last_published: Some("2024-01-01 09:00:00".to_string()),
            }]
        );
    }

    #[test]
    fn test_collect_flattens_curations_in_order() {
        let payload = r#"window.SIMORGH_DATA={"pageData":{"curations":[
            {"summaries":[
                {"type":"article","title":"A","description":"","link":"https://x/a","firstPublished":"2024-01-01T08:00:00.000000Z","lastPublished":"2024-01-01T08:00:00.000000Z"},
                {"type":"article","title":"B","description":"","link":"https://x/b","firstPublished":"2024-01-01T08:00:00.000000Z","lastPublished":"2024-01-01T08:00:00.000000Z"}
            ]},
            {"title":"Most read"},
            {"summaries":[]},
            {"summaries":[
                {"type":"video","title":"C","description":"","link":"https://x/c","firstPublished":"2024-01-01T08:00:00.000000Z","lastPublished":"2024-01-01T08:00:00.000000Z"}
            ]}
        ]}}"#;

        let articles = collect_articles(&page(payload)).unwrap();
        let titles: Vec<&str> = articles.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B", "C"]);
        assert_eq!(articles[2].kind, "video");
    }

    #[test]
    fn test_collect_nulls_malformed_timestamps() {
        let payload = r#"window.SIMORGH_DATA={"pageData":{"curations":[{"summaries":[
            {"type":"article","title":"T","description":null,"link":"https://x/1","firstPublished":"yesterday","lastPublished":"2024-01-01T09:00:00.000000Z"}
        ]}]}}"#;

        let articles = collect_articles(&page(payload)).unwrap();
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].description, "");
        assert_eq!(articles[0].first_published, None);
        assert_eq!(articles[0].last_published.as_deref(), Some("2024-01-01 09:00:00"));
    }

    #[test]
    fn test_collect_keeps_article_with_wrongly_typed_fields() {
        let payload = r#"window.SIMORGH_DATA={"pageData":{"curations":[{"summaries":[
            {"type":null,"title":"T","description":7,"link":"https://x/1","firstPublished":1704096000000,"lastPublished":"2024-01-01T09:00:00.000000Z"}
        ]}]}}"#;

        let articles = collect_articles(&page(payload)).unwrap();
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].kind, "");
        assert_eq!(articles[0].description, "7");
        assert_eq!(articles[0].first_published, None);
        assert_eq!(articles[0].last_published.as_deref(), Some("2024-01-01 09:00:00"));
    }

    #[test]
    fn test_collect_skips_summary_without_link() {
        let payload = r#"window.SIMORGH_DATA={"pageData":{"curations":[{"summaries":[
            {"type":"article","title":"No link"},
            {"type":"article","title":"Kept","link":"https://x/kept"}
        ]}]}}"#;

        let articles = collect_articles(&page(payload)).unwrap();
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].link, "https://x/kept");
    }

    #[test]
    fn test_extract_tolerates_whitespace_and_semicolon() {
        let payload = "\n  window.SIMORGH_DATA={\"pageData\":{\"curations\":[]}};\n";
        let data = extract_page_data(&page(payload)).unwrap();
        assert!(data.page_data.curations.is_empty());
    }

    #[test]
    fn test_extract_missing_marker() {
        let html = page("window.__APP_STATE__={}");
        let err = extract_page_data(&html).unwrap_err();
        assert!(matches!(err, ScrapeError::MissingPayload { .. }));
        assert!(err.to_string().contains(PAYLOAD_MARKER));
    }

    #[test]
    fn test_extract_garbled_payload() {
        let html = page("window.SIMORGH_DATA={\"pageData\":");
        let err = extract_page_data(&html).unwrap_err();
        assert!(matches!(err, ScrapeError::Payload(_)));
    }

    #[test]
    fn test_extract_requires_page_data() {
        let html = page("window.SIMORGH_DATA={\"other\":1}");
        assert!(matches!(
            extract_page_data(&html),
            Err(ScrapeError::Payload(_))
        ));
    }
}
