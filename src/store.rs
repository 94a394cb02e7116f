//! SQLite persistence for archived articles.
//!
//! The archive is a single table:
//!
//! ```text
//! articles(id INTEGER PRIMARY KEY AUTOINCREMENT, type, title, description,
//!          link UNIQUE, firstPublished, lastPublished)
//! ```
//!
//! Every operation opens its own connection and closes it before returning.
//! No connection or transaction outlives a single call.

use crate::error::StoreError;
use crate::models::{Article, StoredArticle};
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use sqlx::{ConnectOptions, Connection, Row};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS articles (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        type TEXT,
        title TEXT,
        description TEXT,
        link TEXT UNIQUE,
        firstPublished DATETIME,
        lastPublished DATETIME
    )
"#;

/// Result of [`ArticleStore::insert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// A new row was written with this id.
    Inserted(i64),
    /// A row with the same link already exists; nothing was written.
    Skipped,
}

/// Handle on the SQLite archive file.
#[derive(Debug, Clone)]
pub struct ArticleStore {
    path: PathBuf,
}

impl ArticleStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the `articles` table if it does not exist yet.
    ///
    /// Also creates the parent directory of the database file. Safe to call
    /// on every startup.
    #[instrument(level = "info", skip_all, fields(path = %self.path.display()))]
    pub async fn initialize(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut conn = self.connect().await?;
        sqlx::query(CREATE_TABLE).execute(&mut conn).await?;
        conn.close().await?;

        info!("Article table ready");
        Ok(())
    }

    /// Insert `article` unless a row with the same link is already stored.
    ///
    /// The existence check and the insert are two statements on the same
    /// connection; the store assumes a single writer.
    #[instrument(level = "debug", skip_all, fields(link = %article.link))]
    pub async fn insert(&self, article: &Article) -> Result<InsertOutcome, StoreError> {
        let mut conn = self.connect().await?;

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM articles WHERE link = ?")
            .bind(&article.link)
            .fetch_one(&mut conn)
            .await?;

        let outcome = if count == 0 {
            let result = sqlx::query(
                r#"
                INSERT INTO articles (type, title, description, link, firstPublished, lastPublished)
                VALUES (?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&article.kind)
            .bind(&article.title)
            .bind(&article.description)
            .bind(&article.link)
            .bind(article.first_published.as_deref())
            .bind(article.last_published.as_deref())
            .execute(&mut conn)
            .await?;

            let id = result.last_insert_rowid();
            debug!(id, "Inserted article");
            InsertOutcome::Inserted(id)
        } else {
            info!("{} already exists.", article.title);
            InsertOutcome::Skipped
        };

        conn.close().await?;
        Ok(outcome)
    }

    /// Read every stored article, oldest first.
    #[instrument(level = "debug", skip_all)]
    pub async fn fetch_all(&self) -> Result<Vec<StoredArticle>, StoreError> {
        let mut conn = self.connect().await?;

        let rows = sqlx::query(
            r#"
            SELECT id, type, title, description, link, firstPublished, lastPublished
            FROM articles
            ORDER BY id
            "#,
        )
        .fetch_all(&mut conn)
        .await?;

        let mut articles = Vec::with_capacity(rows.len());
        for row in rows {
            articles.push(StoredArticle {
                id: row.try_get("id")?,
                kind: row.try_get::<Option<String>, _>("type")?.unwrap_or_default(),
                title: row.try_get::<Option<String>, _>("title")?.unwrap_or_default(),
                description: row
                    .try_get::<Option<String>, _>("description")?
                    .unwrap_or_default(),
                link: row.try_get::<Option<String>, _>("link")?.unwrap_or_default(),
                first_published: row.try_get("firstPublished")?,
                last_published: row.try_get("lastPublished")?,
            });
        }

        conn.close().await?;
        Ok(articles)
    }

    async fn connect(&self) -> Result<SqliteConnection, StoreError> {
        let conn = SqliteConnectOptions::new()
            .filename(&self.path)
            .create_if_missing(true)
            .connect()
            .await?;
        Ok(conn)
    }
}
