//! [`SqliteDocumentIndex`] — the search-document mirror of the relational
//! store.
//!
//! Each article is stored as one JSON-encoded [`ArticleDocument`]. Reads go
//! through `Article::from(ArticleDocument)`, so the search path yields the
//! same aggregate type as the relational path.

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use scoap_core::{Article, ArticleDocument, ArticleId, source::ArticleSource};

use crate::{Error, Result, encode::encode_dt, schema::INDEX_SCHEMA};

/// A document index backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteDocumentIndex {
  conn: tokio_rusqlite::Connection,
}

impl SqliteDocumentIndex {
  /// Open (or create) an index at `path`.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let index = Self { conn };
    index.init_schema().await?;
    Ok(index)
  }

  /// Open an in-memory index, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let index = Self { conn };
    index.init_schema().await?;
    Ok(index)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(INDEX_SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Flatten `article` into a document and store it, replacing any previous
  /// document for the same id.
  pub async fn index_article(&self, article: &Article) -> Result<ArticleDocument> {
    let document = ArticleDocument::from(article);
    self.put_document(&document).await?;
    Ok(document)
  }

  /// Store a pre-built document, replacing any previous one with its id.
  pub async fn put_document(&self, document: &ArticleDocument) -> Result<()> {
    let id = document.id;
    let body = document.to_json()?;
    let at = encode_dt(Utc::now());

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO article_documents (id, body, indexed_at) VALUES (?1, ?2, ?3)
           ON CONFLICT(id) DO UPDATE SET body = excluded.body,
                                         indexed_at = excluded.indexed_at",
          rusqlite::params![id, body, at],
        )?;
        Ok(())
      })
      .await?;

    tracing::debug!(article_id = id, "indexed article document");
    Ok(())
  }

  /// Retrieve the raw document for `id`. Returns `None` if not indexed.
  pub async fn get_document(&self, id: ArticleId) -> Result<Option<ArticleDocument>> {
    let body: Option<String> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT body FROM article_documents WHERE id = ?1",
              [id],
              |row| row.get(0),
            )
            .optional()?,
        )
      })
      .await?;

    let Some(body) = body else {
      return Ok(None);
    };
    let document = ArticleDocument::from_json(&body)?;
    if document.id != id {
      return Err(Error::Core(scoap_core::Error::DocumentMismatch {
        expected: id,
        found:    document.id,
      }));
    }
    Ok(Some(document))
  }

  /// Drop the document for `id`. Returns whether one existed.
  pub async fn remove(&self, id: ArticleId) -> Result<bool> {
    let removed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM article_documents WHERE id = ?1", [id])?)
      })
      .await?;
    Ok(removed > 0)
  }
}

// ─── ArticleSource impl ──────────────────────────────────────────────────────

impl ArticleSource for SqliteDocumentIndex {
  type Error = Error;

  async fn get_article(&self, id: ArticleId) -> Result<Option<Article>> {
    Ok(self.get_document(id).await?.map(Article::from))
  }

  async fn list_article_ids(&self) -> Result<Vec<ArticleId>> {
    let ids = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare("SELECT id FROM article_documents ORDER BY id")?;
        let ids = stmt
          .query_map([], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<ArticleId>>>()?;
        Ok(ids)
      })
      .await?;
    Ok(ids)
  }
}
