//! [`SqliteStore`] — the relational implementation of [`ArticleSource`].

use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{Connection, OptionalExtension as _};
use scoap_core::{
  Article, ArticleId,
  article::{
    ArticleFile, ArticleIdentifier, ArxivCategory, Author, Copyright, License,
    PublicationInfo,
  },
  source::ArticleSource,
};

use crate::{
  Error, Result,
  encode::{
    RawAffiliation, RawArticle, RawAuthor, RawPublicationInfo, decode_dt,
    encode_date, encode_dt,
  },
  schema::SCHEMA,
};

// ─── Input ───────────────────────────────────────────────────────────────────

/// Input to [`SqliteStore::create_article`].
/// `id`, `created_at` and `updated_at` are always set by the store.
#[derive(Debug, Clone, Default)]
pub struct NewArticle {
  pub title:                  Option<String>,
  pub subtitle:               Option<String>,
  pub abstract_text:          Option<String>,
  pub publication_date:       Option<NaiveDate>,
  pub related_files:          Vec<ArticleFile>,
  pub article_identifiers:    Vec<ArticleIdentifier>,
  pub article_arxiv_category: Vec<ArxivCategory>,
  pub authors:                Vec<Author>,
  pub publication_info:       Vec<PublicationInfo>,
  pub copyright:              Vec<Copyright>,
  pub related_licenses:       Vec<License>,
}

impl NewArticle {
  fn into_article(self, id: ArticleId, now: DateTime<Utc>) -> Article {
    Article {
      id,
      title: self.title,
      subtitle: self.subtitle,
      abstract_text: self.abstract_text,
      publication_date: self.publication_date,
      created_at: now,
      updated_at: now,
      related_files: self.related_files,
      article_identifiers: self.article_identifiers,
      article_arxiv_category: self.article_arxiv_category,
      authors: self.authors,
      publication_info: self.publication_info,
      copyright: self.copyright,
      related_licenses: self.related_licenses,
    }
  }
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// The relational article store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Persist a new article. The store assigns the id and both timestamps.
  ///
  /// Returns the aggregate as stored, read back in the same transaction.
  pub async fn create_article(&self, input: NewArticle) -> Result<Article> {
    let to_insert = input.into_article(0, Utc::now());

    let raw = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let id = insert_article(&tx, &to_insert, false)?;
        let stored = load_stored(&tx, id)?;
        tx.commit()?;
        Ok(stored)
      })
      .await?;

    let article = raw.into_article()?;
    tracing::debug!(article_id = article.id, "created article");
    Ok(article)
  }

  /// Persist an article exactly as given, keeping its id and timestamps.
  ///
  /// Used when migrating records from another system. Fails with
  /// [`Error::DuplicateArticle`] if the id is already taken. Returns the
  /// aggregate as stored, read back in the same transaction.
  pub async fn import_article(&self, article: Article) -> Result<Article> {
    let id = article.id;

    let raw = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let exists = tx
          .query_row("SELECT 1 FROM articles WHERE id = ?1", [id], |_| Ok(()))
          .optional()?
          .is_some();
        if exists {
          return Ok(None);
        }
        insert_article(&tx, &article, true)?;
        let stored = load_stored(&tx, id)?;
        tx.commit()?;
        Ok(Some(stored))
      })
      .await?;

    let Some(raw) = raw else {
      return Err(Error::DuplicateArticle(id));
    };
    let article = raw.into_article()?;
    tracing::debug!(article_id = id, "imported article");
    Ok(article)
  }

  /// Bump `updated_at` to now. `updated_at` never moves backwards.
  ///
  /// The read and the write share one transaction, so concurrent touches
  /// cannot interleave.
  pub async fn touch_article(&self, id: ArticleId) -> Result<DateTime<Utc>> {
    let touched = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let current: Option<String> = tx
          .query_row("SELECT updated_at FROM articles WHERE id = ?1", [id], |row| {
            row.get(0)
          })
          .optional()?;
        let Some(current) = current else {
          return Ok(None);
        };
        let current = decode_dt(&current)
          .map_err(|e| tokio_rusqlite::Error::Other(e.to_string().into()))?;
        let now = Utc::now().max(current);
        tx.execute(
          "UPDATE articles SET updated_at = ?1 WHERE id = ?2",
          rusqlite::params![encode_dt(now), id],
        )?;
        tx.commit()?;
        Ok(Some(now))
      })
      .await?;

    touched.ok_or(Error::ArticleNotFound(id))
  }
}

// ─── Writes ──────────────────────────────────────────────────────────────────

/// Insert the article row and all related rows. Returns the article id.
///
/// With `keep_id = false` the id is assigned by SQLite.
fn insert_article(
  conn: &Connection,
  a: &Article,
  keep_id: bool,
) -> rusqlite::Result<ArticleId> {
  let explicit_id = keep_id.then_some(a.id);
  conn.execute(
    "INSERT INTO articles (
       id, title, subtitle, abstract, publication_date, created_at, updated_at
     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    rusqlite::params![
      explicit_id,
      a.title,
      a.subtitle,
      a.abstract_text,
      a.publication_date.map(encode_date),
      encode_dt(a.created_at),
      encode_dt(a.updated_at),
    ],
  )?;
  let id = conn.last_insert_rowid();

  for (pos, f) in a.related_files.iter().enumerate() {
    conn.execute(
      "INSERT INTO article_files (article_id, position, file, size, filetype)
       VALUES (?1, ?2, ?3, ?4, ?5)",
      rusqlite::params![
        id,
        pos as i64,
        f.file,
        f.size.and_then(|s| i64::try_from(s).ok()),
        f.filetype,
      ],
    )?;
  }

  for (pos, i) in a.article_identifiers.iter().enumerate() {
    conn.execute(
      "INSERT INTO article_identifiers
         (article_id, position, identifier_type, identifier_value)
       VALUES (?1, ?2, ?3, ?4)",
      rusqlite::params![id, pos as i64, i.identifier_type.as_str(), i.identifier_value],
    )?;
  }

  for (pos, c) in a.article_arxiv_category.iter().enumerate() {
    conn.execute(
      "INSERT INTO arxiv_categories (article_id, position, category, is_primary)
       VALUES (?1, ?2, ?3, ?4)",
      rusqlite::params![id, pos as i64, c.category, c.primary],
    )?;
  }

  for (pos, author) in a.authors.iter().enumerate() {
    insert_author(conn, id, pos, author)?;
  }

  for (pos, p) in a.publication_info.iter().enumerate() {
    conn.execute(
      "INSERT INTO publishers (name) VALUES (?1) ON CONFLICT(name) DO NOTHING",
      [&p.publisher],
    )?;
    let publisher_id: i64 = conn.query_row(
      "SELECT id FROM publishers WHERE name = ?1",
      [&p.publisher],
      |r| r.get(0),
    )?;
    conn.execute(
      "INSERT INTO publication_info (
         article_id, position, publisher_id, journal_title, journal_volume,
         journal_issue, journal_issue_date, volume_year, page_start, page_end, artid
       ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
      rusqlite::params![
        id,
        pos as i64,
        publisher_id,
        p.journal_title,
        p.journal_volume,
        p.journal_issue,
        p.journal_issue_date.map(encode_date),
        p.volume_year,
        p.page_start,
        p.page_end,
        p.artid,
      ],
    )?;
  }

  for (pos, c) in a.copyright.iter().enumerate() {
    conn.execute(
      "INSERT INTO copyrights (article_id, position, statement, holder, year)
       VALUES (?1, ?2, ?3, ?4, ?5)",
      rusqlite::params![id, pos as i64, c.statement, c.holder, c.year],
    )?;
  }

  for (pos, l) in a.related_licenses.iter().enumerate() {
    let existing: Option<i64> = conn
      .query_row(
        "SELECT id FROM licenses WHERE name = ?1 AND url IS ?2",
        rusqlite::params![l.name, l.url],
        |r| r.get(0),
      )
      .optional()?;
    let license_id = match existing {
      Some(license_id) => license_id,
      None => {
        conn.execute(
          "INSERT INTO licenses (name, url) VALUES (?1, ?2)",
          rusqlite::params![l.name, l.url],
        )?;
        conn.last_insert_rowid()
      }
    };
    conn.execute(
      "INSERT INTO article_licenses (article_id, position, license_id)
       VALUES (?1, ?2, ?3)",
      rusqlite::params![id, pos as i64, license_id],
    )?;
  }

  Ok(id)
}

fn insert_author(
  conn: &Connection,
  article_id: ArticleId,
  pos: usize,
  author: &Author,
) -> rusqlite::Result<()> {
  conn.execute(
    "INSERT INTO authors (article_id, position, first_name, last_name, full_name, email)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    rusqlite::params![
      article_id,
      pos as i64,
      author.first_name,
      author.last_name,
      author.full_name,
      author.email,
    ],
  )?;
  let author_id = conn.last_insert_rowid();

  for (ipos, i) in author.identifiers.iter().enumerate() {
    conn.execute(
      "INSERT INTO author_identifiers
         (author_id, position, identifier_type, identifier_value)
       VALUES (?1, ?2, ?3, ?4)",
      rusqlite::params![author_id, ipos as i64, i.identifier_type.as_str(), i.identifier_value],
    )?;
  }

  for (apos, af) in author.affiliations.iter().enumerate() {
    if let Some(country) = &af.country {
      conn.execute(
        "INSERT INTO countries (code, name) VALUES (?1, ?2)
         ON CONFLICT(code) DO NOTHING",
        rusqlite::params![country.code, country.name],
      )?;
    }
    conn.execute(
      "INSERT INTO affiliations
         (author_id, position, value, organization, country_code, country_name)
       VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
      rusqlite::params![
        author_id,
        apos as i64,
        af.value,
        af.organization,
        af.country.as_ref().map(|c| c.code.as_str()),
        af.country.as_ref().map(|c| c.name.as_str()),
      ],
    )?;
    let affiliation_id = conn.last_insert_rowid();

    for (ipos, i) in af.identifiers.iter().enumerate() {
      conn.execute(
        "INSERT INTO institution_identifiers
           (affiliation_id, position, identifier_type, identifier_value)
         VALUES (?1, ?2, ?3, ?4)",
        rusqlite::params![
          affiliation_id,
          ipos as i64,
          i.identifier_type.as_str(),
          i.identifier_value,
        ],
      )?;
    }
  }

  Ok(())
}

// ─── Reads ───────────────────────────────────────────────────────────────────

fn identifier_pairs(
  conn: &Connection,
  sql: &str,
  owner_id: i64,
) -> rusqlite::Result<Vec<(String, String)>> {
  let mut stmt = conn.prepare(sql)?;
  let pairs = stmt
    .query_map([owner_id], |row| Ok((row.get(0)?, row.get(1)?)))?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(pairs)
}

/// Load every row of one aggregate. Returns `None` if the article is absent.
fn load_article(conn: &Connection, id: ArticleId) -> rusqlite::Result<Option<RawArticle>> {
  let head = conn
    .query_row(
      "SELECT id, title, subtitle, abstract, publication_date, created_at, updated_at
       FROM articles WHERE id = ?1",
      [id],
      |row| {
        Ok(RawArticle {
          id:               row.get(0)?,
          title:            row.get(1)?,
          subtitle:         row.get(2)?,
          abstract_text:    row.get(3)?,
          publication_date: row.get(4)?,
          created_at:       row.get(5)?,
          updated_at:       row.get(6)?,
          files:            Vec::new(),
          identifiers:      Vec::new(),
          categories:       Vec::new(),
          authors:          Vec::new(),
          publication_info: Vec::new(),
          copyright:        Vec::new(),
          licenses:         Vec::new(),
        })
      },
    )
    .optional()?;

  let Some(mut raw) = head else {
    return Ok(None);
  };

  raw.files = conn
    .prepare(
      "SELECT file, size, filetype FROM article_files
       WHERE article_id = ?1 ORDER BY position",
    )?
    .query_map([id], |row| {
      let size: Option<i64> = row.get(1)?;
      Ok(ArticleFile {
        file:     row.get(0)?,
        size:     size.and_then(|s| u64::try_from(s).ok()),
        filetype: row.get(2)?,
      })
    })?
    .collect::<rusqlite::Result<_>>()?;

  raw.identifiers = identifier_pairs(
    conn,
    "SELECT identifier_type, identifier_value FROM article_identifiers
     WHERE article_id = ?1 ORDER BY position",
    id,
  )?;

  raw.categories = conn
    .prepare(
      "SELECT category, is_primary FROM arxiv_categories
       WHERE article_id = ?1 ORDER BY position",
    )?
    .query_map([id], |row| {
      Ok(ArxivCategory { category: row.get(0)?, primary: row.get(1)? })
    })?
    .collect::<rusqlite::Result<_>>()?;

  let author_rows: Vec<(i64, RawAuthor)> = conn
    .prepare(
      "SELECT id, first_name, last_name, full_name, email FROM authors
       WHERE article_id = ?1 ORDER BY position",
    )?
    .query_map([id], |row| {
      Ok((row.get(0)?, RawAuthor {
        first_name:   row.get(1)?,
        last_name:    row.get(2)?,
        full_name:    row.get(3)?,
        email:        row.get(4)?,
        identifiers:  Vec::new(),
        affiliations: Vec::new(),
      }))
    })?
    .collect::<rusqlite::Result<_>>()?;

  for (author_id, mut author) in author_rows {
    author.identifiers = identifier_pairs(
      conn,
      "SELECT identifier_type, identifier_value FROM author_identifiers
       WHERE author_id = ?1 ORDER BY position",
      author_id,
    )?;

    let affiliation_rows: Vec<(i64, RawAffiliation)> = conn
      .prepare(
        "SELECT id, value, organization, country_code, country_name
         FROM affiliations
         WHERE author_id = ?1 ORDER BY position",
      )?
      .query_map([author_id], |row| {
        Ok((row.get(0)?, RawAffiliation {
          value:        row.get(1)?,
          organization: row.get(2)?,
          country_code: row.get(3)?,
          country_name: row.get(4)?,
          identifiers:  Vec::new(),
        }))
      })?
      .collect::<rusqlite::Result<_>>()?;

    for (affiliation_id, mut affiliation) in affiliation_rows {
      affiliation.identifiers = identifier_pairs(
        conn,
        "SELECT identifier_type, identifier_value FROM institution_identifiers
         WHERE affiliation_id = ?1 ORDER BY position",
        affiliation_id,
      )?;
      author.affiliations.push(affiliation);
    }

    raw.authors.push(author);
  }

  raw.publication_info = conn
    .prepare(
      "SELECT p.name, pi.journal_title, pi.journal_volume, pi.journal_issue,
              pi.journal_issue_date, pi.volume_year, pi.page_start, pi.page_end,
              pi.artid
       FROM publication_info pi
       JOIN publishers p ON p.id = pi.publisher_id
       WHERE pi.article_id = ?1 ORDER BY pi.position",
    )?
    .query_map([id], |row| {
      Ok(RawPublicationInfo {
        publisher:          row.get(0)?,
        journal_title:      row.get(1)?,
        journal_volume:     row.get(2)?,
        journal_issue:      row.get(3)?,
        journal_issue_date: row.get(4)?,
        volume_year:        row.get(5)?,
        page_start:         row.get(6)?,
        page_end:           row.get(7)?,
        artid:              row.get(8)?,
      })
    })?
    .collect::<rusqlite::Result<_>>()?;

  raw.copyright = conn
    .prepare(
      "SELECT statement, holder, year FROM copyrights
       WHERE article_id = ?1 ORDER BY position",
    )?
    .query_map([id], |row| {
      Ok(Copyright { statement: row.get(0)?, holder: row.get(1)?, year: row.get(2)? })
    })?
    .collect::<rusqlite::Result<_>>()?;

  raw.licenses = conn
    .prepare(
      "SELECT l.name, l.url FROM article_licenses al
       JOIN licenses l ON l.id = al.license_id
       WHERE al.article_id = ?1 ORDER BY al.position",
    )?
    .query_map([id], |row| Ok(License { name: row.get(0)?, url: row.get(1)? }))?
    .collect::<rusqlite::Result<_>>()?;

  Ok(Some(raw))
}

/// Load an aggregate that was just written in the same transaction.
fn load_stored(conn: &Connection, id: ArticleId) -> rusqlite::Result<RawArticle> {
  load_article(conn, id)?.ok_or(rusqlite::Error::QueryReturnedNoRows)
}

// ─── ArticleSource impl ──────────────────────────────────────────────────────

impl ArticleSource for SqliteStore {
  type Error = Error;

  async fn get_article(&self, id: ArticleId) -> Result<Option<Article>> {
    let raw = self
      .conn
      .call(move |conn| Ok(load_article(conn, id)?))
      .await?;

    raw.map(RawArticle::into_article).transpose()
  }

  async fn list_article_ids(&self) -> Result<Vec<ArticleId>> {
    let ids = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare("SELECT id FROM articles ORDER BY id")?;
        let ids = stmt
          .query_map([], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<ArticleId>>>()?;
        Ok(ids)
      })
      .await?;
    Ok(ids)
  }
}
