//! Error type for `scoap-store-sqlite`.

use scoap_core::ArticleId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] scoap_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("article not found: {0}")]
  ArticleNotFound(ArticleId),

  #[error("article {0} already exists")]
  DuplicateArticle(ArticleId),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
