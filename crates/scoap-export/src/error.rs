//! Error type for `scoap-export`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("csv error: {0}")]
  Csv(#[from] csv::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  /// A batch task panicked or was aborted.
  #[error("batch task failed: {0}")]
  Task(#[from] tokio::task::JoinError),

  /// A field specification that is not `PATH=MODE`.
  #[error("invalid field specification: {0:?}")]
  InvalidFieldSpec(String),

  #[error("unknown analysis mode: {0:?} (expected y/n, nr or data)")]
  UnknownMode(String),

  #[error("DOI list has no 'doi' column")]
  MissingDoiColumn,

  /// Path resolution went deeper than the nesting limit.
  #[error("value nested too deeply at {0}")]
  TooDeep(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
