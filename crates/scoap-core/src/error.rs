//! Error types for `scoap-core`.

use thiserror::Error;

use crate::ArticleId;

#[derive(Debug, Error)]
pub enum Error {
  #[error("search document {found} does not match requested article {expected}")]
  DocumentMismatch { expected: ArticleId, found: ArticleId },

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
