//! Error type for `scoap-scan`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  /// The file storage could not produce the attachment.
  #[error("storage error: {0}")]
  Storage(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("pdf error: {0}")]
  Pdf(#[from] lopdf::Error),

  /// A non-PDF attachment whose bytes are not UTF-8 text.
  #[error("attachment is neither a PDF nor UTF-8 text")]
  NotText,

  /// A storage key that is absolute or climbs out of the storage root.
  #[error("invalid storage key: {0:?}")]
  InvalidKey(String),

  #[error("extraction task failed: {0}")]
  Join(#[from] tokio::task::JoinError),

  #[error("scan cancelled")]
  Cancelled,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
