use scoap_core::ArticleId;

/// Errors from loading an article before projecting it. Projection itself
/// cannot fail.
#[derive(Debug, thiserror::Error)]
pub enum Error {
  #[error("article {0} not found")]
  NotFound(ArticleId),

  /// The backend could not be reached or returned a broken aggregate.
  #[error("failed to fetch article from upstream: {0}")]
  Upstream(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub fn upstream(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Upstream(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
