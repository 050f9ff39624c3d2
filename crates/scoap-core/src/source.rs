//! Backend traits: where article aggregates and their files come from.
//!
//! Implemented by storage backends (e.g. `scoap-store-sqlite` for both the
//! relational store and the search-document index). Higher layers depend on
//! these abstractions, never on a concrete backend.

use std::future::Future;

use bytes::Bytes;

use crate::article::{Article, ArticleId};

// ─── Articles ────────────────────────────────────────────────────────────────

/// A backend that can produce [`Article`] aggregates by id.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait ArticleSource: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Load the aggregate for `id`. Returns `None` if the backend does not
  /// know the article; an unreachable backend is an `Err`.
  fn get_article(
    &self,
    id: ArticleId,
  ) -> impl Future<Output = Result<Option<Article>, Self::Error>> + Send + '_;

  /// Every article id the backend knows, in ascending order.
  fn list_article_ids(
    &self,
  ) -> impl Future<Output = Result<Vec<ArticleId>, Self::Error>> + Send + '_;
}

// ─── Files ───────────────────────────────────────────────────────────────────

/// Storage for the full-text files referenced by [`crate::article::ArticleFile`].
pub trait FileStorage: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Read the whole file stored under `key`.
  fn read<'a>(
    &'a self,
    key: &'a str,
  ) -> impl Future<Output = Result<Bytes, Self::Error>> + Send + 'a;
}
