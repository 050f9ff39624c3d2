//! JSON/CSV HTTP API for SCOAP articles.
//!
//! Exposes an axum [`Router`] over any relational [`ArticleSource`], any
//! search-document [`ArticleSource`] and any [`FileStorage`]. Transport and
//! tracing layers are the caller's responsibility.
//!
//! | Method | Path | Body |
//! |--------|------|------|
//! | `GET`  | `/articles` | article summaries |
//! | `GET`  | `/articles/{id}` | full article view |
//! | `GET`  | `/articles/{id}/legacy` | legacy record, relational path |
//! | `GET`  | `/search/{id}/legacy` | legacy record, search-document path |
//! | `GET`  | `/articles/{id}/compliance` | compliance scan report |
//! | `GET`  | `/export/articles.csv` | summary CSV |

pub mod articles;
pub mod compliance;
pub mod error;
pub mod export;
pub mod search;

use std::{path::PathBuf, sync::Arc};

use axum::{Router, routing::get};
use scoap_core::source::{ArticleSource, FileStorage};
use scoap_scan::{ComplianceScanner, DEFAULT_PHRASE};
use serde::Deserialize;

pub use error::ApiError;

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `SCOAP_*` environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:       String,
  #[serde(default = "default_port")]
  pub port:       u16,
  /// Relational store database file.
  pub store_path: PathBuf,
  /// Search-document index database file.
  pub index_path: PathBuf,
  /// Directory that attachment keys are resolved against.
  pub files_root: PathBuf,
  /// Phrase the compliance scan looks for.
  #[serde(default = "default_phrase")]
  pub phrase:     String,
}

fn default_host() -> String { "127.0.0.1".to_owned() }

fn default_port() -> u16 { 8080 }

fn default_phrase() -> String { DEFAULT_PHRASE.to_owned() }

// ─── Application state ───────────────────────────────────────────────────────

/// Shared state threaded through all handlers.
pub struct AppState<R, I, F> {
  /// Relational path.
  pub store:   Arc<R>,
  /// Search-document path.
  pub index:   Arc<I>,
  pub scanner: Arc<ComplianceScanner<F>>,
}

impl<R, I, F> Clone for AppState<R, I, F> {
  fn clone(&self) -> Self {
    Self {
      store:   Arc::clone(&self.store),
      index:   Arc::clone(&self.index),
      scanner: Arc::clone(&self.scanner),
    }
  }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build the API router for `state`.
pub fn router<R, I, F>(state: AppState<R, I, F>) -> Router<()>
where
  R: ArticleSource + 'static,
  I: ArticleSource + 'static,
  F: FileStorage + 'static,
{
  Router::new()
    // Articles
    .route("/articles", get(articles::list::<R, I, F>))
    .route("/articles/{id}", get(articles::get_one::<R, I, F>))
    .route("/articles/{id}/legacy", get(articles::legacy::<R, I, F>))
    .route("/articles/{id}/compliance", get(compliance::handler::<R, I, F>))
    // Search path
    .route("/search/{id}/legacy", get(search::legacy::<R, I, F>))
    // Export
    .route("/export/articles.csv", get(export::articles_csv::<R, I, F>))
    .with_state(state)
}
