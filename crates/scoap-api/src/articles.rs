//! Handlers for `/articles` endpoints backed by the relational store.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/articles` | summaries, ascending id |
//! | `GET`  | `/articles/{id}` | 404 if not found |
//! | `GET`  | `/articles/{id}/legacy` | 404 if not found |

use axum::{
  Json,
  extract::{Path, State},
};
use scoap_core::{
  ArticleId,
  source::{ArticleSource, FileStorage},
};
use scoap_export::ArticleSummary;
use scoap_projector::{ArticleView, LegacyRecord, fetch_article_view, fetch_legacy_record};

use crate::{AppState, error::ApiError};

/// Summaries of every article in the relational store.
pub(crate) async fn load_summaries<R: ArticleSource>(
  store: &R,
) -> Result<Vec<ArticleSummary>, ApiError> {
  let ids = store.list_article_ids().await.map_err(ApiError::store)?;
  let mut summaries = Vec::with_capacity(ids.len());
  for id in ids {
    if let Some(article) = store.get_article(id).await.map_err(ApiError::store)? {
      summaries.push(ArticleSummary::from(&article));
    }
  }
  Ok(summaries)
}

/// `GET /articles`
pub async fn list<R, I, F>(
  State(state): State<AppState<R, I, F>>,
) -> Result<Json<Vec<ArticleSummary>>, ApiError>
where
  R: ArticleSource,
  I: ArticleSource,
  F: FileStorage,
{
  Ok(Json(load_summaries(state.store.as_ref()).await?))
}

/// `GET /articles/{id}`
pub async fn get_one<R, I, F>(
  State(state): State<AppState<R, I, F>>,
  Path(id): Path<ArticleId>,
) -> Result<Json<ArticleView>, ApiError>
where
  R: ArticleSource,
  I: ArticleSource,
  F: FileStorage,
{
  Ok(Json(fetch_article_view(state.store.as_ref(), id).await?))
}

/// `GET /articles/{id}/legacy`
pub async fn legacy<R, I, F>(
  State(state): State<AppState<R, I, F>>,
  Path(id): Path<ArticleId>,
) -> Result<Json<LegacyRecord>, ApiError>
where
  R: ArticleSource,
  I: ArticleSource,
  F: FileStorage,
{
  Ok(Json(fetch_legacy_record(state.store.as_ref(), id).await?))
}
