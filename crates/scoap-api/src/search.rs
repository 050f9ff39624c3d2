//! Handlers for `/search` endpoints backed by the search-document index.

use axum::{
  Json,
  extract::{Path, State},
};
use scoap_core::{
  ArticleId,
  source::{ArticleSource, FileStorage},
};
use scoap_projector::{LegacyRecord, fetch_legacy_record};

use crate::{AppState, error::ApiError};

/// `GET /search/{id}/legacy`: the same record as `/articles/{id}/legacy`, built
/// from the indexed document.
pub async fn legacy<R, I, F>(
  State(state): State<AppState<R, I, F>>,
  Path(id): Path<ArticleId>,
) -> Result<Json<LegacyRecord>, ApiError>
where
  R: ArticleSource,
  I: ArticleSource,
  F: FileStorage,
{
  Ok(Json(fetch_legacy_record(state.index.as_ref(), id).await?))
}
