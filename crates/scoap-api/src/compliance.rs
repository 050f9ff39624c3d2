use axum::{
  Json,
  extract::{Path, State},
};
use scoap_core::{
  ArticleId,
  source::{ArticleSource, FileStorage},
};
use scoap_scan::ScanReport;

use crate::{AppState, error::ApiError};

/// `GET /articles/{id}/compliance`
pub async fn handler<R, I, F>(
  State(state): State<AppState<R, I, F>>,
  Path(id): Path<ArticleId>,
) -> Result<Json<ScanReport>, ApiError>
where
  R: ArticleSource,
  I: ArticleSource,
  F: FileStorage,
{
  let article = state
    .store
    .get_article(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("article {id}")))?;
  Ok(Json(state.scanner.scan(&article).await))
}
