use axum::{
  extract::State,
  http::header,
  response::IntoResponse,
};
use scoap_core::source::{ArticleSource, FileStorage};
use scoap_export::summary_table;

use crate::{AppState, articles::load_summaries, error::ApiError};

/// `GET /export/articles.csv`
pub async fn articles_csv<R, I, F>(
  State(state): State<AppState<R, I, F>>,
) -> Result<impl IntoResponse, ApiError>
where
  R: ArticleSource,
  I: ArticleSource,
  F: FileStorage,
{
  let summaries = load_summaries(state.store.as_ref()).await?;
  let csv = summary_table(&summaries).to_csv_string()?;
  Ok(([(header::CONTENT_TYPE, "text/csv; charset=utf-8")], csv))
}
