use scoap_core::{ArticleId, source::ArticleSource};

use crate::{ArticleView, Error, LegacyRecord, Result, project, project_article_view};

/// Load `id` from `source` and project its legacy record.
pub async fn fetch_legacy_record<S: ArticleSource>(
  source: &S,
  id: ArticleId,
) -> Result<LegacyRecord> {
  let article = source
    .get_article(id)
    .await
    .map_err(Error::upstream)?
    .ok_or(Error::NotFound(id))?;
  tracing::debug!(article_id = id, "projecting legacy record");
  Ok(project(&article))
}

/// Load `id` from `source` and build its [`ArticleView`].
pub async fn fetch_article_view<S: ArticleSource>(
  source: &S,
  id: ArticleId,
) -> Result<ArticleView> {
  let article = source
    .get_article(id)
    .await
    .map_err(Error::upstream)?
    .ok_or(Error::NotFound(id))?;
  Ok(project_article_view(&article))
}
