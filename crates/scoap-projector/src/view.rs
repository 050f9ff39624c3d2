//! [`ArticleView`] — the full article representation served alongside the
//! legacy record.

use scoap_core::Article;
use serde::Serialize;

/// An article with its date fallbacks applied plus a few derived keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticleView {
  #[serde(flatten)]
  pub article:                Article,
  pub doi:                    Option<String>,
  pub arxiv_id:               Option<String>,
  pub arxiv_primary_category: Option<String>,
}

/// Build the view for `article`.
///
/// A missing `publication_date` becomes the creation date and a missing
/// `volume_year` becomes the creation year, the same fallbacks the legacy
/// record uses.
pub fn project_article_view(article: &Article) -> ArticleView {
  let mut out = article.clone();
  out.publication_date = Some(article.effective_publication_date());
  let year = article.creation_year();
  for info in &mut out.publication_info {
    info.volume_year = info.volume_year.or(Some(year));
  }

  ArticleView {
    doi:                    article.doi().map(str::to_owned),
    arxiv_id:               article.arxiv_id().map(str::to_owned),
    arxiv_primary_category: article.primary_category().map(str::to_owned),
    article:                out,
  }
}
