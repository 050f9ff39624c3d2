use scoap_core::Article;

use crate::record::LegacyTitle;

/// `titles`: the article title once per publication-info row, sourced from
/// that row's publisher.
pub fn titles(article: &Article) -> Vec<LegacyTitle> {
  article
    .publication_info
    .iter()
    .map(|p| LegacyTitle { source: p.publisher.clone(), title: article.title.clone() })
    .collect()
}
