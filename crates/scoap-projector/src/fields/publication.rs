use scoap_core::Article;

use crate::record::{LegacyCollection, LegacyPublicationInfo};

/// `publication_info`: one entry per row; a missing `volume_year` becomes
/// the article's creation year.
pub fn publication_info(article: &Article) -> Vec<LegacyPublicationInfo> {
  let fallback_year = article.creation_year();
  article
    .publication_info
    .iter()
    .map(|p| LegacyPublicationInfo {
      artid:          p.artid.clone(),
      journal_issue:  p.journal_issue.clone(),
      journal_title:  p.journal_title.clone(),
      journal_volume: p.journal_volume.clone(),
      page_end:       p.page_end.clone(),
      page_start:     p.page_start.clone(),
      year:           p.volume_year.unwrap_or(fallback_year),
    })
    .collect()
}

/// `collections`: each row's journal title as a primary collection.
pub fn collections(article: &Article) -> Vec<LegacyCollection> {
  article
    .publication_info
    .iter()
    .map(|p| LegacyCollection { primary: p.journal_title.clone() })
    .collect()
}
