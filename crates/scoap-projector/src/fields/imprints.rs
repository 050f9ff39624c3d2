use scoap_core::Article;

use crate::record::LegacyImprint;

/// `imprints`: issue date and publisher of each publication-info row.
pub fn imprints(article: &Article) -> Vec<LegacyImprint> {
  article
    .publication_info
    .iter()
    .map(|p| LegacyImprint {
      date:      p.journal_issue_date,
      publisher: p.publisher.clone(),
    })
    .collect()
}
