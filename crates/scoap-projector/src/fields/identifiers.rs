use scoap_core::Article;

use crate::record::{LegacyDoi, LegacyEprint};

// Both fields take every identifier regardless of its type.

/// `arxiv_eprints`: a single entry holding every category code and every
/// identifier value, each as a sorted set.
pub fn arxiv_eprints(article: &Article) -> Vec<LegacyEprint> {
  vec![LegacyEprint {
    categories: article
      .article_arxiv_category
      .iter()
      .map(|c| c.category.clone())
      .collect(),
    value:      article
      .article_identifiers
      .iter()
      .map(|i| i.identifier_value.clone())
      .collect(),
  }]
}

/// `dois`: one entry per identifier row.
pub fn dois(article: &Article) -> Vec<LegacyDoi> {
  article
    .article_identifiers
    .iter()
    .map(|i| LegacyDoi { value: i.identifier_value.clone() })
    .collect()
}
