use scoap_core::Article;

use crate::record::LegacyAbstract;

/// `abstracts`: a single entry sourced from every publisher name, joined
/// without a separator.
pub fn abstracts(article: &Article) -> Vec<LegacyAbstract> {
  let source = article
    .publication_info
    .iter()
    .map(|p| p.publisher.as_str())
    .collect::<String>();
  vec![LegacyAbstract { source, value: article.abstract_text.clone() }]
}
