use scoap_core::Article;

use crate::record::LegacyCopyright;

/// `copyright`: one entry per copyright row.
pub fn copyright(article: &Article) -> Vec<LegacyCopyright> {
  article
    .copyright
    .iter()
    .map(|c| LegacyCopyright {
      statement: c.statement.clone(),
      holder:    c.holder.clone(),
      year:      c.year,
    })
    .collect()
}
