use scoap_core::Article;

use crate::record::LegacyLicense;

/// `license`: one entry per license, name under the `license` key.
pub fn license(article: &Article) -> Vec<LegacyLicense> {
  article
    .related_licenses
    .iter()
    .map(|l| LegacyLicense { license: l.name.clone(), url: l.url.clone() })
    .collect()
}
