//! The legacy record projector.
//!
//! [`project`] turns one [`Article`] aggregate into the [`LegacyRecord`]
//! consumed by external harvesters. It never fails: absent optional data
//! yields empty or fallback output. Each record field is derived by its own
//! mapper in [`fields`].
//!
//! [`project_article_view`] builds the full (non-legacy) article
//! representation, and [`fetch_legacy_record`] / [`fetch_article_view`]
//! load an aggregate through any [`scoap_core::source::ArticleSource`]
//! before projecting it.

pub mod error;
pub mod fields;
pub mod record;

mod fetch;
mod view;

use scoap_core::Article;

pub use error::{Error, Result};
pub use fetch::{fetch_article_view, fetch_legacy_record};
pub use record::{LegacyMetadata, LegacyRecord};
pub use view::{ArticleView, project_article_view};

/// Project `article` into its legacy record.
pub fn project(article: &Article) -> LegacyRecord {
  let metadata = LegacyMetadata {
    files:                fields::files(article),
    abstracts:            fields::abstracts(article),
    arxiv_eprints:        fields::arxiv_eprints(article),
    authors:              fields::authors(article),
    collections:          fields::collections(article),
    control_number:       article.id,
    copyright:            fields::copyright(article),
    dois:                 fields::dois(article),
    imprints:             fields::imprints(article),
    license:              fields::license(article),
    page_nr:              fields::page_nr(article),
    publication_info:     fields::publication_info(article),
    record_creation_date: article.created_at,
    titles:               fields::titles(article),
  };

  LegacyRecord {
    id: article.id,
    metadata,
    updated: article.updated_at,
    created: article.created_at,
  }
}

#[cfg(test)]
pub(crate) mod test_helpers {
  use chrono::{TimeZone, Utc};
  use scoap_core::Article;

  /// An article with no related entities, created 2024-01-01.
  pub(crate) fn bare_article() -> Article {
    Article::new(1, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
  }
}

#[cfg(test)]
mod tests;
