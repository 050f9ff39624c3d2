//! [`ArticleSummary`] — the one-line-per-article listing used by the
//! summary CSV and the `/articles` endpoint.

use chrono::NaiveDate;
use scoap_core::{Article, ArticleId};
use serde::{Deserialize, Serialize};

use crate::{CsvRow, CsvTable};

/// Format of the `_created_at` cell.
pub const CREATED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleSummary {
  pub id:                     ArticleId,
  pub title:                  Option<String>,
  pub doi:                    Option<String>,
  pub arxiv_id:               Option<String>,
  pub arxiv_primary_category: Option<String>,
  pub journal:                Option<String>,
  /// Falls back to the creation date.
  pub publication_date:       NaiveDate,
  #[serde(rename = "_created_at")]
  pub created_at:             String,
}

impl From<&Article> for ArticleSummary {
  fn from(a: &Article) -> Self {
    Self {
      id:                     a.id,
      title:                  a.title.clone(),
      doi:                    a.doi().map(str::to_owned),
      arxiv_id:               a.arxiv_id().map(str::to_owned),
      arxiv_primary_category: a.primary_category().map(str::to_owned),
      journal:                a.journal().map(str::to_owned),
      publication_date:       a.effective_publication_date(),
      created_at:             a.created_at.format(CREATED_AT_FORMAT).to_string(),
    }
  }
}

impl ArticleSummary {
  pub fn to_row(&self) -> CsvRow {
    let mut row = CsvRow::new();
    row.insert("id".into(), self.id.to_string());
    row.insert("title".into(), self.title.clone().unwrap_or_default());
    row.insert("doi".into(), self.doi.clone().unwrap_or_default());
    row.insert("arxiv_id".into(), self.arxiv_id.clone().unwrap_or_default());
    row.insert(
      "arxiv_primary_category".into(),
      self.arxiv_primary_category.clone().unwrap_or_default(),
    );
    row.insert("journal".into(), self.journal.clone().unwrap_or_default());
    row.insert("publication_date".into(), self.publication_date.to_string());
    row.insert("_created_at".into(), self.created_at.clone());
    row
  }
}

/// A CSV table of summaries keyed by `id`.
pub fn summary_table<'a>(summaries: impl IntoIterator<Item = &'a ArticleSummary>) -> CsvTable {
  let mut table = CsvTable::new("id");
  table.extend(summaries.into_iter().map(ArticleSummary::to_row));
  table
}
