//! The article aggregate: an article plus every related entity the record
//! projectors read.
//!
//! An [`Article`] is a read-only snapshot. Both storage backends build one
//! (the relational store by joining its tables, the search index by
//! converting its flattened document), so consumers never learn which
//! backend produced it.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::identifier::{
  ArticleIdentifierType, AuthorIdentifierType, InstitutionIdentifierType,
};

/// The external "control number" of an article.
pub type ArticleId = i64;

// ─── Files ───────────────────────────────────────────────────────────────────

/// A full-text file attached to an article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleFile {
  /// Storage key of the file, e.g. `files/2024/article.pdf`.
  pub file:     String,
  pub size:     Option<u64>,
  pub filetype: Option<String>,
}

// ─── Identifiers & categories ────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleIdentifier {
  pub identifier_type:  ArticleIdentifierType,
  pub identifier_value: String,
}

/// An arXiv subject category. At most one per article should be `primary`;
/// if more are, the first one wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArxivCategory {
  pub category: String,
  pub primary:  bool,
}

// ─── Authors ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorIdentifier {
  pub identifier_type:  AuthorIdentifierType,
  pub identifier_value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstitutionIdentifier {
  pub identifier_type:  InstitutionIdentifierType,
  pub identifier_value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
  /// ISO 3166-1 alpha-2 code.
  pub code: String,
  pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Affiliation {
  /// Free-text affiliation as printed in the article.
  pub value:        Option<String>,
  pub organization: Option<String>,
  pub country:      Option<Country>,
  pub identifiers:  Vec<InstitutionIdentifier>,
}

impl Affiliation {
  /// The first ROR identifier of this affiliation's institution, if any.
  pub fn ror(&self) -> Option<&str> {
    self
      .identifiers
      .iter()
      .find(|i| i.identifier_type == InstitutionIdentifierType::Ror)
      .map(|i| i.identifier_value.as_str())
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
  pub first_name:   Option<String>,
  pub last_name:    Option<String>,
  pub full_name:    Option<String>,
  pub email:        Option<String>,
  pub identifiers:  Vec<AuthorIdentifier>,
  pub affiliations: Vec<Affiliation>,
}

impl Author {
  /// The first ORCID of this author, if any.
  pub fn orcid(&self) -> Option<&str> {
    self
      .identifiers
      .iter()
      .find(|i| i.identifier_type == AuthorIdentifierType::Orcid)
      .map(|i| i.identifier_value.as_str())
  }
}

// ─── Publication ─────────────────────────────────────────────────────────────

/// Where and how an article was published. An article may have several.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicationInfo {
  /// Publisher name.
  pub publisher:          String,
  pub journal_title:      String,
  pub journal_volume:     Option<String>,
  pub journal_issue:      Option<String>,
  pub journal_issue_date: Option<NaiveDate>,
  pub volume_year:        Option<i32>,
  pub page_start:         Option<String>,
  /// Free text; usually a page number but may be e.g. `"N/A"`.
  pub page_end:           Option<String>,
  pub artid:              Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Copyright {
  pub statement: Option<String>,
  pub holder:    Option<String>,
  pub year:      Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct License {
  pub name: String,
  pub url:  Option<String>,
}

// ─── Article ─────────────────────────────────────────────────────────────────

/// An article and all of its related entities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
  pub id:                     ArticleId,
  pub title:                  Option<String>,
  pub subtitle:               Option<String>,
  #[serde(rename = "abstract")]
  pub abstract_text:          Option<String>,
  pub publication_date:       Option<NaiveDate>,
  /// Store-assigned; never changes after creation.
  pub created_at:             DateTime<Utc>,
  pub updated_at:             DateTime<Utc>,
  pub related_files:          Vec<ArticleFile>,
  pub article_identifiers:    Vec<ArticleIdentifier>,
  pub article_arxiv_category: Vec<ArxivCategory>,
  pub authors:                Vec<Author>,
  pub publication_info:       Vec<PublicationInfo>,
  pub copyright:              Vec<Copyright>,
  pub related_licenses:       Vec<License>,
}

impl Article {
  /// An article with no related entities, created and updated at `created_at`.
  pub fn new(id: ArticleId, created_at: DateTime<Utc>) -> Self {
    Self {
      id,
      title: None,
      subtitle: None,
      abstract_text: None,
      publication_date: None,
      created_at,
      updated_at: created_at,
      related_files: Vec::new(),
      article_identifiers: Vec::new(),
      article_arxiv_category: Vec::new(),
      authors: Vec::new(),
      publication_info: Vec::new(),
      copyright: Vec::new(),
      related_licenses: Vec::new(),
    }
  }

  /// The publication date, falling back to the creation date.
  pub fn effective_publication_date(&self) -> NaiveDate {
    self
      .publication_date
      .unwrap_or_else(|| self.created_at.date_naive())
  }

  /// The year substituted for a missing `volume_year`.
  pub fn creation_year(&self) -> i32 { self.created_at.year() }

  /// The first identifier of the given type.
  pub fn identifier(&self, kind: &ArticleIdentifierType) -> Option<&str> {
    self
      .article_identifiers
      .iter()
      .find(|i| &i.identifier_type == kind)
      .map(|i| i.identifier_value.as_str())
  }

  pub fn doi(&self) -> Option<&str> {
    self.identifier(&ArticleIdentifierType::Doi)
  }

  pub fn arxiv_id(&self) -> Option<&str> {
    self.identifier(&ArticleIdentifierType::Arxiv)
  }

  /// The first category flagged as primary.
  pub fn primary_category(&self) -> Option<&str> {
    self
      .article_arxiv_category
      .iter()
      .find(|c| c.primary)
      .map(|c| c.category.as_str())
  }

  /// Journal title of the first publication-info row.
  pub fn journal(&self) -> Option<&str> {
    self.publication_info.first().map(|p| p.journal_title.as_str())
  }
}
