//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, calendar dates as
//! `YYYY-MM-DD`, identifier types as their wire strings.

use chrono::{DateTime, NaiveDate, Utc};
use scoap_core::article::{
  Affiliation, Article, ArticleFile, ArticleIdentifier, ArxivCategory, Author,
  AuthorIdentifier, Copyright, Country, InstitutionIdentifier, License,
  PublicationInfo,
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── NaiveDate ───────────────────────────────────────────────────────────────

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn encode_date(d: NaiveDate) -> String { d.format(DATE_FORMAT).to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT)
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

fn decode_opt_date(s: Option<String>) -> Result<Option<NaiveDate>> {
  s.as_deref().map(decode_date).transpose()
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read from an `affiliations` row plus its country join and
/// institution identifiers.
pub struct RawAffiliation {
  pub value:        Option<String>,
  pub organization: Option<String>,
  pub country_code: Option<String>,
  pub country_name: Option<String>,
  /// `(identifier_type, identifier_value)`
  pub identifiers:  Vec<(String, String)>,
}

impl RawAffiliation {
  fn into_affiliation(self) -> Affiliation {
    let country = match (self.country_code, self.country_name) {
      (Some(code), Some(name)) => Some(Country { code, name }),
      _ => None,
    };
    Affiliation {
      value: self.value,
      organization: self.organization,
      country,
      identifiers: self
        .identifiers
        .into_iter()
        .map(|(t, v)| InstitutionIdentifier {
          identifier_type:  t.into(),
          identifier_value: v,
        })
        .collect(),
    }
  }
}

/// Raw values read from an `authors` row and its children.
pub struct RawAuthor {
  pub first_name:   Option<String>,
  pub last_name:    Option<String>,
  pub full_name:    Option<String>,
  pub email:        Option<String>,
  pub identifiers:  Vec<(String, String)>,
  pub affiliations: Vec<RawAffiliation>,
}

impl RawAuthor {
  fn into_author(self) -> Author {
    Author {
      first_name:   self.first_name,
      last_name:    self.last_name,
      full_name:    self.full_name,
      email:        self.email,
      identifiers:  self
        .identifiers
        .into_iter()
        .map(|(t, v)| AuthorIdentifier {
          identifier_type:  t.into(),
          identifier_value: v,
        })
        .collect(),
      affiliations: self
        .affiliations
        .into_iter()
        .map(RawAffiliation::into_affiliation)
        .collect(),
    }
  }
}

/// Raw values read from a `publication_info` row joined with `publishers`.
pub struct RawPublicationInfo {
  pub publisher:          String,
  pub journal_title:      String,
  pub journal_volume:     Option<String>,
  pub journal_issue:      Option<String>,
  pub journal_issue_date: Option<String>,
  pub volume_year:        Option<i32>,
  pub page_start:         Option<String>,
  pub page_end:           Option<String>,
  pub artid:              Option<String>,
}

impl RawPublicationInfo {
  fn into_publication_info(self) -> Result<PublicationInfo> {
    Ok(PublicationInfo {
      publisher:          self.publisher,
      journal_title:      self.journal_title,
      journal_volume:     self.journal_volume,
      journal_issue:      self.journal_issue,
      journal_issue_date: decode_opt_date(self.journal_issue_date)?,
      volume_year:        self.volume_year,
      page_start:         self.page_start,
      page_end:           self.page_end,
      artid:              self.artid,
    })
  }
}

/// Raw values for a whole aggregate, collected inside one connection call.
pub struct RawArticle {
  pub id:                  i64,
  pub title:               Option<String>,
  pub subtitle:            Option<String>,
  pub abstract_text:       Option<String>,
  pub publication_date:    Option<String>,
  pub created_at:          String,
  pub updated_at:          String,
  pub files:               Vec<ArticleFile>,
  pub identifiers:         Vec<(String, String)>,
  pub categories:          Vec<ArxivCategory>,
  pub authors:             Vec<RawAuthor>,
  pub publication_info:    Vec<RawPublicationInfo>,
  pub copyright:           Vec<Copyright>,
  pub licenses:            Vec<License>,
}

impl RawArticle {
  pub fn into_article(self) -> Result<Article> {
    Ok(Article {
      id:                     self.id,
      title:                  self.title,
      subtitle:               self.subtitle,
      abstract_text:          self.abstract_text,
      publication_date:       decode_opt_date(self.publication_date)?,
      created_at:             decode_dt(&self.created_at)?,
      updated_at:             decode_dt(&self.updated_at)?,
      related_files:          self.files,
      article_identifiers:    self
        .identifiers
        .into_iter()
        .map(|(t, v)| ArticleIdentifier {
          identifier_type:  t.into(),
          identifier_value: v,
        })
        .collect(),
      article_arxiv_category: self.categories,
      authors:                self
        .authors
        .into_iter()
        .map(RawAuthor::into_author)
        .collect(),
      publication_info:       self
        .publication_info
        .into_iter()
        .map(RawPublicationInfo::into_publication_info)
        .collect::<Result<_>>()?,
      copyright:              self.copyright,
      related_licenses:       self.licenses,
    })
  }
}
