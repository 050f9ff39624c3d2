//! The legacy record, the bibliographic document consumed by external
//! harvesters.
//!
//! Field names and key order are a compatibility contract. Optional keys
//! (`key`, `filetype`, `ror`, `orcid`) are omitted when absent, never
//! serialized as `null`.

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};
use scoap_core::ArticleId;
use serde::{Deserialize, Serialize};

/// One projected article: `{"id", "metadata", "updated", "created"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyRecord {
  pub id:       ArticleId,
  pub metadata: LegacyMetadata,
  pub updated:  DateTime<Utc>,
  pub created:  DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyMetadata {
  #[serde(rename = "_files")]
  pub files:                Vec<LegacyFile>,
  pub abstracts:            Vec<LegacyAbstract>,
  pub arxiv_eprints:        Vec<LegacyEprint>,
  pub authors:              Vec<LegacyAuthor>,
  pub collections:          Vec<LegacyCollection>,
  pub control_number:       ArticleId,
  pub copyright:            Vec<LegacyCopyright>,
  pub dois:                 Vec<LegacyDoi>,
  pub imprints:             Vec<LegacyImprint>,
  pub license:              Vec<LegacyLicense>,
  pub page_nr:              Vec<u64>,
  pub publication_info:     Vec<LegacyPublicationInfo>,
  pub record_creation_date: DateTime<Utc>,
  pub titles:               Vec<LegacyTitle>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyFile {
  /// The raw stored file reference.
  pub file:     String,
  /// File name without its extension.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub key:      Option<String>,
  /// Extension without the leading dot; empty when the name has none.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub filetype: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyAbstract {
  pub source: String,
  pub value:  Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyEprint {
  pub categories: BTreeSet<String>,
  pub value:      BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyAffiliation {
  pub country:      Option<String>,
  pub organization: Option<String>,
  pub value:        Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub ror:          Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyAuthor {
  pub affiliations: Vec<LegacyAffiliation>,
  pub email:        Option<String>,
  pub full_name:    Option<String>,
  pub given_names:  Option<String>,
  pub surname:      Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub orcid:        Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyCollection {
  pub primary: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyCopyright {
  pub statement: Option<String>,
  pub holder:    Option<String>,
  pub year:      Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyDoi {
  pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyImprint {
  pub date:      Option<NaiveDate>,
  pub publisher: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyLicense {
  pub license: String,
  pub url:     Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyPublicationInfo {
  pub artid:          Option<String>,
  pub journal_issue:  Option<String>,
  pub journal_title:  String,
  pub journal_volume: Option<String>,
  pub page_end:       Option<String>,
  pub page_start:     Option<String>,
  /// `volume_year`, or the article's creation year when that is missing.
  pub year:           i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyTitle {
  pub source: String,
  pub title:  Option<String>,
}
