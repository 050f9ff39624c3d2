//! The denormalized search-index document for an article.
//!
//! The index stores related entities as plain embedded mappings rather than
//! relations: publishers collapse to their name, identifier types are plain
//! strings, and every field tolerates being absent. The two conversions in
//! this module are the only code that knows this layout; everything else
//! works on [`Article`].

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  Result,
  article::{
    Affiliation, Article, ArticleFile, ArticleId, ArticleIdentifier,
    ArxivCategory, Author, AuthorIdentifier, Copyright, Country,
    InstitutionIdentifier, License, PublicationInfo,
  },
};

// ─── Embedded entries ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileEntry {
  pub file:     String,
  pub size:     Option<u64>,
  pub filetype: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentifierEntry {
  pub identifier_type:  String,
  pub identifier_value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryEntry {
  pub category: String,
  pub primary:  bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CountryEntry {
  pub code: String,
  pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AffiliationEntry {
  pub value:                   Option<String>,
  pub organization:            Option<String>,
  pub country:                 Option<CountryEntry>,
  pub institution_identifiers: Vec<IdentifierEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthorEntry {
  pub first_name:   Option<String>,
  pub last_name:    Option<String>,
  pub full_name:    Option<String>,
  pub email:        Option<String>,
  pub identifiers:  Vec<IdentifierEntry>,
  pub affiliations: Vec<AffiliationEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PublicationInfoEntry {
  pub publisher:          String,
  pub journal_title:      String,
  pub journal_volume:     Option<String>,
  pub journal_issue:      Option<String>,
  pub journal_issue_date: Option<NaiveDate>,
  pub volume_year:        Option<i32>,
  pub page_start:         Option<String>,
  pub page_end:           Option<String>,
  pub artid:              Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CopyrightEntry {
  pub statement: Option<String>,
  pub holder:    Option<String>,
  pub year:      Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LicenseEntry {
  pub name: String,
  pub url:  Option<String>,
}

// ─── Document ────────────────────────────────────────────────────────────────

/// One article as stored in the search index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleDocument {
  pub id:                     ArticleId,
  #[serde(default)]
  pub title:                  Option<String>,
  #[serde(default)]
  pub subtitle:               Option<String>,
  #[serde(default, rename = "abstract")]
  pub abstract_text:          Option<String>,
  #[serde(default)]
  pub publication_date:       Option<NaiveDate>,
  #[serde(rename = "_created_at")]
  pub created_at:             DateTime<Utc>,
  #[serde(rename = "_updated_at")]
  pub updated_at:             DateTime<Utc>,
  #[serde(default)]
  pub related_files:          Vec<FileEntry>,
  #[serde(default)]
  pub article_identifiers:    Vec<IdentifierEntry>,
  #[serde(default)]
  pub article_arxiv_category: Vec<CategoryEntry>,
  #[serde(default)]
  pub authors:                Vec<AuthorEntry>,
  #[serde(default)]
  pub publication_info:       Vec<PublicationInfoEntry>,
  #[serde(default)]
  pub copyright:              Vec<CopyrightEntry>,
  #[serde(default)]
  pub related_licenses:       Vec<LicenseEntry>,
}

impl ArticleDocument {
  pub fn from_json(s: &str) -> Result<Self> { Ok(serde_json::from_str(s)?) }

  pub fn to_json(&self) -> Result<String> { Ok(serde_json::to_string(self)?) }
}

// ─── Article → document (indexing) ───────────────────────────────────────────

impl From<&Article> for ArticleDocument {
  fn from(a: &Article) -> Self {
    Self {
      id:                     a.id,
      title:                  a.title.clone(),
      subtitle:               a.subtitle.clone(),
      abstract_text:          a.abstract_text.clone(),
      publication_date:       a.publication_date,
      created_at:             a.created_at,
      updated_at:             a.updated_at,
      related_files:          a
        .related_files
        .iter()
        .map(|f| FileEntry {
          file:     f.file.clone(),
          size:     f.size,
          filetype: f.filetype.clone(),
        })
        .collect(),
      article_identifiers:    a
        .article_identifiers
        .iter()
        .map(|i| IdentifierEntry {
          identifier_type:  i.identifier_type.to_string(),
          identifier_value: i.identifier_value.clone(),
        })
        .collect(),
      article_arxiv_category: a
        .article_arxiv_category
        .iter()
        .map(|c| CategoryEntry { category: c.category.clone(), primary: c.primary })
        .collect(),
      authors:                a.authors.iter().map(author_entry).collect(),
      publication_info:       a
        .publication_info
        .iter()
        .map(|p| PublicationInfoEntry {
          publisher:          p.publisher.clone(),
          journal_title:      p.journal_title.clone(),
          journal_volume:     p.journal_volume.clone(),
          journal_issue:      p.journal_issue.clone(),
          journal_issue_date: p.journal_issue_date,
          volume_year:        p.volume_year,
          page_start:         p.page_start.clone(),
          page_end:           p.page_end.clone(),
          artid:              p.artid.clone(),
        })
        .collect(),
      copyright:              a
        .copyright
        .iter()
        .map(|c| CopyrightEntry {
          statement: c.statement.clone(),
          holder:    c.holder.clone(),
          year:      c.year,
        })
        .collect(),
      related_licenses:       a
        .related_licenses
        .iter()
        .map(|l| LicenseEntry { name: l.name.clone(), url: l.url.clone() })
        .collect(),
    }
  }
}

fn author_entry(a: &Author) -> AuthorEntry {
  AuthorEntry {
    first_name:   a.first_name.clone(),
    last_name:    a.last_name.clone(),
    full_name:    a.full_name.clone(),
    email:        a.email.clone(),
    identifiers:  a
      .identifiers
      .iter()
      .map(|i| IdentifierEntry {
        identifier_type:  i.identifier_type.to_string(),
        identifier_value: i.identifier_value.clone(),
      })
      .collect(),
    affiliations: a
      .affiliations
      .iter()
      .map(|af| AffiliationEntry {
        value:                   af.value.clone(),
        organization:            af.organization.clone(),
        country:                 af.country.as_ref().map(|c| CountryEntry {
          code: c.code.clone(),
          name: c.name.clone(),
        }),
        institution_identifiers: af
          .identifiers
          .iter()
          .map(|i| IdentifierEntry {
            identifier_type:  i.identifier_type.to_string(),
            identifier_value: i.identifier_value.clone(),
          })
          .collect(),
      })
      .collect(),
  }
}

// ─── Document → Article (search path) ────────────────────────────────────────

impl From<ArticleDocument> for Article {
  fn from(d: ArticleDocument) -> Self {
    Self {
      id:                     d.id,
      title:                  d.title,
      subtitle:               d.subtitle,
      abstract_text:          d.abstract_text,
      publication_date:       d.publication_date,
      created_at:             d.created_at,
      updated_at:             d.updated_at,
      related_files:          d
        .related_files
        .into_iter()
        .map(|f| ArticleFile { file: f.file, size: f.size, filetype: f.filetype })
        .collect(),
      article_identifiers:    d
        .article_identifiers
        .into_iter()
        .map(|i| ArticleIdentifier {
          identifier_type:  i.identifier_type.into(),
          identifier_value: i.identifier_value,
        })
        .collect(),
      article_arxiv_category: d
        .article_arxiv_category
        .into_iter()
        .map(|c| ArxivCategory { category: c.category, primary: c.primary })
        .collect(),
      authors:                d.authors.into_iter().map(author_from_entry).collect(),
      publication_info:       d
        .publication_info
        .into_iter()
        .map(|p| PublicationInfo {
          publisher:          p.publisher,
          journal_title:      p.journal_title,
          journal_volume:     p.journal_volume,
          journal_issue:      p.journal_issue,
          journal_issue_date: p.journal_issue_date,
          volume_year:        p.volume_year,
          page_start:         p.page_start,
          page_end:           p.page_end,
          artid:              p.artid,
        })
        .collect(),
      copyright:              d
        .copyright
        .into_iter()
        .map(|c| Copyright { statement: c.statement, holder: c.holder, year: c.year })
        .collect(),
      related_licenses:       d
        .related_licenses
        .into_iter()
        .map(|l| License { name: l.name, url: l.url })
        .collect(),
    }
  }
}

fn author_from_entry(e: AuthorEntry) -> Author {
  Author {
    first_name:   e.first_name,
    last_name:    e.last_name,
    full_name:    e.full_name,
    email:        e.email,
    identifiers:  e
      .identifiers
      .into_iter()
      .map(|i| AuthorIdentifier {
        identifier_type:  i.identifier_type.into(),
        identifier_value: i.identifier_value,
      })
      .collect(),
    affiliations: e
      .affiliations
      .into_iter()
      .map(|af| Affiliation {
        value:        af.value,
        organization: af.organization,
        country:      af.country.map(|c| Country { code: c.code, name: c.name }),
        identifiers:  af
          .institution_identifiers
          .into_iter()
          .map(|i| InstitutionIdentifier {
            identifier_type:  i.identifier_type.into(),
            identifier_value: i.identifier_value,
          })
          .collect(),
      })
      .collect(),
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;
  use crate::identifier::{
    ArticleIdentifierType, AuthorIdentifierType, InstitutionIdentifierType,
  };

  fn sample() -> Article {
    let mut a = Article::new(42, Utc.with_ymd_and_hms(2024, 3, 2, 8, 0, 0).unwrap());
    a.title = Some("Dark sector searches".into());
    a.abstract_text = Some("We search.".into());
    a.related_files = vec![ArticleFile {
      file:     "files/42/article.pdf".into(),
      size:     Some(1024),
      filetype: Some("pdf".into()),
    }];
    a.article_identifiers = vec![ArticleIdentifier {
      identifier_type:  ArticleIdentifierType::Doi,
      identifier_value: "10.1000/xyz".into(),
    }];
    a.authors = vec![Author {
      full_name: Some("Doe, Jane".into()),
      identifiers: vec![AuthorIdentifier {
        identifier_type:  AuthorIdentifierType::Orcid,
        identifier_value: "0000-0001-2345-6789".into(),
      }],
      affiliations: vec![Affiliation {
        value:        Some("CERN, Geneva".into()),
        organization: Some("CERN".into()),
        country:      Some(Country { code: "CH".into(), name: "Switzerland".into() }),
        identifiers:  vec![InstitutionIdentifier {
          identifier_type:  InstitutionIdentifierType::Ror,
          identifier_value: "https://ror.org/01ggx4157".into(),
        }],
      }],
      ..Author::default()
    }];
    a.publication_info = vec![PublicationInfo {
      publisher: "APS".into(),
      journal_title: "Physical Review D".into(),
      page_end: Some("12".into()),
      ..PublicationInfo::default()
    }];
    a
  }

  #[test]
  fn document_conversion_preserves_the_aggregate() {
    let article = sample();
    let doc = ArticleDocument::from(&article);
    let json = doc.to_json().unwrap();
    let back = Article::from(ArticleDocument::from_json(&json).unwrap());
    assert_eq!(back, article);
  }

  #[test]
  fn document_uses_index_field_names() {
    let json: serde_json::Value =
      serde_json::to_value(ArticleDocument::from(&sample())).unwrap();
    assert!(json.get("_created_at").is_some());
    assert!(json.get("abstract").is_some());
    assert_eq!(json["publication_info"][0]["publisher"], "APS");
    assert_eq!(json["article_identifiers"][0]["identifier_type"], "DOI");
    assert_eq!(
      json["authors"][0]["affiliations"][0]["country"]["name"],
      "Switzerland"
    );
  }

  #[test]
  fn sparse_document_deserializes_with_defaults() {
    let json = r#"{
      "id": 5,
      "_created_at": "2024-01-01T00:00:00Z",
      "_updated_at": "2024-01-02T00:00:00Z",
      "publication_info": [{"journal_title": "JHEP"}],
      "authors": [{"full_name": "Roe, R."}]
    }"#;
    let article = Article::from(ArticleDocument::from_json(json).unwrap());
    assert_eq!(article.id, 5);
    assert!(article.related_files.is_empty());
    assert_eq!(article.publication_info[0].publisher, "");
    assert_eq!(article.authors[0].affiliations.len(), 0);
  }
}
