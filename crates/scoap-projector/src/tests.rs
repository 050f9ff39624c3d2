//! Whole-record tests: shape, determinism, fallbacks and backend
//! equivalence.

use chrono::{NaiveDate, TimeZone, Utc};
use scoap_core::{
  Article, ArticleId,
  article::{
    Affiliation, ArticleFile, ArticleIdentifier, ArxivCategory, Author,
    AuthorIdentifier, Copyright, Country, InstitutionIdentifier, License,
    PublicationInfo,
  },
  identifier::{ArticleIdentifierType, AuthorIdentifierType, InstitutionIdentifierType},
  source::ArticleSource,
};
use scoap_store_sqlite::{SqliteDocumentIndex, SqliteStore};

use crate::{Error, fetch_article_view, fetch_legacy_record, project, project_article_view};

fn full_article(id: ArticleId) -> Article {
  let mut a = Article::new(id, Utc.with_ymd_and_hms(2023, 5, 4, 10, 0, 0).unwrap());
  a.updated_at = Utc.with_ymd_and_hms(2023, 6, 1, 8, 0, 0).unwrap();
  a.title = Some("Observation of a new boson".into());
  a.abstract_text = Some("We report an excess.".into());
  a.publication_date = NaiveDate::from_ymd_opt(2023, 5, 30);
  a.related_files = vec![
    ArticleFile { file: "scoap3/2023/obs.pdf".into(), size: Some(1024), filetype: None },
    ArticleFile { file: "scoap3/2023/obs.xml".into(), size: None, filetype: None },
  ];
  a.article_identifiers = vec![
    ArticleIdentifier {
      identifier_type:  ArticleIdentifierType::Doi,
      identifier_value: "10.1103/PhysRevLett.131.001".into(),
    },
    ArticleIdentifier {
      identifier_type:  ArticleIdentifierType::Arxiv,
      identifier_value: "2305.00001".into(),
    },
  ];
  a.article_arxiv_category = vec![
    ArxivCategory { category: "hep-ex".into(), primary: true },
    ArxivCategory { category: "hep-ph".into(), primary: false },
  ];
  a.authors = vec![Author {
    first_name:   Some("Ada".into()),
    last_name:    Some("Byron".into()),
    full_name:    Some("Byron, Ada".into()),
    email:        None,
    identifiers:  vec![AuthorIdentifier {
      identifier_type:  AuthorIdentifierType::Orcid,
      identifier_value: "0000-0002-1825-0097".into(),
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
  }];
  a.publication_info = vec![PublicationInfo {
    publisher:          "APS".into(),
    journal_title:      "Physical Review Letters".into(),
    journal_volume:     Some("131".into()),
    journal_issue:      Some("1".into()),
    journal_issue_date: NaiveDate::from_ymd_opt(2023, 7, 1),
    volume_year:        None,
    page_start:         Some("1".into()),
    page_end:           Some("N/A".into()),
    artid:              Some("011801".into()),
  }];
  a.copyright = vec![Copyright {
    statement: Some("Published by the American Physical Society".into()),
    holder:    Some("The Authors".into()),
    year:      Some(2023),
  }];
  a.related_licenses = vec![License {
    name: "CC-BY-4.0".into(),
    url:  Some("https://creativecommons.org/licenses/by/4.0/".into()),
  }];
  a
}

// ─── Shape ───────────────────────────────────────────────────────────────────

#[test]
fn projection_is_deterministic() {
  let article = full_article(1);
  let a = serde_json::to_string(&project(&article)).unwrap();
  let b = serde_json::to_string(&project(&article)).unwrap();
  assert_eq!(a, b);
}

#[test]
fn record_keys_follow_the_legacy_layout() {
  let json = serde_json::to_string(&project(&full_article(42))).unwrap();
  assert!(json.starts_with(r#"{"id":42,"metadata":{"_files":"#), "{json}");

  let keys = [
    r#""_files":"#,
    r#""abstracts":"#,
    r#""arxiv_eprints":"#,
    r#""authors":"#,
    r#""collections":"#,
    r#""control_number":42"#,
    r#""copyright":"#,
    r#""dois":"#,
    r#""imprints":"#,
    r#""license":"#,
    r#""page_nr":"#,
    r#""publication_info":"#,
    r#""record_creation_date":"#,
    r#""titles":"#,
    r#""updated":"2023-06-01T08:00:00Z""#,
    r#""created":"2023-05-04T10:00:00Z""#,
  ];
  let positions: Vec<usize> = keys
    .iter()
    .map(|k| json.find(k).unwrap_or_else(|| panic!("missing {k} in {json}")))
    .collect();
  assert!(positions.windows(2).all(|w| w[0] < w[1]), "{json}");
}

#[test]
fn full_record_values() {
  let record = project(&full_article(42));
  let value = serde_json::to_value(&record).unwrap();
  let m = &value["metadata"];

  assert_eq!(m["_files"][0]["key"], "obs");
  assert_eq!(m["_files"][1]["filetype"], "xml");
  assert_eq!(m["abstracts"][0]["source"], "APS");
  assert_eq!(m["arxiv_eprints"][0]["categories"], serde_json::json!(["hep-ex", "hep-ph"]));
  assert_eq!(m["authors"][0]["orcid"], "0000-0002-1825-0097");
  assert_eq!(m["authors"][0]["affiliations"][0]["ror"], "https://ror.org/01ggx4157");
  assert_eq!(m["collections"][0]["primary"], "Physical Review Letters");
  assert_eq!(m["dois"].as_array().unwrap().len(), 2);
  assert_eq!(m["imprints"][0]["date"], "2023-07-01");
  assert_eq!(m["license"][0]["license"], "CC-BY-4.0");
  assert_eq!(m["page_nr"], serde_json::json!([]));
  assert_eq!(m["publication_info"][0]["year"], 2023);
  assert_eq!(m["record_creation_date"], "2023-05-04T10:00:00Z");
  assert_eq!(m["titles"][0]["title"], "Observation of a new boson");
}

#[test]
fn empty_article_projects_without_optional_keys() {
  let article = crate::test_helpers::bare_article();
  let json = serde_json::to_string(&project(&article).metadata).unwrap();
  assert_eq!(
    json,
    concat!(
      r#"{"_files":[],"abstracts":[{"source":"","value":null}],"#,
      r#""arxiv_eprints":[{"categories":[],"value":[]}],"authors":[],"#,
      r#""collections":[],"control_number":1,"copyright":[],"dois":[],"#,
      r#""imprints":[],"license":[],"page_nr":[],"publication_info":[],"#,
      r#""record_creation_date":"2024-01-01T00:00:00Z","titles":[]}"#
    )
  );
}

// ─── Fallbacks ───────────────────────────────────────────────────────────────

#[test]
fn missing_dates_fall_back_to_creation() {
  let mut article = Article::new(9, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
  article.publication_info = vec![PublicationInfo {
    publisher: "Springer".into(),
    journal_title: "EPJC".into(),
    ..PublicationInfo::default()
  }];

  let record = project(&article);
  assert_eq!(record.metadata.publication_info[0].year, 2024);
  assert_eq!(record.created, article.created_at);

  let view = project_article_view(&article);
  assert_eq!(view.article.publication_date, NaiveDate::from_ymd_opt(2024, 1, 1));
  assert_eq!(view.article.publication_info[0].volume_year, Some(2024));
}

#[test]
fn view_keeps_known_values_and_derives_keys() {
  let article = full_article(3);
  let view = project_article_view(&article);
  assert_eq!(view.article.publication_date, article.publication_date);
  assert_eq!(view.doi.as_deref(), Some("10.1103/PhysRevLett.131.001"));
  assert_eq!(view.arxiv_id.as_deref(), Some("2305.00001"));
  assert_eq!(view.arxiv_primary_category.as_deref(), Some("hep-ex"));

  let value = serde_json::to_value(&view).unwrap();
  assert_eq!(value["id"], 3);
  assert_eq!(value["abstract"], "We report an excess.");
  assert_eq!(value["arxiv_primary_category"], "hep-ex");
}

// ─── Backends ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn relational_and_search_paths_project_identically() {
  let store = SqliteStore::open_in_memory().await.unwrap();
  let index = SqliteDocumentIndex::open_in_memory().await.unwrap();

  let mut sparse = Article::new(2, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
  sparse.related_files = vec![ArticleFile { file: String::new(), size: None, filetype: None }];
  sparse.authors = vec![Author::default()];

  for article in [full_article(1), sparse] {
    store.import_article(article.clone()).await.unwrap();
    let loaded = store.get_article(article.id).await.unwrap().unwrap();
    index.index_article(&loaded).await.unwrap();

    let relational = fetch_legacy_record(&store, article.id).await.unwrap();
    let searched = fetch_legacy_record(&index, article.id).await.unwrap();
    assert_eq!(
      serde_json::to_string(&relational).unwrap(),
      serde_json::to_string(&searched).unwrap(),
    );
    assert_eq!(relational, project(&article));
  }
}

#[tokio::test]
async fn missing_article_is_not_found() {
  let store = SqliteStore::open_in_memory().await.unwrap();
  let err = fetch_legacy_record(&store, 77).await.unwrap_err();
  assert!(matches!(err, Error::NotFound(77)), "got {err:?}");

  let err = fetch_article_view(&store, 77).await.unwrap_err();
  assert!(matches!(err, Error::NotFound(77)));
}

struct Unreachable;

impl ArticleSource for Unreachable {
  type Error = std::io::Error;

  async fn get_article(&self, _id: ArticleId) -> Result<Option<Article>, Self::Error> {
    Err(std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "index down"))
  }

  async fn list_article_ids(&self) -> Result<Vec<ArticleId>, Self::Error> {
    Ok(Vec::new())
  }
}

#[tokio::test]
async fn upstream_failure_is_propagated() {
  let err = fetch_legacy_record(&Unreachable, 1).await.unwrap_err();
  assert!(matches!(err, Error::Upstream(_)), "got {err:?}");
  assert!(err.to_string().contains("index down"));
}
