//! Batch and summary tests against in-memory stores.

use std::{collections::HashMap, sync::Arc};

use bytes::Bytes;
use chrono::{NaiveDate, TimeZone, Utc};
use scoap_core::{
  Article,
  article::{ArticleFile, ArticleIdentifier, ArxivCategory, PublicationInfo},
  identifier::ArticleIdentifierType,
  source::FileStorage,
};
use scoap_scan::ComplianceScanner;
use scoap_store_sqlite::SqliteStore;

use crate::{ArticleSummary, project_all, records_json, scan_all, summary_table, write_records_json};

fn article(id: i64) -> Article {
  let mut a = Article::new(id, Utc.with_ymd_and_hms(2024, 3, 5, 14, 7, 9).unwrap());
  a.title = Some(format!("Article {id}"));
  a.article_identifiers = vec![
    ArticleIdentifier {
      identifier_type:  ArticleIdentifierType::Arxiv,
      identifier_value: format!("2403.{id:05}"),
    },
    ArticleIdentifier {
      identifier_type:  ArticleIdentifierType::Doi,
      identifier_value: format!("10.1000/{id}"),
    },
  ];
  a.article_arxiv_category = vec![
    ArxivCategory { category: "hep-ph".into(), primary: false },
    ArxivCategory { category: "hep-th".into(), primary: true },
  ];
  a.publication_info = vec![PublicationInfo {
    publisher: "Elsevier".into(),
    journal_title: "Physics Letters B".into(),
    ..PublicationInfo::default()
  }];
  a
}

async fn seeded(ids: &[i64]) -> SqliteStore {
  let store = SqliteStore::open_in_memory().await.unwrap();
  for id in ids {
    store.import_article(article(*id)).await.unwrap();
  }
  store
}

// ─── Summaries ───────────────────────────────────────────────────────────────

#[test]
fn summary_picks_first_identifiers_and_formats_creation() {
  let summary = ArticleSummary::from(&article(4));
  assert_eq!(summary.doi.as_deref(), Some("10.1000/4"));
  assert_eq!(summary.arxiv_id.as_deref(), Some("2403.00004"));
  assert_eq!(summary.arxiv_primary_category.as_deref(), Some("hep-th"));
  assert_eq!(summary.journal.as_deref(), Some("Physics Letters B"));
  assert_eq!(summary.publication_date, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
  assert_eq!(summary.created_at, "2024-03-05 14:07:09");
}

#[test]
fn summary_csv_sorts_columns_after_id() {
  let summaries = [ArticleSummary::from(&article(2)), ArticleSummary::from(&Article::new(
    9,
    Utc.with_ymd_and_hms(2023, 12, 31, 23, 59, 59).unwrap(),
  ))];
  let csv = summary_table(&summaries).to_csv_string().unwrap();
  let mut lines = csv.lines();
  assert_eq!(
    lines.next(),
    Some("id,_created_at,arxiv_id,arxiv_primary_category,doi,journal,publication_date,title")
  );
  assert_eq!(
    lines.next(),
    Some("2,2024-03-05 14:07:09,2403.00002,hep-th,10.1000/2,Physics Letters B,2024-03-05,Article 2")
  );
  assert_eq!(lines.next(), Some("9,2023-12-31 23:59:59,,,,,2023-12-31,"));
}

#[test]
fn summary_json_uses_underscored_creation_key() {
  let value = serde_json::to_value(ArticleSummary::from(&article(1))).unwrap();
  assert_eq!(value["_created_at"], "2024-03-05 14:07:09");
  assert!(value.get("created_at").is_none());
}

#[test]
fn json_keeps_record_order() {
  let records = vec![serde_json::json!({"n": 3}), serde_json::json!({"n": 1})];
  let mut out = Vec::new();
  write_records_json(&mut out, &records).unwrap();
  let text = String::from_utf8(out).unwrap();
  assert!(text.ends_with("]\n"));
  assert!(text.find("3").unwrap() < text.find("1").unwrap());
  assert_eq!(records_json::<serde_json::Value>(&[]).unwrap(), "[]");
}

// ─── Batches ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn project_all_sorts_by_control_number_and_collects_failures() {
  let store = Arc::new(seeded(&[5, 1, 3, 2, 4]).await);
  let outcome = project_all(store, vec![4, 99, 1, 5, 3, 2], 2).await.unwrap();

  let ids: Vec<_> = outcome.items.iter().map(|r| r.metadata.control_number).collect();
  assert_eq!(ids, vec![1, 2, 3, 4, 5]);
  assert_eq!(outcome.failures.len(), 1);
  assert!(matches!(outcome.failures[0], (99, scoap_projector::Error::NotFound(99))));
  assert!(!outcome.is_complete());
}

#[tokio::test]
async fn zero_concurrency_still_runs() {
  let store = Arc::new(seeded(&[1]).await);
  let outcome = project_all(store, vec![1], 0).await.unwrap();
  assert_eq!(outcome.items.len(), 1);
  assert!(outcome.is_complete());
}

struct Files(HashMap<String, Bytes>);

impl FileStorage for Files {
  type Error = std::io::Error;

  async fn read<'a>(&'a self, key: &'a str) -> Result<Bytes, Self::Error> {
    self
      .0
      .get(key)
      .cloned()
      .ok_or_else(|| std::io::Error::from(std::io::ErrorKind::NotFound))
  }
}

#[tokio::test]
async fn scan_all_reports_every_article() {
  let store = SqliteStore::open_in_memory().await.unwrap();
  let mut funded = article(1);
  funded.related_files =
    vec![ArticleFile { file: "1.txt".into(), size: None, filetype: Some("txt".into()) }];
  store.import_article(funded).await.unwrap();
  store.import_article(article(2)).await.unwrap();

  let files = Files(HashMap::from([("1.txt".to_owned(), Bytes::from("Funded by\nSCOAP3"))]));
  let scanner = Arc::new(ComplianceScanner::new(files));
  let outcome = scan_all(Arc::new(store), scanner, vec![2, 1], 4).await.unwrap();

  assert_eq!(outcome.items.len(), 2);
  assert_eq!(outcome.items[0].article_id, 1);
  assert!(outcome.items[0].found);
  assert_eq!(outcome.items[1].message, "No files found for the given article.");
}
