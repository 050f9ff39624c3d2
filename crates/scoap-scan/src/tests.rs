//! Scanner tests over an in-memory file storage and a temporary directory.

use std::collections::HashMap;

use bytes::Bytes;
use chrono::{TimeZone, Utc};
use lopdf::{
  Document, Object, Stream,
  content::{Content, Operation},
  dictionary,
};
use scoap_core::{Article, article::ArticleFile, source::FileStorage};
use tokio_util::sync::CancellationToken;

use crate::{ComplianceScanner, Error, LocalFileStorage, ScanReport};

const FOUND: &str = "Files contain the required text: 'Funded by SCOAP3'";
const NOT_FOUND: &str = "Files do not contain the required text: 'Funded by SCOAP3'";
const NO_FILES: &str = "No files found for the given article.";

#[derive(Default)]
struct MemoryStorage {
  files: HashMap<String, Bytes>,
}

impl MemoryStorage {
  fn with(mut self, key: &str, data: impl Into<Bytes>) -> Self {
    self.files.insert(key.to_owned(), data.into());
    self
  }
}

impl FileStorage for MemoryStorage {
  type Error = std::io::Error;

  async fn read<'a>(&'a self, key: &'a str) -> Result<Bytes, Self::Error> {
    self
      .files
      .get(key)
      .cloned()
      .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::NotFound, key.to_owned()))
  }
}

fn article_with(keys: &[&str]) -> Article {
  let mut a = Article::new(11, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
  a.related_files = keys
    .iter()
    .map(|k| ArticleFile { file: (*k).to_owned(), size: None, filetype: None })
    .collect();
  a
}

/// A PDF with one text line per page.
fn pdf(pages: &[&str]) -> Vec<u8> {
  let mut doc = Document::with_version("1.5");
  let pages_id = doc.new_object_id();
  let font_id = doc.add_object(dictionary! {
    "Type" => "Font",
    "Subtype" => "Type1",
    "BaseFont" => "Courier",
    "Encoding" => "WinAnsiEncoding",
  });
  let resources_id = doc.add_object(dictionary! {
    "Font" => dictionary! { "F1" => font_id },
  });

  let mut kids: Vec<Object> = Vec::new();
  for text in pages {
    let content = Content {
      operations: vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec!["F1".into(), 12.into()]),
        Operation::new("Td", vec![72.into(), 720.into()]),
        Operation::new("Tj", vec![Object::string_literal(*text)]),
        Operation::new("ET", vec![]),
      ],
    };
    let content_id =
      doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
    let page_id = doc.add_object(dictionary! {
      "Type" => "Page",
      "Parent" => pages_id,
      "Contents" => content_id,
      "Resources" => resources_id,
      "MediaBox" => vec![
        Object::Integer(0),
        Object::Integer(0),
        Object::Integer(612),
        Object::Integer(792),
      ],
    });
    kids.push(Object::Reference(page_id));
  }

  let count = kids.len() as i64;
  doc.objects.insert(
    pages_id,
    Object::Dictionary(dictionary! {
      "Type" => "Pages",
      "Kids" => kids,
      "Count" => count,
    }),
  );
  let catalog_id = doc.add_object(dictionary! {
    "Type" => "Catalog",
    "Pages" => pages_id,
  });
  doc.trailer.set("Root", catalog_id);

  let mut out = Vec::new();
  doc.save_to(&mut out).unwrap();
  out
}

// ─── Matching ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn phrase_split_by_line_breaks_matches() {
  let storage = MemoryStorage::default()
    .with("a.txt", "This article was Funded by\nSCOAP3 under CC-BY.")
    .with("b.txt", "Funded    by\n\n   SCOAP3");
  let scanner = ComplianceScanner::new(storage);

  for key in ["a.txt", "b.txt"] {
    let report = scanner.scan(&article_with(&[key])).await;
    assert_eq!(report, ScanReport { article_id: 11, found: true, message: FOUND.into() });
  }
}

#[tokio::test]
async fn unrelated_text_does_not_match() {
  let storage = MemoryStorage::default().with("a.txt", "Supported by the funding agency.");
  let report = ComplianceScanner::new(storage).scan(&article_with(&["a.txt"])).await;
  assert!(!report.found);
  assert_eq!(report.message, NOT_FOUND);
}

#[tokio::test]
async fn no_attachments_has_its_own_message() {
  let report = ComplianceScanner::new(MemoryStorage::default())
    .scan(&article_with(&[]))
    .await;
  assert!(!report.found);
  assert_eq!(report.message, NO_FILES);
}

#[tokio::test]
async fn one_matching_attachment_is_enough() {
  let storage = MemoryStorage::default()
    .with("plain.txt", "nothing relevant here")
    .with("funded.txt", "Funded by SCOAP3");
  let scanner = ComplianceScanner::new(storage);

  assert!(scanner.scan(&article_with(&["plain.txt", "funded.txt"])).await.found);
  assert!(scanner.scan(&article_with(&["funded.txt", "plain.txt"])).await.found);
}

#[tokio::test]
async fn unreadable_attachments_are_skipped() {
  let storage = MemoryStorage::default()
    .with("binary.bin", vec![0xff_u8, 0xfe, 0x00, 0x81])
    .with("broken.pdf", "%PDF-1.7 not really")
    .with("good.txt", "Funded by SCOAP3");
  let scanner = ComplianceScanner::new(storage);

  let report = scanner
    .scan(&article_with(&["missing.pdf", "binary.bin", "broken.pdf", "good.txt"]))
    .await;
  assert!(report.found);

  let report = scanner.scan(&article_with(&["missing.pdf", "binary.bin"])).await;
  assert!(!report.found);
  assert_eq!(report.message, NOT_FOUND);
}

#[tokio::test]
async fn custom_phrase_is_named_in_the_message() {
  let storage = MemoryStorage::default().with("a.txt", "Open Access\nfunded");
  let scanner = ComplianceScanner::new(storage).with_phrase("Open Access funded");
  let report = scanner.scan(&article_with(&["a.txt"])).await;
  assert!(report.found);
  assert_eq!(report.message, "Files contain the required text: 'Open Access funded'");
}

#[tokio::test]
async fn phrase_spanning_pdf_pages_matches() {
  let storage = MemoryStorage::default()
    .with("split.pdf", pdf(&["Funded by", "SCOAP3"]))
    .with("other.pdf", pdf(&["Funded by someone else"]));
  let scanner = ComplianceScanner::new(storage);

  assert!(scanner.scan(&article_with(&["split.pdf"])).await.found);
  assert!(!scanner.scan(&article_with(&["other.pdf"])).await.found);
}

#[tokio::test]
async fn cancelled_scan_stops_before_reading() {
  let storage = MemoryStorage::default().with("a.txt", "Funded by SCOAP3");
  let scanner = ComplianceScanner::new(storage);
  let token = CancellationToken::new();
  token.cancel();

  let err = scanner
    .scan_with_cancel(&article_with(&["a.txt"]), &token)
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Cancelled));
}

#[test]
fn report_serializes_flat() {
  let report = ScanReport { article_id: 3, found: false, message: NO_FILES.into() };
  assert_eq!(
    serde_json::to_string(&report).unwrap(),
    r#"{"article_id":3,"found":false,"message":"No files found for the given article."}"#
  );
}

// ─── Local storage ───────────────────────────────────────────────────────────

#[tokio::test]
async fn local_storage_reads_under_its_root() {
  let dir = tempfile::tempdir().unwrap();
  std::fs::create_dir_all(dir.path().join("files/2024")).unwrap();
  std::fs::write(dir.path().join("files/2024/a.txt"), "Funded by\r\nSCOAP3").unwrap();

  let storage = LocalFileStorage::new(dir.path());
  assert_eq!(storage.read("files/2024/a.txt").await.unwrap(), Bytes::from("Funded by\r\nSCOAP3"));

  let report = ComplianceScanner::new(storage)
    .scan(&article_with(&["files/2024/a.txt"]))
    .await;
  assert!(report.found);
}

#[tokio::test]
async fn local_storage_rejects_escaping_keys() {
  let dir = tempfile::tempdir().unwrap();
  let storage = LocalFileStorage::new(dir.path());

  for key in ["../secret.txt", "files/../../secret.txt", "/etc/passwd", ""] {
    let err = storage.read(key).await.unwrap_err();
    assert!(matches!(err, Error::InvalidKey(_)), "{key}: {err:?}");
  }
  assert!(matches!(storage.read("absent.txt").await, Err(Error::Io(_))));
}
