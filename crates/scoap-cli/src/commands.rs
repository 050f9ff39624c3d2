//! Subcommand implementations.

use std::{
  collections::BTreeSet,
  fs::File,
  io::{self, BufWriter, Write},
  path::Path,
  process::ExitCode,
  sync::Arc,
};

use anyhow::{Context, Result, bail};
use scoap_core::{Article, ArticleId, source::ArticleSource};
use scoap_export::{
  ArticleSummary, CsvRow, CsvTable,
  crossref::{self, FieldSpec, WorkAnalysis, WorksSelector},
  project_all, scan_all, summary_table, write_records_json,
};
use scoap_projector::fetch_legacy_record;
use scoap_scan::{ComplianceScanner, LocalFileStorage, ScanReport};
use scoap_store_sqlite::{SqliteDocumentIndex, SqliteStore};

use crate::{
  Command, CrossrefCommand, ExportCommand, Source, WorksArgs, client::CrossrefClient,
  settings::Settings,
};

pub async fn run(settings: &Settings, command: Command) -> Result<ExitCode> {
  match command {
    Command::Legacy { id, source } => match source {
      Source::Relational => print_legacy(&open_store(settings).await?, id).await?,
      Source::Search => print_legacy(&open_index(settings).await?, id).await?,
    },
    Command::Export { what: ExportCommand::Legacy { source, out } } => match source {
      Source::Relational => export_legacy(settings, open_store(settings).await?, out.as_deref()).await?,
      Source::Search => export_legacy(settings, open_index(settings).await?, out.as_deref()).await?,
    },
    Command::Export { what: ExportCommand::Summary { out } } => {
      export_summary(&open_store(settings).await?, out.as_deref()).await?
    }
    Command::Scan { id, phrase } => return scan_one(settings, id, phrase).await,
    Command::ScanAll { out } => scan_every(settings, out.as_deref()).await?,
    Command::Import { file } => import(settings, &file).await?,
    Command::Reindex => reindex(settings).await?,
    Command::Crossref { what } => match what {
      CrossrefCommand::Analyze { dois, fields, json, csv } => {
        crossref_analyze(settings, &dois, &fields, json.as_deref(), csv.as_deref()).await?
      }
      CrossrefCommand::Flatten { dois, out } => crossref_flatten(settings, &dois, &out).await?,
      CrossrefCommand::Works { selector, from, until, out } => {
        let from = from.map(|d| d.to_string());
        let until = until.map(|d| d.to_string());
        crossref_works(settings, selector, from.as_deref(), until.as_deref(), &out).await?
      }
    },
  }
  Ok(ExitCode::SUCCESS)
}

// ─── Backends ────────────────────────────────────────────────────────────────

async fn open_store(settings: &Settings) -> Result<SqliteStore> {
  let path = settings.store_path()?;
  SqliteStore::open(path)
    .await
    .with_context(|| format!("failed to open store at {}", path.display()))
}

async fn open_index(settings: &Settings) -> Result<SqliteDocumentIndex> {
  let path = settings.index_path()?;
  SqliteDocumentIndex::open(path)
    .await
    .with_context(|| format!("failed to open index at {}", path.display()))
}

fn scanner(settings: &Settings, phrase: Option<String>) -> Result<ComplianceScanner<LocalFileStorage>> {
  let storage = LocalFileStorage::new(settings.files_root()?);
  Ok(ComplianceScanner::new(storage).with_phrase(phrase.unwrap_or_else(|| settings.phrase.clone())))
}

/// `path`, or stdout when absent.
fn output(path: Option<&Path>) -> Result<Box<dyn Write>> {
  Ok(match path {
    Some(p) => Box::new(BufWriter::new(
      File::create(p).with_context(|| format!("creating {}", p.display()))?,
    )),
    None => Box::new(io::stdout().lock()),
  })
}

// ─── Records ─────────────────────────────────────────────────────────────────

async fn print_legacy<S: ArticleSource>(source: &S, id: ArticleId) -> Result<()> {
  let record = fetch_legacy_record(source, id).await?;
  let mut out = output(None)?;
  serde_json::to_writer_pretty(&mut out, &record)?;
  writeln!(out)?;
  Ok(())
}

async fn export_legacy<S: ArticleSource + 'static>(
  settings: &Settings,
  source: S,
  out: Option<&Path>,
) -> Result<()> {
  let ids = source.list_article_ids().await?;
  let outcome = project_all(Arc::new(source), ids, settings.concurrency).await?;
  for (id, e) in &outcome.failures {
    tracing::warn!(article_id = id, error = %e, "article left out of export");
  }
  let mut writer = output(out)?;
  write_records_json(&mut writer, &outcome.items)?;
  writer.flush()?;
  tracing::info!(records = outcome.items.len(), "exported legacy records");
  Ok(())
}

async fn export_summary(store: &SqliteStore, out: Option<&Path>) -> Result<()> {
  let mut summaries = Vec::new();
  for id in store.list_article_ids().await? {
    if let Some(article) = store.get_article(id).await? {
      summaries.push(ArticleSummary::from(&article));
    }
  }
  let mut writer = output(out)?;
  summary_table(&summaries).write_to(&mut writer)?;
  writer.flush()?;
  Ok(())
}

// ─── Compliance ──────────────────────────────────────────────────────────────

async fn scan_one(settings: &Settings, id: ArticleId, phrase: Option<String>) -> Result<ExitCode> {
  let store = open_store(settings).await?;
  let article = store
    .get_article(id)
    .await?
    .with_context(|| format!("article {id} not found"))?;
  let report = scanner(settings, phrase)?.scan(&article).await;
  println!("{}", report.message);
  Ok(if report.found { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn report_row(report: &ScanReport) -> CsvRow {
  let mut row = CsvRow::new();
  row.insert("article_id".into(), report.article_id.to_string());
  row.insert("found".into(), report.found.to_string());
  row.insert("message".into(), report.message.clone());
  row
}

async fn scan_every(settings: &Settings, out: Option<&Path>) -> Result<()> {
  let store = Arc::new(open_store(settings).await?);
  let ids = store.list_article_ids().await?;
  let outcome = scan_all(store, Arc::new(scanner(settings, None)?), ids, settings.concurrency).await?;
  for (id, e) in &outcome.failures {
    tracing::warn!(article_id = id, error = %e, "article not scanned");
  }

  let mut table = CsvTable::new("article_id");
  table.extend(outcome.items.iter().map(report_row));
  let mut writer = output(out)?;
  table.write_to(&mut writer)?;
  writer.flush()?;

  let found = outcome.items.iter().filter(|r| r.found).count();
  tracing::info!(scanned = outcome.items.len(), found, "compliance scan finished");
  Ok(())
}

// ─── Indexing ────────────────────────────────────────────────────────────────

async fn import(settings: &Settings, file: &Path) -> Result<()> {
  let raw = std::fs::read_to_string(file)
    .with_context(|| format!("reading {}", file.display()))?;
  let articles: Vec<Article> = serde_json::from_str(&raw).context("parsing articles")?;

  let store = open_store(settings).await?;
  let index = open_index(settings).await?;
  for article in articles {
    let id = article.id;
    let stored = store
      .import_article(article)
      .await
      .with_context(|| format!("importing article {id}"))?;
    index.index_article(&stored).await?;
    tracing::info!(article_id = id, "imported");
  }
  Ok(())
}

async fn reindex(settings: &Settings) -> Result<()> {
  let store = open_store(settings).await?;
  let index = open_index(settings).await?;

  let ids = store.list_article_ids().await?;
  let live: BTreeSet<ArticleId> = ids.iter().copied().collect();
  for id in ids {
    if let Some(article) = store.get_article(id).await? {
      index.index_article(&article).await?;
    }
  }

  let mut removed = 0;
  for id in index.list_article_ids().await? {
    if !live.contains(&id) && index.remove(id).await? {
      removed += 1;
    }
  }
  tracing::info!(indexed = live.len(), removed, "reindex finished");
  Ok(())
}

// ─── Crossref ────────────────────────────────────────────────────────────────

fn crossref_client(settings: &Settings) -> Result<CrossrefClient> {
  CrossrefClient::new(&settings.crossref_url, settings.mailto.as_deref())
}

async fn crossref_analyze(
  settings: &Settings,
  dois: &Path,
  fields: &[FieldSpec],
  json: Option<&Path>,
  csv: Option<&Path>,
) -> Result<()> {
  let input = File::open(dois).with_context(|| format!("opening {}", dois.display()))?;
  let dois = crossref::read_dois(input)?;
  let client = crossref_client(settings)?;

  let mut analyses: Vec<WorkAnalysis> = Vec::with_capacity(dois.len());
  for doi in &dois {
    match client.work(doi).await {
      Ok(Some(work)) => analyses.push(crossref::analyze(doi, &work, fields)?),
      Ok(None) => tracing::warn!(doi = %doi, "unknown to Crossref"),
      Err(e) => tracing::warn!(doi = %doi, error = %e, "fetch failed"),
    }
  }

  if let Some(path) = csv {
    let mut writer = output(Some(path))?;
    crossref::analysis_table(&analyses).write_to(&mut writer)?;
    writer.flush()?;
  }
  if json.is_some() || csv.is_none() {
    let mut writer = output(json)?;
    write_records_json(&mut writer, &analyses)?;
    writer.flush()?;
  }
  tracing::info!(requested = dois.len(), analysed = analyses.len(), "crossref analysis written");
  Ok(())
}

async fn crossref_flatten(settings: &Settings, dois: &Path, out: &Path) -> Result<()> {
  let input = File::open(dois).with_context(|| format!("opening {}", dois.display()))?;
  let dois = crossref::read_dois(input)?;
  let client = crossref_client(settings)?;

  let mut rows = Vec::with_capacity(dois.len());
  for doi in &dois {
    match client.work(doi).await {
      Ok(Some(work)) => match crossref::flatten(&work, crossref::MAX_DEPTH) {
        Ok(row) => rows.push(row),
        Err(e) => tracing::warn!(doi = %doi, error = %e, "work not flattened"),
      },
      Ok(None) => tracing::warn!(doi = %doi, "unknown to Crossref"),
      Err(e) => tracing::warn!(doi = %doi, error = %e, "fetch failed"),
    }
  }

  if rows.is_empty() {
    tracing::warn!("no works to write");
    return Ok(());
  }
  let flattened = rows.len();
  let mut writer = output(Some(out))?;
  crossref::flattened_table(rows).write_to(&mut writer)?;
  writer.flush()?;
  tracing::info!(requested = dois.len(), flattened, path = %out.display(), "works written");
  Ok(())
}

async fn crossref_works(
  settings: &Settings,
  selector: WorksArgs,
  from: Option<&str>,
  until: Option<&str>,
  out: &Path,
) -> Result<()> {
  let selector = match (selector.journal, selector.publisher) {
    (Some(journal), _) => WorksSelector::Journal(journal),
    (None, Some(publisher)) => WorksSelector::Publisher(publisher),
    (None, None) => bail!("either --journal or --publisher is required"),
  };
  let dois = crossref_client(settings)?.list_dois(&selector, from, until).await?;

  let mut writer = output(Some(out))?;
  for doi in &dois {
    writeln!(writer, "{doi}")?;
  }
  writer.flush()?;
  tracing::info!(count = dois.len(), path = %out.display(), "DOIs written");
  Ok(())
}
