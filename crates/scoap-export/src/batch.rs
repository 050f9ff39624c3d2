//! Bounded fan-out of per-article work over a [`JoinSet`].
//!
//! Tasks finish in any order; results are sorted by article id before they
//! are returned. A failure to load one article is recorded and the batch
//! carries on.

use std::{future::Future, sync::Arc};

use scoap_core::{
  ArticleId,
  source::{ArticleSource, FileStorage},
};
use scoap_projector::{LegacyRecord, fetch_legacy_record};
use scoap_scan::{ComplianceScanner, ScanReport};
use tokio::task::JoinSet;

use crate::Result;

/// Results of a batch run, ordered by article id.
#[derive(Debug)]
pub struct BatchOutcome<T> {
  pub items:    Vec<T>,
  pub failures: Vec<(ArticleId, scoap_projector::Error)>,
}

impl<T> BatchOutcome<T> {
  pub fn is_complete(&self) -> bool { self.failures.is_empty() }
}

/// Load and project every id in `ids`, at most `concurrency` at a time.
pub async fn project_all<S>(
  source: Arc<S>,
  ids: Vec<ArticleId>,
  concurrency: usize,
) -> Result<BatchOutcome<LegacyRecord>>
where
  S: ArticleSource + 'static,
{
  let mut outcome = run_bounded(ids, concurrency, move |id| {
    let source = Arc::clone(&source);
    async move { fetch_legacy_record(source.as_ref(), id).await }
  })
  .await?;
  outcome.items.sort_by_key(|r| r.metadata.control_number);
  Ok(outcome)
}

/// Scan every id in `ids` for the scanner's phrase, at most `concurrency`
/// at a time.
pub async fn scan_all<S, F>(
  source: Arc<S>,
  scanner: Arc<ComplianceScanner<F>>,
  ids: Vec<ArticleId>,
  concurrency: usize,
) -> Result<BatchOutcome<ScanReport>>
where
  S: ArticleSource + 'static,
  F: FileStorage + 'static,
{
  let mut outcome = run_bounded(ids, concurrency, move |id| {
    let source = Arc::clone(&source);
    let scanner = Arc::clone(&scanner);
    async move {
      let article = source
        .get_article(id)
        .await
        .map_err(scoap_projector::Error::upstream)?
        .ok_or(scoap_projector::Error::NotFound(id))?;
      Ok::<_, scoap_projector::Error>(scanner.scan(&article).await)
    }
  })
  .await?;
  outcome.items.sort_by_key(|r| r.article_id);
  Ok(outcome)
}

async fn run_bounded<T, Fut>(
  ids: Vec<ArticleId>,
  concurrency: usize,
  task: impl Fn(ArticleId) -> Fut,
) -> Result<BatchOutcome<T>>
where
  T: Send + 'static,
  Fut: Future<Output = scoap_projector::Result<T>> + Send + 'static,
{
  let limit = concurrency.max(1);
  let total = ids.len();
  let mut pending = ids.into_iter();
  let mut set = JoinSet::new();
  let mut outcome = BatchOutcome { items: Vec::with_capacity(total), failures: Vec::new() };

  loop {
    while set.len() < limit {
      let Some(id) = pending.next() else { break };
      let fut = task(id);
      set.spawn(async move { (id, fut.await) });
    }
    let Some(joined) = set.join_next().await else { break };
    match joined? {
      (_, Ok(item)) => outcome.items.push(item),
      (id, Err(e)) => {
        tracing::warn!(article_id = id, error = %e, "batch item failed");
        outcome.failures.push((id, e));
      }
    }
  }

  outcome.failures.sort_by_key(|(id, _)| *id);
  tracing::info!(
    total,
    succeeded = outcome.items.len(),
    failed = outcome.failures.len(),
    "batch finished"
  );
  Ok(outcome)
}
