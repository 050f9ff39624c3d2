//! [`ComplianceScanner`] — does any attachment of an article carry the
//! required funding statement?

use scoap_core::{Article, ArticleId, source::FileStorage};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::{Error, Result, extract::attachment_pages, normalize::contains_phrase};

pub const DEFAULT_PHRASE: &str = "Funded by SCOAP3";

const NO_FILES_MESSAGE: &str = "No files found for the given article.";

/// The outcome of scanning one article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanReport {
  pub article_id: ArticleId,
  pub found:      bool,
  pub message:    String,
}

pub struct ComplianceScanner<F> {
  storage: F,
  phrase:  String,
}

impl<F: FileStorage> ComplianceScanner<F> {
  /// A scanner looking for [`DEFAULT_PHRASE`].
  pub fn new(storage: F) -> Self {
    Self { storage, phrase: DEFAULT_PHRASE.to_owned() }
  }

  pub fn with_phrase(mut self, phrase: impl Into<String>) -> Self {
    self.phrase = phrase.into();
    self
  }

  pub fn phrase(&self) -> &str { &self.phrase }

  pub fn storage(&self) -> &F { &self.storage }

  /// Scan every attachment of `article`, stopping at the first match.
  pub async fn scan(&self, article: &Article) -> ScanReport {
    match self.scan_with_cancel(article, &CancellationToken::new()).await {
      Ok(report) => report,
      // A fresh token is never cancelled.
      Err(_) => self.report(article.id, false),
    }
  }

  /// Like [`scan`](Self::scan), but gives up with [`Error::Cancelled`] once
  /// `cancel` fires. The token is checked between attachments.
  pub async fn scan_with_cancel(
    &self,
    article: &Article,
    cancel: &CancellationToken,
  ) -> Result<ScanReport> {
    if article.related_files.is_empty() {
      return Ok(ScanReport {
        article_id: article.id,
        found:      false,
        message:    NO_FILES_MESSAGE.to_owned(),
      });
    }

    for file in &article.related_files {
      if cancel.is_cancelled() {
        return Err(Error::Cancelled);
      }
      match self.attachment_matches(&file.file).await {
        Ok(true) => {
          tracing::debug!(article_id = article.id, file = %file.file, "required text found");
          return Ok(self.report(article.id, true));
        }
        Ok(false) => {}
        Err(e) => {
          tracing::warn!(
            article_id = article.id,
            file = %file.file,
            error = %e,
            "skipping unreadable attachment"
          );
        }
      }
    }

    Ok(self.report(article.id, false))
  }

  async fn attachment_matches(&self, key: &str) -> Result<bool> {
    let bytes = self
      .storage
      .read(key)
      .await
      .map_err(|e| Error::Storage(Box::new(e)))?;
    let pages = tokio::task::spawn_blocking(move || attachment_pages(&bytes)).await??;
    Ok(contains_phrase(&pages.join(" "), &self.phrase))
  }

  fn report(&self, article_id: ArticleId, found: bool) -> ScanReport {
    let message = if found {
      format!("Files contain the required text: '{}'", self.phrase)
    } else {
      format!("Files do not contain the required text: '{}'", self.phrase)
    };
    ScanReport { article_id, found, message }
  }
}
