//! [`LocalFileStorage`] — attachments read from a directory on disk.

use std::path::{Component, Path, PathBuf};

use bytes::Bytes;
use scoap_core::source::FileStorage;

use crate::{Error, Result};

#[derive(Debug, Clone)]
pub struct LocalFileStorage {
  root: PathBuf,
}

impl LocalFileStorage {
  pub fn new(root: impl Into<PathBuf>) -> Self { Self { root: root.into() } }

  pub fn root(&self) -> &Path { &self.root }

  /// Resolve `key` under the root. Only plain relative keys are accepted.
  pub fn resolve(&self, key: &str) -> Result<PathBuf> {
    let relative = Path::new(key);
    let plain = !key.is_empty()
      && relative
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
    if !plain {
      return Err(Error::InvalidKey(key.to_owned()));
    }
    Ok(self.root.join(relative))
  }
}

impl FileStorage for LocalFileStorage {
  type Error = Error;

  async fn read<'a>(&'a self, key: &'a str) -> Result<Bytes> {
    let path = self.resolve(key)?;
    let data = tokio::fs::read(&path).await?;
    Ok(Bytes::from(data))
  }
}
