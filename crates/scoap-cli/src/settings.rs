//! Settings resolution: CLI flags (or their `SCOAP_*` env fallbacks)
//! override the TOML config file, which overrides defaults.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use scoap_scan::DEFAULT_PHRASE;
use serde::Deserialize;

const DEFAULT_CONCURRENCY: usize = 8;
const DEFAULT_CROSSREF_URL: &str = "https://api.crossref.org";

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default, Debug)]
#[serde(default)]
pub struct ConfigFile {
  pub store:        Option<PathBuf>,
  pub index:        Option<PathBuf>,
  pub files:        Option<PathBuf>,
  pub phrase:       Option<String>,
  pub concurrency:  Option<usize>,
  pub crossref_url: Option<String>,
  /// Sent in the User-Agent so Crossref can route to its polite pool.
  pub mailto:       Option<String>,
}

/// Paths given on the command line or through the environment.
#[derive(Debug, Default)]
pub struct Overrides {
  pub store: Option<PathBuf>,
  pub index: Option<PathBuf>,
  pub files: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct Settings {
  store:            Option<PathBuf>,
  index:            Option<PathBuf>,
  files:            Option<PathBuf>,
  pub phrase:       String,
  pub concurrency:  usize,
  pub crossref_url: String,
  pub mailto:       Option<String>,
}

impl Settings {
  pub fn resolve(config: Option<&Path>, overrides: Overrides) -> Result<Self> {
    let file_cfg: ConfigFile = match config {
      Some(path) => {
        let raw = std::fs::read_to_string(path)
          .with_context(|| format!("reading config file {}", path.display()))?;
        toml::from_str(&raw).context("parsing config file")?
      }
      None => ConfigFile::default(),
    };
    Ok(Self::merge(file_cfg, overrides))
  }

  fn merge(file_cfg: ConfigFile, overrides: Overrides) -> Self {
    Self {
      store:        overrides.store.or(file_cfg.store),
      index:        overrides.index.or(file_cfg.index),
      files:        overrides.files.or(file_cfg.files),
      phrase:       file_cfg.phrase.unwrap_or_else(|| DEFAULT_PHRASE.to_owned()),
      concurrency:  file_cfg.concurrency.unwrap_or(DEFAULT_CONCURRENCY).max(1),
      crossref_url: file_cfg
        .crossref_url
        .unwrap_or_else(|| DEFAULT_CROSSREF_URL.to_owned()),
      mailto:       file_cfg.mailto,
    }
  }

  pub fn store_path(&self) -> Result<&Path> {
    self
      .store
      .as_deref()
      .ok_or_else(|| anyhow!("no store configured (use --store or SCOAP_STORE)"))
  }

  pub fn index_path(&self) -> Result<&Path> {
    self
      .index
      .as_deref()
      .ok_or_else(|| anyhow!("no index configured (use --index or SCOAP_INDEX)"))
  }

  pub fn files_root(&self) -> Result<&Path> {
    self
      .files
      .as_deref()
      .ok_or_else(|| anyhow!("no files directory configured (use --files or SCOAP_FILES)"))
  }
}
