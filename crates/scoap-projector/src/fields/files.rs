use scoap_core::Article;

use crate::record::LegacyFile;

/// `_files`: one entry per attached file.
pub fn files(article: &Article) -> Vec<LegacyFile> {
  article
    .related_files
    .iter()
    .map(|f| file_entry(&f.file))
    .collect()
}

/// Split a stored file reference into its stem (`key`) and extension
/// (`filetype`).
///
/// The name is everything after the last `/`, so a reference ending in `/`
/// has an empty key. The extension starts at the last `.` that follows at
/// least one other character; leading dots belong to the stem.
pub fn file_entry(file: &str) -> LegacyFile {
  let name = file.rsplit('/').next().unwrap_or_default();
  let (key, filetype) = split_extension(name);
  LegacyFile {
    file:     file.to_owned(),
    key:      Some(key.to_owned()),
    filetype: Some(filetype.to_owned()),
  }
}

fn split_extension(name: &str) -> (&str, &str) {
  match name.rfind('.') {
    Some(dot) if name[..dot].bytes().any(|b| b != b'.') => (&name[..dot], &name[dot + 1..]),
    _ => (name, ""),
  }
}
