//! Crossref work analysis.
//!
//! A work is the `message` object returned by the Crossref works API. Each
//! [`FieldSpec`] names a dotted path into it (`author.affiliation.name`) and
//! an [`AnalysisMode`]. Arrays met along the path fan out, so one spec can
//! match many concrete paths (`author[0].affiliation[1].name`).
//!
//! [`flatten`] instead turns a whole work into one row of dotted keys.
//!
//! Fetching is left to the caller; everything here is pure.

use std::{fmt, io::Read, str::FromStr};

use serde::{Serialize, Serializer, ser::SerializeStruct};
use serde_json::{Map, Value};

use crate::{CsvRow, CsvTable, Error, Result};

/// Deepest nesting [`resolve`] and [`flatten`] will walk before giving up.
pub const MAX_DEPTH: usize = 64;

// ─── Specs ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisMode {
  /// `y/n`: whether each matched value is present and non-empty.
  Presence,
  /// `nr`: how many matched values are non-null.
  Count,
  /// `data`: the matched values themselves.
  Data,
}

impl AnalysisMode {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Presence => "y/n",
      Self::Count => "nr",
      Self::Data => "data",
    }
  }
}

impl FromStr for AnalysisMode {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    match s {
      "y/n" => Ok(Self::Presence),
      "nr" => Ok(Self::Count),
      "data" => Ok(Self::Data),
      other => Err(Error::UnknownMode(other.to_owned())),
    }
  }
}

impl fmt::Display for AnalysisMode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// `PATH=MODE`, e.g. `author.ORCID=nr`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
  pub path: String,
  pub mode: AnalysisMode,
}

impl FromStr for FieldSpec {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    let (path, mode) = s
      .rsplit_once('=')
      .ok_or_else(|| Error::InvalidFieldSpec(s.to_owned()))?;
    let path = path.trim();
    if path.is_empty() || path.split('.').any(str::is_empty) {
      return Err(Error::InvalidFieldSpec(s.to_owned()));
    }
    Ok(Self { path: path.to_owned(), mode: mode.trim().parse()? })
  }
}

// ─── Path resolution ─────────────────────────────────────────────────────────

/// Every concrete path `path` reaches in `root`, in document order, with
/// the value found there. A missing key or a `null` value yields `None`.
pub fn resolve<'a>(root: &'a Value, path: &str) -> Result<Vec<(String, Option<&'a Value>)>> {
  let keys: Vec<&str> = path.split('.').collect();
  let mut out = Vec::new();
  let mut stack = vec![(root, 0_usize, String::new(), 0_usize)];

  while let Some((node, next, at, depth)) = stack.pop() {
    if depth > MAX_DEPTH {
      return Err(Error::TooDeep(at));
    }
    let Some(key) = keys.get(next) else {
      out.push((at, (!node.is_null()).then_some(node)));
      continue;
    };
    match node {
      Value::Array(items) => {
        for (i, item) in items.iter().enumerate().rev() {
          stack.push((item, next, format!("{at}[{i}]"), depth + 1));
        }
      }
      Value::Object(map) if map.contains_key(*key) => {
        stack.push((&map[*key], next + 1, join(&at, key), depth + 1));
      }
      _ => out.push((join(&at, key), None)),
    }
  }
  Ok(out)
}

fn join(at: &str, key: &str) -> String {
  if at.is_empty() { key.to_owned() } else { format!("{at}.{key}") }
}

/// Truthiness the way the `y/n` column reads it: null, false, zero and
/// empty strings, arrays or objects are all "n".
pub fn is_present(value: Option<&Value>) -> bool {
  match value {
    None | Some(Value::Null) => false,
    Some(Value::Bool(b)) => *b,
    Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
    Some(Value::String(s)) => !s.is_empty(),
    Some(Value::Array(a)) => !a.is_empty(),
    Some(Value::Object(o)) => !o.is_empty(),
  }
}

/// A value as it appears in a CSV cell: strings unquoted, null empty,
/// everything else as compact JSON.
pub fn render(value: Option<&Value>) -> String {
  match value {
    None | Some(Value::Null) => String::new(),
    Some(Value::String(s)) => s.clone(),
    Some(other) => other.to_string(),
  }
}

// ─── Flattening ──────────────────────────────────────────────────────────────

/// Keys whose array items are flattened only up to a count.
const ITEM_CAPS: &[(&str, usize)] = &[("author", 2), ("reference", 1), ("funder", 1)];

/// Flatten a whole work into one row.
///
/// Nested objects become dotted keys. Arrays of objects are indexed
/// (`link[0].URL`), except that `author` keeps its first two items and
/// `reference` and `funder` their first one. Any other array is written as
/// compact JSON. Scalars are rendered as in [`render`]. Nesting deeper than
/// `max_depth` is an error.
pub fn flatten(work: &Value, max_depth: usize) -> Result<CsvRow> {
  let mut row = CsvRow::new();
  if let Value::Object(map) = work {
    flatten_object(map, "", 0, max_depth, &mut row)?;
  }
  Ok(row)
}

fn flatten_object(
  map: &Map<String, Value>,
  prefix: &str,
  depth: usize,
  max_depth: usize,
  row: &mut CsvRow,
) -> Result<()> {
  if depth > max_depth {
    return Err(Error::TooDeep(prefix.to_owned()));
  }
  for (key, value) in map {
    let path = join(prefix, key);
    match value {
      Value::Object(inner) => flatten_object(inner, &path, depth + 1, max_depth, row)?,
      Value::Array(items) => {
        let cap = ITEM_CAPS
          .iter()
          .find(|(capped, _)| *capped == key.as_str())
          .map(|(_, n)| *n);
        match cap {
          Some(n) if !items.is_empty() => {
            for (i, item) in items.iter().take(n).enumerate() {
              flatten_item(item, &format!("{path}[{i}]"), depth + 1, max_depth, row)?;
            }
          }
          _ if items.iter().all(Value::is_object) => {
            for (i, item) in items.iter().enumerate() {
              flatten_item(item, &format!("{path}[{i}]"), depth + 1, max_depth, row)?;
            }
          }
          _ => {
            row.insert(path, value.to_string());
          }
        }
      }
      scalar => {
        row.insert(path, render(Some(scalar)));
      }
    }
  }
  Ok(())
}

fn flatten_item(
  item: &Value,
  path: &str,
  depth: usize,
  max_depth: usize,
  row: &mut CsvRow,
) -> Result<()> {
  match item {
    Value::Object(map) => flatten_object(map, path, depth, max_depth, row),
    Value::Array(_) => {
      row.insert(path.to_owned(), item.to_string());
      Ok(())
    }
    scalar => {
      row.insert(path.to_owned(), render(Some(scalar)));
      Ok(())
    }
  }
}

/// A CSV table of flattened works. `DOI` leads; the rest sort by name.
pub fn flattened_table(rows: impl IntoIterator<Item = CsvRow>) -> CsvTable {
  let mut table = CsvTable::new("DOI");
  table.extend(rows);
  table
}

// ─── Analysis ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum FieldResult {
  Presence(Vec<(String, bool)>),
  Count(usize),
  Data(Vec<(String, Option<Value>)>),
}

/// The analysis of one work.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkAnalysis {
  pub doi:    String,
  /// One result per spec, in spec order.
  pub fields: Vec<(FieldSpec, FieldResult)>,
}

pub fn analyze(doi: &str, work: &Value, specs: &[FieldSpec]) -> Result<WorkAnalysis> {
  let fields = specs
    .iter()
    .map(|spec| -> Result<(FieldSpec, FieldResult)> {
      let matches = resolve(work, &spec.path)?;
      let result = match spec.mode {
        AnalysisMode::Presence => FieldResult::Presence(
          matches
            .into_iter()
            .map(|(path, v)| (path, is_present(v)))
            .collect(),
        ),
        AnalysisMode::Count => {
          FieldResult::Count(matches.iter().filter(|(_, v)| v.is_some()).count())
        }
        AnalysisMode::Data => FieldResult::Data(
          matches
            .into_iter()
            .map(|(path, v)| (path, v.cloned()))
            .collect(),
        ),
      };
      Ok((spec.clone(), result))
    })
    .collect::<Result<_>>()?;
  Ok(WorkAnalysis { doi: doi.to_owned(), fields })
}

impl WorkAnalysis {
  /// One CSV row: `article` is the DOI, then one cell per matched path
  /// (`y/n`, `data`) or per spec (`nr`).
  pub fn to_row(&self) -> CsvRow {
    let mut row = CsvRow::new();
    row.insert("article".into(), self.doi.clone());
    for (spec, result) in &self.fields {
      match result {
        FieldResult::Presence(flags) => {
          for (path, yes) in flags {
            row.insert(path.clone(), if *yes { "y" } else { "n" }.into());
          }
        }
        FieldResult::Count(n) => {
          row.insert(spec.path.clone(), format!("nr: {n}"));
        }
        FieldResult::Data(values) => {
          for (path, v) in values {
            row.insert(path.clone(), render(v.as_ref()));
          }
        }
      }
    }
    row
  }

  fn analysis_json(&self) -> serde_json::Map<String, Value> {
    self
      .fields
      .iter()
      .map(|(spec, result)| {
        let value = match result {
          FieldResult::Presence(flags) => flags
            .iter()
            .map(|(path, yes)| Value::from(format!("{path} = {}", if *yes { "y" } else { "n" })))
            .collect(),
          FieldResult::Count(n) => Value::from(format!("{} = nr: {n}", spec.path)),
          FieldResult::Data(values) => values
            .iter()
            .map(|(path, v)| Value::from(format!("{path} = {}", render(v.as_ref()))))
            .collect(),
        };
        (spec.path.clone(), value)
      })
      .collect()
  }
}

/// Serialized as `{"doi": ..., "analysis": {path: ...}}`.
impl Serialize for WorkAnalysis {
  fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    let mut s = serializer.serialize_struct("WorkAnalysis", 2)?;
    s.serialize_field("doi", &self.doi)?;
    s.serialize_field("analysis", &self.analysis_json())?;
    s.end()
  }
}

/// A CSV table of analyses keyed by `article`.
pub fn analysis_table<'a>(analyses: impl IntoIterator<Item = &'a WorkAnalysis>) -> CsvTable {
  let mut table = CsvTable::new("article");
  table.extend(analyses.into_iter().map(WorkAnalysis::to_row));
  table
}

// ─── Inputs ──────────────────────────────────────────────────────────────────

/// DOIs from a CSV with a `doi` column. Blank cells are skipped.
pub fn read_dois<R: Read>(input: R) -> Result<Vec<String>> {
  let mut reader = csv::Reader::from_reader(input);
  let column = reader
    .headers()?
    .iter()
    .position(|h| h == "doi")
    .ok_or(Error::MissingDoiColumn)?;

  let mut dois = Vec::new();
  for record in reader.records() {
    let record = record?;
    if let Some(doi) = record.get(column).map(str::trim).filter(|d| !d.is_empty()) {
      dois.push(doi.to_owned());
    }
  }
  Ok(dois)
}

/// Which works a listing query selects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorksSelector {
  Journal(String),
  Publisher(String),
}

/// Query parameters for the works listing endpoint. Dates are `YYYY-MM-DD`.
pub fn works_query(
  selector: &WorksSelector,
  from: Option<&str>,
  until: Option<&str>,
) -> Vec<(&'static str, String)> {
  let mut params = vec![match selector {
    WorksSelector::Journal(name) => ("query.container-title", name.clone()),
    WorksSelector::Publisher(name) => ("query.publisher-name", name.clone()),
  }];
  let filters: Vec<String> = [("from-pub-date", from), ("until-pub-date", until)]
    .into_iter()
    .filter_map(|(key, date)| date.map(|d| format!("{key}:{d}")))
    .collect();
  if !filters.is_empty() {
    params.push(("filter", filters.join(",")));
  }
  params
}

/// The `DOI` of every item in a works listing response.
pub fn dois_from_listing(response: &Value) -> Vec<String> {
  response
    .pointer("/message/items")
    .and_then(Value::as_array)
    .into_iter()
    .flatten()
    .filter_map(|item| item.get("DOI").and_then(Value::as_str))
    .map(str::to_owned)
    .collect()
}
