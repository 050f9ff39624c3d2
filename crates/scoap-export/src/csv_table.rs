//! [`CsvTable`] — rows of named cells written with a leading identifier
//! column followed by every other column in name order.

use std::{
  collections::{BTreeMap, BTreeSet},
  io::Write,
};

use crate::Result;

/// One row: column name to cell value.
pub type CsvRow = BTreeMap<String, String>;

#[derive(Debug, Clone)]
pub struct CsvTable {
  id_column: String,
  rows:      Vec<CsvRow>,
}

impl CsvTable {
  pub fn new(id_column: impl Into<String>) -> Self {
    Self { id_column: id_column.into(), rows: Vec::new() }
  }

  pub fn push(&mut self, row: CsvRow) { self.rows.push(row); }

  pub fn len(&self) -> usize { self.rows.len() }

  pub fn is_empty(&self) -> bool { self.rows.is_empty() }

  /// The identifier column, then the sorted union of all other columns.
  pub fn columns(&self) -> Vec<&str> {
    let rest: BTreeSet<&str> = self
      .rows
      .iter()
      .flat_map(|row| row.keys().map(String::as_str))
      .filter(|c| *c != self.id_column)
      .collect();
    std::iter::once(self.id_column.as_str()).chain(rest).collect()
  }

  /// Write the header and every row. Missing cells are empty.
  pub fn write_to<W: Write>(&self, out: W) -> Result<()> {
    let columns = self.columns();
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(&columns)?;
    for row in &self.rows {
      writer.write_record(
        columns
          .iter()
          .map(|c| row.get(*c).map(String::as_str).unwrap_or_default()),
      )?;
    }
    writer.flush()?;
    Ok(())
  }

  pub fn to_csv_string(&self) -> Result<String> {
    let mut buf = Vec::new();
    self.write_to(&mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
  }
}

impl Extend<CsvRow> for CsvTable {
  fn extend<I: IntoIterator<Item = CsvRow>>(&mut self, iter: I) {
    self.rows.extend(iter);
  }
}
