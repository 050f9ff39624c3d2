use std::io::Write;

use serde::Serialize;

use crate::Result;

/// Write `records` as a pretty-printed JSON array, in the given order.
pub fn write_records_json<W: Write, T: Serialize>(mut out: W, records: &[T]) -> Result<()> {
  serde_json::to_writer_pretty(&mut out, records)?;
  out.write_all(b"\n")?;
  Ok(())
}

pub fn records_json<T: Serialize>(records: &[T]) -> Result<String> {
  Ok(serde_json::to_string_pretty(records)?)
}
