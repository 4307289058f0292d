//! JSON export
//!
//! An array of flat objects mirroring the CSV columns.

use crate::output::{ExportRow, OutputResult};
use crate::probe::ResultRow;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Formats result rows as a pretty-printed JSON array
pub fn format_json(rows: &[ResultRow]) -> OutputResult<String> {
    let export: Vec<ExportRow> = rows.iter().map(ExportRow::from_row).collect();
    Ok(serde_json::to_string_pretty(&export)?)
}

/// Writes result rows as JSON to the given path
pub fn write_json(rows: &[ResultRow], path: &Path) -> OutputResult<()> {
    let mut file = File::create(path)?;
    file.write_all(format_json(rows)?.as_bytes())?;
    file.write_all(b"\n")?;
    Ok(())
}
