use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::Result;
use crate::table::BcsvTable;

/// Render a BcsvTable as a pretty-printed JSON array, one object per entry
///
/// Keys keep column order. Integers and floats become JSON numbers (a float
/// that is NaN or infinite becomes `null`), strings stay strings.
pub fn to_json_string(table: &BcsvTable) -> Result<String> {
    Ok(serde_json::to_string_pretty(table.entries())?)
}

/// Write a BcsvTable as JSON to any writer
pub fn to_json_writer<W: Write>(table: &BcsvTable, writer: W) -> Result<()> {
    let mut writer = writer;
    serde_json::to_writer_pretty(&mut writer, table.entries())?;
    writer.flush()?;
    Ok(())
}

/// Write a BcsvTable to a JSON file
pub fn to_json<P: AsRef<Path>>(table: &BcsvTable, path: P) -> Result<()> {
    let file = File::create(path)?;
    to_json_writer(table, BufWriter::new(file))
}
