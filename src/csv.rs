use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::Result;
use crate::hash::HASH_REF_MARKER;
use crate::table::BcsvTable;

/// Write a BcsvTable as CSV to any writer
///
/// The header row comes from the first entry's column names. Unless
/// `hex_header` is set, each name is cut at its first space (dropping the
/// type suffix of unknown columns) and the `.HashRef` marker is removed.
/// Values follow in column order, one record per entry. An empty table
/// writes nothing.
///
/// # Arguments
/// - `table` - The table to export
/// - `writer` - Where the CSV text goes
/// - `hex_header` - Keep the full decoded column names in the header
pub fn to_csv_writer<W: Write>(table: &BcsvTable, writer: W, hex_header: bool) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(writer);

    if let Some(first) = table.entries().first() {
        let headers: Vec<String> = first
            .names()
            .map(|name| {
                if hex_header {
                    name.to_string()
                } else {
                    header_name(name)
                }
            })
            .collect();

        csv_writer.write_record(&headers)?;
    }

    for entry in table.entries() {
        let values: Vec<String> = entry.values().map(|v| v.to_string()).collect();
        csv_writer.write_record(&values)?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Write a BcsvTable to a CSV file
///
/// # Returns
/// Ok(()) if the export was successful, or an error if the file could not be written
pub fn to_csv<P: AsRef<Path>>(table: &BcsvTable, path: P, hex_header: bool) -> Result<()> {
    let file = File::create(path)?;
    to_csv_writer(table, BufWriter::new(file), hex_header)
}

fn header_name(name: &str) -> String {
    name.split(' ')
        .next()
        .unwrap_or_default()
        .replace(HASH_REF_MARKER, "")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::HashDictionary;
    use crate::io::{from_buffer, IoOptions};

    fn sample() -> BcsvTable {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&2u32.to_le_bytes());
        bytes.extend_from_slice(&12u32.to_le_bytes());
        bytes.extend_from_slice(&2u16.to_le_bytes());
        bytes.extend_from_slice(&[0, 0]);
        for (hash, offset) in [(0xABCDu32, 0u32), (0x1234, 4)] {
            bytes.extend_from_slice(&hash.to_le_bytes());
            bytes.extend_from_slice(&offset.to_le_bytes());
        }
        for (a, b) in [(7i32, "x,y"), (8, "z")] {
            bytes.extend_from_slice(&a.to_le_bytes());
            let mut text = b.as_bytes().to_vec();
            text.resize(8, 0);
            bytes.extend_from_slice(&text);
        }
        from_buffer(&HashDictionary::new(), &bytes, &IoOptions::default()).unwrap()
    }

    #[test]
    fn test_header_names() {
        assert_eq!(header_name("abcd u32"), "abcd");
        assert_eq!(header_name("Target.HashRef"), "Target");
        assert_eq!(header_name("Label"), "Label");
    }

    #[test]
    fn test_csv_output() {
        let table = sample();

        let mut out = Vec::new();
        to_csv_writer(&table, &mut out, false).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "abcd,1234\n7,\"x,y\"\n8,z\n");

        let mut out = Vec::new();
        to_csv_writer(&table, &mut out, true).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("abcd u32,1234 string8\n"));
    }
}
