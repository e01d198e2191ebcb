use std::io::{Read, Seek};

use tracing::{debug, warn};

use crate::entry::DataEntry;
use crate::error::{BcsvError, Result};
use crate::field::FieldDescriptor;
use crate::hash::HashDictionary;
use crate::header::{Header, field_size};
use crate::infer::decode_field;
use crate::io::BcsvReader;

/// Upper bound on rows reserved up front, so a corrupt count cannot allocate wildly
const MAX_PREALLOCATED_ENTRIES: usize = 0x1_0000;

/// A decoded BCSV table
///
/// This is a table-like structure where each field represents a column
/// and each entry represents a row of data. Column types are not stored in
/// the file; every cell carries whatever type the decoder inferred for it.
#[derive(Debug, Clone)]
pub struct BcsvTable {
    header: Header,
    /// Field descriptors in file order
    fields: Vec<FieldDescriptor>,
    /// Rows in file order
    entries: Vec<DataEntry>,
}

impl BcsvTable {
    /// Decode a whole table from a stream positioned at its header
    ///
    /// Each row is read from its own start offset and the stream is moved to
    /// the next row by the row stride afterwards, however many bytes the
    /// fields actually consumed.
    ///
    /// # Arguments
    /// - `reader` - The stream to read from
    /// - `dict` - Known words used to name columns and resolve hashed values
    ///
    /// # Errors
    /// - `BcsvError::Truncated` if the stream ends inside the header, the field table or a row
    /// - `BcsvError::Truncated` if rows that read no bytes claim more rows than bytes left
    pub fn read<R: Read + Seek>(reader: &mut BcsvReader<R>, dict: &HashDictionary) -> Result<Self> {
        let header = Header::read(reader)?;
        let fields = header.read_fields(reader)?;

        // Rows that read no bytes never reach the end of the stream, so the
        // row count has to fit in what is left.
        if header.entry_size == 0 || fields.is_empty() {
            let remaining = reader.stream_len()?.saturating_sub(reader.position()?);
            let needed = header.num_entries as u64 * header.entry_size.max(1) as u64;
            if needed > remaining {
                warn!(
                    num_entries = header.num_entries,
                    entry_size = header.entry_size,
                    remaining,
                    "row count does not fit in the stream"
                );
                return Err(BcsvError::Truncated { context: "rows" });
            }
        }

        let capacity = (header.num_entries as usize).min(MAX_PREALLOCATED_ENTRIES);
        let mut entries = Vec::with_capacity(capacity);

        for _ in 0..header.num_entries {
            let row_start = reader.position()?;
            let mut entry = DataEntry::with_capacity(fields.len());

            for (index, field) in fields.iter().enumerate() {
                let size = field_size(&fields, index, header.entry_size);
                let (name, value) = decode_field(reader, dict, field, size, row_start)?;
                entry.insert(name, value);
            }

            entries.push(entry);
            reader.seek_to(row_start + header.entry_size as u64)?;
        }

        debug!(entries = entries.len(), fields = fields.len(), "decoded BCSV table");

        Ok(Self {
            header,
            fields,
            entries,
        })
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Get the number of fields (columns)
    pub fn num_fields(&self) -> usize {
        self.fields.len()
    }

    /// Get the number of entries (rows)
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if entries are empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the field descriptors in file order
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Get a slice of all entries
    pub fn entries(&self) -> &[DataEntry] {
        &self.entries
    }

    /// Get an entry by index
    pub fn get_entry(&self, index: usize) -> Option<&DataEntry> {
        self.entries.get(index)
    }

    /// Column names as decoded for the first row
    ///
    /// Names of unknown columns depend on the inferred type, so later rows may differ.
    pub fn column_names(&self) -> Vec<&str> {
        self.entries
            .first()
            .map(|entry| entry.names().collect())
            .unwrap_or_default()
    }

    /// Iterate over entries
    pub fn iter(&self) -> impl Iterator<Item = &DataEntry> {
        self.entries.iter()
    }
}

/// Implement IntoIterator for BcsvTable to allow iterating over entries directly
impl IntoIterator for BcsvTable {
    type Item = DataEntry;
    type IntoIter = std::vec::IntoIter<DataEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a BcsvTable {
    type Item = &'a DataEntry;
    type IntoIter = std::slice::Iter<'a, DataEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::field::Cell;
    use crate::io::IoOptions;

    /// Builds a little-endian table with `flag1 == 0`
    fn table_bytes(entry_size: u32, fields: &[(u32, u32)], rows: &[&[u8]]) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&(rows.len() as u32).to_le_bytes());
        bytes.extend_from_slice(&entry_size.to_le_bytes());
        bytes.extend_from_slice(&(fields.len() as u16).to_le_bytes());
        bytes.extend_from_slice(&[0, 0]);
        for (hash, offset) in fields {
            bytes.extend_from_slice(&hash.to_le_bytes());
            bytes.extend_from_slice(&offset.to_le_bytes());
        }
        for row in rows {
            bytes.extend_from_slice(row);
        }
        bytes
    }

    fn read(bytes: Vec<u8>) -> Result<BcsvTable> {
        let mut reader = BcsvReader::new(Cursor::new(bytes), IoOptions::default());
        BcsvTable::read(&mut reader, &HashDictionary::new())
    }

    #[test]
    fn test_rows_resync_on_stride() {
        // The string field reads 3 bytes of an 8-byte slot; the next row still starts at +9
        let rows: [&[u8]; 2] = [b"\x01ab\0zzzzz", b"\x02cd\0zzzzz"];
        let table = read(table_bytes(9, &[(0x10, 0), (0x20, 1)], &rows)).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.num_fields(), 2);
        assert_eq!(table.column_names(), ["10 u8", "20 string8"]);

        let second = table.get_entry(1).unwrap();
        assert_eq!(second.get("10 u8"), Some(&Cell::U8(2)));
        assert_eq!(second.get_str("20 string8"), Some("cd"));
    }

    #[test]
    fn test_string_overrunning_its_row_does_not_shift_next_row() {
        // No terminator inside the first row: the read runs into row two
        let rows: [&[u8]; 2] = [b"abcde", b"f\0\0\0\0"];
        let table = read(table_bytes(5, &[(0x30, 0)], &rows)).unwrap();

        assert_eq!(table.entries()[0].get_str("30 string5"), Some("abcdef"));
        assert_eq!(table.entries()[1].get_str("30 string5"), Some("f"));
    }

    #[test]
    fn test_zero_stride_row_count_is_bounded() {
        let mut bytes = table_bytes(0, &[(0x50, 0)], &[&[7, 0, 0, 0]]);
        bytes[0..4].copy_from_slice(&u32::MAX.to_le_bytes());
        assert!(matches!(read(bytes), Err(BcsvError::Truncated { context: "rows" })));

        let mut bytes = table_bytes(4, &[], &[]);
        bytes[0..4].copy_from_slice(&u32::MAX.to_le_bytes());
        assert!(matches!(read(bytes), Err(BcsvError::Truncated { context: "rows" })));
    }

    #[test]
    fn test_field_less_rows_within_stream() {
        let table = read(table_bytes(2, &[], &[&[0, 0], &[0, 0]])).unwrap();
        assert_eq!(table.len(), 2);
        assert!(table.entries().iter().all(DataEntry::is_empty));
        assert!(table.column_names().is_empty());
    }

    #[test]
    fn test_truncated_row_fails_whole_decode() {
        let mut bytes = table_bytes(4, &[(0x40, 0)], &[&[1, 0, 0, 0]]);
        // Claim two rows but provide one
        bytes[0] = 2;
        assert!(read(bytes).is_err());
    }

    #[test]
    fn test_empty_table() {
        let table = read(table_bytes(4, &[(0x40, 0)], &[])).unwrap();
        assert!(table.is_empty());
        assert!(table.column_names().is_empty());
        assert_eq!(table.header().num_fields, 1);
    }
}
