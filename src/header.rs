//! BCSV header and field table

use std::io::{Read, Seek};

use tracing::{debug, warn};

use crate::error::Result;
use crate::field::FieldDescriptor;
use crate::io::BcsvReader;

/// Fixed part of the header in bytes
pub const HEADER_SIZE: u64 = 0x0C;

/// Size of the optional block that follows the header when `flag1 == 1`
pub const EXTENDED_HEADER_SIZE: u64 = 0x10;

/// Size of one field descriptor in bytes
pub const FIELD_DESCRIPTOR_SIZE: u64 = 0x08;

/// Table header
///
/// ```text
/// 0x00  u32  number of entries
/// 0x04  u32  entry size (row stride)
/// 0x08  u16  number of fields
/// 0x0A  u8   flag1
/// 0x0B  u8   reserved
/// 0x0C  u32[4] only when flag1 == 1, usually [?, 100000, 0, 0]
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub num_entries: u32,
    pub entry_size: u32,
    pub num_fields: u16,
    pub flag1: u8,
    /// The four words of the extended block, kept uninterpreted
    pub extended: Option<[u32; 4]>,
}

impl Header {
    /// Read the header, including the extended block when present
    ///
    /// # Errors
    /// - `BcsvError::Truncated` if the stream ends inside the header
    pub fn read<R: Read + Seek>(reader: &mut BcsvReader<R>) -> Result<Self> {
        let num_entries = reader.read_u32("header")?;
        let entry_size = reader.read_u32("header")?;
        let num_fields = reader.read_u16("header")?;
        let flag1 = reader.read_u8("header")?;
        let _reserved = reader.read_u8("header")?;

        let extended = if flag1 == 1 {
            let mut words = [0u32; 4];
            for word in &mut words {
                *word = reader.read_u32("extended header")?;
            }
            Some(words)
        } else {
            None
        };

        debug!(num_entries, entry_size, num_fields, flag1, "read BCSV header");

        Ok(Self {
            num_entries,
            entry_size,
            num_fields,
            flag1,
            extended,
        })
    }

    /// Read the `num_fields` descriptors that follow the header, in file order
    ///
    /// # Errors
    /// - `BcsvError::Truncated` if the stream ends inside the field table
    pub fn read_fields<R: Read + Seek>(
        &self,
        reader: &mut BcsvReader<R>,
    ) -> Result<Vec<FieldDescriptor>> {
        let mut fields = Vec::with_capacity(self.num_fields as usize);

        for _ in 0..self.num_fields {
            let hash = reader.read_u32("field table")?;
            let offset = reader.read_u32("field table")?;
            fields.push(FieldDescriptor { hash, offset });
        }

        if fields.windows(2).any(|pair| pair[1].offset < pair[0].offset) {
            warn!("field offsets are not ascending, inferred sizes will be wrong");
        }
        if let Some(field) = fields.iter().find(|f| f.offset > self.entry_size) {
            warn!(hash = field.hash, offset = field.offset, "field starts beyond the entry size");
        }

        Ok(fields)
    }

    /// Size in bytes of the header and field table together
    pub fn table_start(&self) -> u64 {
        let extended = if self.extended.is_some() { EXTENDED_HEADER_SIZE } else { 0 };
        HEADER_SIZE + extended + self.num_fields as u64 * FIELD_DESCRIPTOR_SIZE
    }
}

/// Byte size of field `index`, from the next field's offset or the row stride
///
/// Offsets are assumed ascending and are not checked. A descending pair wraps
/// around to a huge size, which only ever selects the string reader.
pub fn field_size(fields: &[FieldDescriptor], index: usize, entry_size: u32) -> u32 {
    let end = fields
        .get(index + 1)
        .map(|next| next.offset)
        .unwrap_or(entry_size);
    end.wrapping_sub(fields[index].offset)
}
