use std::fs::File;
use std::io::{Cursor, Read, Seek, SeekFrom};
use std::path::Path;

use byteorder::{BigEndian, LittleEndian, ReadBytesExt};
use tracing::warn;

use crate::error::{BcsvError, Result};
use crate::hash::HashDictionary;
use crate::table::BcsvTable;

/// Options for reading BCSV files
#[derive(Debug, Clone)]
pub struct IoOptions {
    /// Whether data is big-endian or little-endian
    pub big_endian: bool,
    /// Encoding of zero-terminated strings stored inside rows
    pub encoding: Encoding,
}

/// String encoding options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// UTF-8 encoding
    Utf8,
    /// Shift-JIS encoding
    ShiftJis,
    /// UTF-16 little-endian encoding
    Utf16Le,
}

impl Encoding {
    /// Width in bytes of one code unit, which is also the width of the terminator
    pub const fn code_unit_width(&self) -> usize {
        match self {
            Encoding::Utf8 | Encoding::ShiftJis => 1,
            Encoding::Utf16Le => 2,
        }
    }

    /// Parse an encoding name as accepted on the command line
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "utf8" => Some(Encoding::Utf8),
            "shiftjis" | "sjis" => Some(Encoding::ShiftJis),
            "utf16" | "utf16le" => Some(Encoding::Utf16Le),
            _ => None,
        }
    }

    /// Decode raw bytes, replacing invalid sequences
    pub fn decode(&self, bytes: &[u8]) -> String {
        let encoding = match self {
            Encoding::Utf8 => encoding_rs::UTF_8,
            Encoding::ShiftJis => encoding_rs::SHIFT_JIS,
            Encoding::Utf16Le => encoding_rs::UTF_16LE,
        };

        let (decoded, had_errors) = encoding.decode_without_bom_handling(bytes);
        if had_errors {
            warn!(encoding = encoding.name(), len = bytes.len(), "replaced undecodable string bytes");
        }
        decoded.into_owned()
    }
}

impl Default for IoOptions {
    fn default() -> Self {
        Self {
            big_endian: false,
            encoding: Encoding::Utf8,
        }
    }
}

/// Decode a BCSV table from a seekable stream
///
/// # Arguments
/// - `dict` - The hash dictionary used to name columns and resolve hashed values
/// - `reader` - The stream, positioned at the start of the header
/// - `options` - Options for endianness and string encoding
///
/// # Returns
/// A `BcsvTable` with one entry per row, or an error if the stream ends early
pub fn from_reader<R: Read + Seek>(
    dict: &HashDictionary,
    reader: R,
    options: &IoOptions,
) -> Result<BcsvTable> {
    let mut reader = BcsvReader::new(reader, options.clone());
    BcsvTable::read(&mut reader, dict)
}

/// Decode a BCSV table from a byte buffer
pub fn from_buffer(dict: &HashDictionary, data: &[u8], options: &IoOptions) -> Result<BcsvTable> {
    from_reader(dict, Cursor::new(data), options)
}

/// Decode a BCSV table from a file
///
/// # Arguments
/// - `dict` - The hash dictionary used to name columns and resolve hashed values
/// - `path` - The path to the BCSV file to read
/// - `options` - Options for endianness and string encoding
///
/// # Type
/// - `P` - A type that can be converted to a `Path` reference, such as `&str` or `String`
pub fn from_file<P: AsRef<Path>>(
    dict: &HashDictionary,
    path: P,
    options: &IoOptions,
) -> Result<BcsvTable> {
    let mut file = File::open(path)?;
    let mut data = Vec::new();
    file.read_to_end(&mut data)?;
    from_buffer(dict, &data, options)
}

/// Fixed-width readers over a seekable stream
///
/// Every read takes the name of the structure being read so that a stream
/// ending early is reported as `BcsvError::Truncated` with some context.
#[derive(Debug)]
pub struct BcsvReader<R> {
    inner: R,
    options: IoOptions,
}

impl<R: Read + Seek> BcsvReader<R> {
    pub fn new(inner: R, options: IoOptions) -> Self {
        Self { inner, options }
    }

    /// Current byte offset in the stream
    pub fn position(&mut self) -> Result<u64> {
        Ok(self.inner.stream_position()?)
    }

    /// Total length of the stream, leaving the cursor where it was
    pub fn stream_len(&mut self) -> Result<u64> {
        let position = self.inner.stream_position()?;
        let len = self.inner.seek(SeekFrom::End(0))?;
        self.inner.seek(SeekFrom::Start(position))?;
        Ok(len)
    }

    /// Move to an absolute byte offset
    pub fn seek_to(&mut self, offset: u64) -> Result<()> {
        self.inner.seek(SeekFrom::Start(offset))?;
        Ok(())
    }

    pub fn read_u8(&mut self, context: &'static str) -> Result<u8> {
        self.inner.read_u8().map_err(BcsvError::reading(context))
    }

    pub fn read_u16(&mut self, context: &'static str) -> Result<u16> {
        let value = if self.options.big_endian {
            self.inner.read_u16::<BigEndian>()
        } else {
            self.inner.read_u16::<LittleEndian>()
        };
        value.map_err(BcsvError::reading(context))
    }

    pub fn read_i16(&mut self, context: &'static str) -> Result<i16> {
        let value = if self.options.big_endian {
            self.inner.read_i16::<BigEndian>()
        } else {
            self.inner.read_i16::<LittleEndian>()
        };
        value.map_err(BcsvError::reading(context))
    }

    pub fn read_u32(&mut self, context: &'static str) -> Result<u32> {
        let value = if self.options.big_endian {
            self.inner.read_u32::<BigEndian>()
        } else {
            self.inner.read_u32::<LittleEndian>()
        };
        value.map_err(BcsvError::reading(context))
    }

    pub fn read_i32(&mut self, context: &'static str) -> Result<i32> {
        let value = if self.options.big_endian {
            self.inner.read_i32::<BigEndian>()
        } else {
            self.inner.read_i32::<LittleEndian>()
        };
        value.map_err(BcsvError::reading(context))
    }

    pub fn read_f32(&mut self, context: &'static str) -> Result<f32> {
        let value = if self.options.big_endian {
            self.inner.read_f32::<BigEndian>()
        } else {
            self.inner.read_f32::<LittleEndian>()
        };
        value.map_err(BcsvError::reading(context))
    }

    /// Read code units until a zero unit and decode them with the configured encoding
    ///
    /// The terminator is consumed but not part of the returned text.
    ///
    /// # Arguments
    /// - `context` - The structure being read, for error reporting
    ///
    /// # Errors
    /// - `BcsvError::Truncated` if the stream ends before the terminator
    pub fn read_zero_terminated_string(&mut self, context: &'static str) -> Result<String> {
        let encoding = self.options.encoding;
        let mut bytes = Vec::new();

        match encoding.code_unit_width() {
            2 => loop {
                let unit = self.read_u16(context)?;
                if unit == 0 {
                    break;
                }
                bytes.extend_from_slice(&unit.to_le_bytes());
            },
            _ => loop {
                let unit = self.read_u8(context)?;
                if unit == 0 {
                    break;
                }
                bytes.push(unit);
            },
        }

        Ok(encoding.decode(&bytes))
    }
}
