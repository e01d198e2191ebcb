use std::fmt;

use serde::Serialize;

/// Definition of a field (column) in a BCSV, as stored in the field table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Hash of the field name
    pub hash: u32,
    /// Offset of the value from the start of each row
    pub offset: u32,
}

/// Value types the decoder can settle on for a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellType {
    /// Unsigned 8-bit integer (1 byte)
    U8,
    /// Signed 16-bit integer (2 bytes)
    I16,
    /// Signed 32-bit integer (4 bytes)
    I32,
    /// 32-bit floating point (4 bytes)
    F32,
    /// Text, either zero-terminated in the row or a resolved hash
    String,
}

impl CellType {
    /// First guess from the byte size a field occupies in a row
    pub const fn from_size(size: u32) -> Self {
        match size {
            1 => CellType::U8,
            2 => CellType::I16,
            4 => CellType::I32,
            _ => CellType::String,
        }
    }

    /// Suffix appended to a column name that no dictionary word matched
    pub fn name_suffix(&self, size: u32) -> String {
        match self {
            CellType::U8 => " u8".to_string(),
            CellType::I16 => " u16".to_string(),
            CellType::I32 => " u32".to_string(),
            CellType::F32 => " f32".to_string(),
            CellType::String if size > 4 => format!(" string{}", size),
            CellType::String => " string".to_string(),
        }
    }
}

impl fmt::Display for CellType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CellType::U8 => "u8",
            CellType::I16 => "i16",
            CellType::I32 => "i32",
            CellType::F32 => "f32",
            CellType::String => "string",
        };
        f.write_str(name)
    }
}

/// A decoded value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    U8(u8),
    I16(i16),
    I32(i32),
    F32(f32),
    String(String),
}

impl Cell {
    pub fn cell_type(&self) -> CellType {
        match self {
            Cell::U8(_) => CellType::U8,
            Cell::I16(_) => CellType::I16,
            Cell::I32(_) => CellType::I32,
            Cell::F32(_) => CellType::F32,
            Cell::String(_) => CellType::String,
        }
    }

    /// Get as integer, widening the narrow types
    pub fn as_int(&self) -> Option<i32> {
        match self {
            Cell::U8(v) => Some(*v as i32),
            Cell::I16(v) => Some(*v as i32),
            Cell::I32(v) => Some(*v),
            Cell::F32(_) | Cell::String(_) => None,
        }
    }

    /// Get as float, if this is a F32 value
    pub fn as_float(&self) -> Option<f32> {
        match self {
            Cell::F32(v) => Some(*v),
            _ => None,
        }
    }

    /// Get as string reference, if this is a String value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::String(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::U8(v) => write!(f, "{}", v),
            Cell::I16(v) => write!(f, "{}", v),
            Cell::I32(v) => write!(f, "{}", v),
            Cell::F32(v) => write!(f, "{:?}", v),
            Cell::String(v) => f.write_str(v),
        }
    }
}

impl From<u8> for Cell {
    fn from(v: u8) -> Self {
        Cell::U8(v)
    }
}

impl From<i16> for Cell {
    fn from(v: i16) -> Self {
        Cell::I16(v)
    }
}

impl From<i32> for Cell {
    fn from(v: i32) -> Self {
        Cell::I32(v)
    }
}

impl From<f32> for Cell {
    fn from(v: f32) -> Self {
        Cell::F32(v)
    }
}

impl From<String> for Cell {
    fn from(v: String) -> Self {
        Cell::String(v)
    }
}

impl From<&str> for Cell {
    fn from(v: &str) -> Self {
        Cell::String(v.to_string())
    }
}
