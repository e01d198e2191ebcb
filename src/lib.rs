//! # bcsv-parse
//!
//! A Rust library for decoding untyped BCSV tables
//! This variant of the format is used by Animal Crossing: New Horizons and other Switch games
//!
//! The file only stores a row stride and, per column, a 32-bit name hash and an
//! offset. Column types are inferred from field sizes and values, and hashes are
//! resolved against a dictionary of known words (CRC-32 and MurmurHash3).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bcsv_parse::{from_file, to_csv, HashDictionary, IoOptions};
//!
//! // Build the dictionary once and share it between decodes
//! let dict = HashDictionary::bundled();
//!
//! // Read a BCSV file
//! let table = from_file(&dict, "ItemParam.bcsv", &IoOptions::default()).unwrap();
//!
//! // Print some data
//! println!("Entries: {}", table.len());
//! for entry in &table {
//!     if let Some(name) = entry.get_str("Label") {
//!         println!("Label: {}", name);
//!     }
//! }
//!
//! // Export to CSV
//! to_csv(&table, "ItemParam.csv", false).unwrap();
//! ```
//!
//! ## Features
//!
//! - Column names recovered from CRC-32 and MurmurHash3 hashes
//! - Integer, float and hashed-string detection for 4-byte fields
//! - UTF-8, Shift-JIS and UTF-16 strings
//! - CSV and JSON export

pub mod csv;
pub mod entry;
pub mod error;
pub mod field;
pub mod hash;
pub mod header;
pub mod infer;
pub mod io;
pub mod json;
pub mod table;

#[cfg(feature = "python")]
pub mod python;

pub use crate::csv::{to_csv, to_csv_writer};
pub use crate::entry::DataEntry;
pub use crate::error::{BcsvError, Result};
pub use crate::field::{Cell, CellType, FieldDescriptor};
pub use crate::hash::{
    crc32, murmur3_32, DictEntry, EntryKind, HashAlgorithm, HashDictionary, Resolved,
};
pub use crate::header::Header;
pub use crate::io::{from_buffer, from_file, from_reader, BcsvReader, Encoding, IoOptions};
pub use crate::json::{to_json, to_json_string, to_json_writer};
pub use crate::table::BcsvTable;
