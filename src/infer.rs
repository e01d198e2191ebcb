//! Type inference for untyped BCSV fields
//!
//! A field only tells us its name hash and where it starts in a row. The byte
//! size (distance to the next field) gives a first guess, then 4-byte values go
//! through a fixed chain of checks to decide between integer, float and hashed
//! string:
//!
//! 1. value is a CRC-32 of a known word -> that word
//! 2. value is a MurmurHash3 of a known word -> that word
//! 3. the column is known to hold string hashes -> value as uppercase hex
//! 4. more than 6 decimal characters -> same bits as `f32`
//! 5. that float is too large to print positionally (`1E+10`) -> value as uppercase hex
//!
//! The order matters and is kept as is, including step 5 undoing step 4.

use std::io::{Read, Seek};

use tracing::{trace, warn};

use crate::error::Result;
use crate::field::{Cell, CellType, FieldDescriptor};
use crate::hash::{HashAlgorithm, HashDictionary};
use crate::io::BcsvReader;

/// Single-precision values print in positional notation up to this many integer digits
const FLOAT_POSITIONAL_DIGITS: i32 = 9;

/// Shortest text that can be read as a hex-encoded hash
const MIN_HEX_TOKEN_LEN: usize = 5;

/// Decode one field of the row starting at `row_start`
///
/// # Arguments
/// - `reader` - The stream, positioned anywhere; it is moved to the field first
/// - `dict` - Known words for resolving hashes
/// - `field` - The field descriptor
/// - `size` - Byte size of the field within the row
/// - `row_start` - Absolute offset of the current row
///
/// # Returns
/// The final column name and the decoded value
pub fn decode_field<R: Read + Seek>(
    reader: &mut BcsvReader<R>,
    dict: &HashDictionary,
    field: &FieldDescriptor,
    size: u32,
    row_start: u64,
) -> Result<(String, Cell)> {
    reader.seek_to(row_start + field.offset as u64)?;

    let column = dict.resolve(field.hash);
    let string_column = column
        .map(|resolved| resolved.entry.kind().is_string_reference())
        .unwrap_or(false);

    let cell = match CellType::from_size(size) {
        CellType::U8 => Cell::U8(reader.read_u8("row")?),
        CellType::I16 => Cell::I16(reader.read_i16("row")?),
        CellType::I32 => classify_word(reader.read_i32("row")?, dict, string_column),
        CellType::F32 => Cell::F32(reader.read_f32("row")?),
        CellType::String => {
            let text = reader.read_zero_terminated_string("row")?;
            Cell::String(expand_hash_list(text, dict))
        }
    };

    let name = match column {
        Some(resolved) => resolved.entry.name().to_string(),
        None => format!("{:x}{}", field.hash, cell.cell_type().name_suffix(size)),
    };

    trace!(hash = field.hash, offset = field.offset, size, %name, kind = %cell.cell_type(), "decoded field");
    Ok((name, cell))
}

/// Decide what a 4-byte value really is
///
/// # Arguments
/// - `value` - The raw value read as a signed integer
/// - `dict` - Known words for resolving the value as a hash
/// - `string_column` - Whether the column's own name marks it as holding string hashes
pub fn classify_word(value: i32, dict: &HashDictionary, string_column: bool) -> Cell {
    let check = value as u32;

    for algorithm in [HashAlgorithm::Crc32, HashAlgorithm::Murmur3] {
        if let Some(entry) = dict.lookup(algorithm, check) {
            return Cell::String(entry.word().to_string());
        }
    }

    if string_column && check != 0 {
        return Cell::String(format!("{:X}", check));
    }

    let mut cell = Cell::I32(value);

    if value.to_string().len() > 6 {
        cell = Cell::F32(f32::from_bits(check));
    }

    if let Cell::F32(float) = cell {
        if prints_with_exponent(float) {
            cell = Cell::String(format!("{:X}", check));
        }
    }

    cell
}

/// Whether a float's general-format text would need a positive exponent (`1E+09`)
///
/// Uses the shortest round-trip digits: the integer part may span up to
/// `max(digits, 9)` places before an exponent is required. Small magnitudes
/// are kept as floats.
pub fn prints_with_exponent(value: f32) -> bool {
    if !value.is_finite() || value == 0.0 {
        return false;
    }

    let text = format!("{:e}", value.abs());
    let Some((mantissa, exponent)) = text.split_once('e') else {
        return false;
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return false;
    };

    let digits = mantissa.chars().filter(char::is_ascii_digit).count() as i32;
    let decimal_point = exponent + 1;

    decimal_point > digits.max(FLOAT_POSITIONAL_DIGITS)
}

/// Text made only of hex digits, long enough to be a hash
pub fn is_hex_token(text: &str) -> bool {
    text.len() >= MIN_HEX_TOKEN_LEN && text.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Replace hex-encoded hashes in a `|`-separated string with the words they hash
///
/// Text that is neither a hex token nor contains `|` is returned unchanged.
/// Otherwise every hex token is resolved (CRC-32 first, then MurmurHash3) and
/// dropped if unknown; other tokens are kept. Trailing separators are trimmed.
pub fn expand_hash_list(text: String, dict: &HashDictionary) -> String {
    if !is_hex_token(&text) && !text.contains('|') {
        return text;
    }

    let mut result = String::with_capacity(text.len());

    for token in text.split('|') {
        if !is_hex_token(token) {
            result.push_str(token);
            result.push('|');
            continue;
        }

        let hash = match u32::from_str_radix(token, 16) {
            Ok(hash) => hash,
            Err(_) => {
                warn!(%token, "hex token does not fit in 32 bits, dropping it");
                continue;
            }
        };

        if let Some(resolved) = dict.resolve(hash) {
            result.push_str(resolved.entry.word());
            result.push('|');
        }
    }

    result.trim_end_matches('|').to_string()
}
