//! Entry (row) of a decoded BCSV table

use indexmap::IndexMap;
use serde::Serialize;

use crate::field::Cell;

/// An entry (row) of a decoded table
///
/// Column names map to values in field-table order. A name seen twice in one
/// row keeps its first position and its last value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DataEntry {
    data: IndexMap<String, Cell>,
}

impl DataEntry {
    /// Create a new empty entry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an entry with pre-allocated capacity
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            data: IndexMap::with_capacity(capacity),
        }
    }

    /// Store a value under a column name
    pub fn insert(&mut self, name: String, value: Cell) {
        self.data.insert(name, value);
    }

    /// Get a value by column name
    pub fn get(&self, name: &str) -> Option<&Cell> {
        self.data.get(name)
    }

    /// Get an integer value by column name
    pub fn get_int(&self, name: &str) -> Option<i32> {
        self.get(name).and_then(|v| v.as_int())
    }

    /// Get a float value by column name
    pub fn get_float(&self, name: &str) -> Option<f32> {
        self.get(name).and_then(|v| v.as_float())
    }

    /// Get a string value by column name
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(|v| v.as_str())
    }

    /// Get a value by column position
    pub fn get_index(&self, index: usize) -> Option<(&str, &Cell)> {
        self.data.get_index(index).map(|(k, v)| (k.as_str(), v))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.data.contains_key(name)
    }

    /// Get the number of fields in this entry
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if this entry is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Iterate over all name-value pairs, in column order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Cell)> {
        self.data.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.data.keys().map(String::as_str)
    }

    pub fn values(&self) -> impl Iterator<Item = &Cell> {
        self.data.values()
    }
}

impl<'a> IntoIterator for &'a DataEntry {
    type Item = (&'a String, &'a Cell);
    type IntoIter = indexmap::map::Iter<'a, String, Cell>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_insertion_order() {
        let mut entry = DataEntry::new();
        entry.insert("b u8".to_string(), Cell::U8(1));
        entry.insert("a f32".to_string(), Cell::F32(0.5));
        entry.insert("Label".to_string(), Cell::from("Kind_Ftr"));

        let names: Vec<&str> = entry.names().collect();
        assert_eq!(names, ["b u8", "a f32", "Label"]);
        assert_eq!(entry.get_int("b u8"), Some(1));
        assert_eq!(entry.get_float("a f32"), Some(0.5));
        assert_eq!(entry.get_str("Label"), Some("Kind_Ftr"));
        assert_eq!(entry.get_index(1), Some(("a f32", &Cell::F32(0.5))));
        assert!(entry.contains("Label"));
        assert!(!entry.contains("Label string32"));
    }

    #[test]
    fn test_duplicate_name_last_value_wins() {
        let mut entry = DataEntry::with_capacity(2);
        entry.insert("Label".to_string(), Cell::I32(1));
        entry.insert("Other".to_string(), Cell::I32(2));
        entry.insert("Label".to_string(), Cell::I32(3));

        assert_eq!(entry.len(), 2);
        assert_eq!(entry.get_index(0), Some(("Label", &Cell::I32(3))));
    }
}
